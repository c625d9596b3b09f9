//! Lifespan timeline as a Mermaid gantt chart.

use crate::config::TimelineConfig;
use crate::dates::{UNKNOWN_YEAR, extract_year, known_age, parse_year};
use crate::identity::RenderKeys;
use crate::record::{Person, PersonId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineBar {
    pub label: String,
    pub start_year: String,
    pub duration_days: i64,
    /// Birth year inferred from a child.
    pub estimated_birth: bool,
    /// Lifespan defaulted because the age was unknown.
    pub assumed_lifespan: bool,
}

impl TimelineBar {
    pub fn line(&self) -> String {
        format!("{} :{}, {}d", self.label, self.start_year, self.duration_days)
    }
}

#[derive(Debug, Clone)]
pub struct Timeline {
    pub header: Vec<String>,
    pub bars: Vec<TimelineBar>,
}

impl Timeline {
    pub fn text(&self) -> String {
        self.header
            .iter()
            .cloned()
            .chain(self.bars.iter().map(TimelineBar::line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn sort_key(person: &Person) -> (String, String) {
    (
        person.surname.trim().to_string(),
        extract_year(&person.date_of_birth).unwrap_or_else(|| UNKNOWN_YEAR.to_string()),
    )
}

/// Persons ordered by surname, then birth year, both compared as text.
/// Ties keep input order.
pub fn sort_persons(persons: &[Person]) -> Vec<(PersonId, &Person)> {
    let mut sorted: Vec<((PersonId, &Person), (String, String))> = persons
        .iter()
        .enumerate()
        .map(|(index, p)| ((PersonId(index), p), sort_key(p)))
        .collect();
    sorted.sort_by(|a, b| a.1.cmp(&b.1));
    sorted.into_iter().map(|(entry, _)| entry).collect()
}

/// First person naming `parent` as father or mother.
pub fn find_child<'a>(parent: &Person, persons: &[(PersonId, &'a Person)]) -> Option<&'a Person> {
    let full_name = parent.full_name();
    persons.iter().map(|(_, who)| *who).find(|who| {
        who.mother_fullname.trim() == full_name || who.father_fullname.trim() == full_name
    })
}

fn estimate_birth_year(
    person: &Person,
    persons: &[(PersonId, &Person)],
    config: &TimelineConfig,
) -> Option<String> {
    let child = find_child(person, persons)?;
    let child_year = parse_year(&extract_year(&child.date_of_birth)?)?;
    let born = child_year.checked_sub(config.parent_age_at(child_year))?;
    tracing::info!(
        person = %person.full_name(),
        child = %child.full_name(),
        born,
        "assumed birth year from child"
    );
    Some(born.to_string())
}

fn bar(
    person: &Person,
    label: String,
    persons: &[(PersonId, &Person)],
    config: &TimelineConfig,
    current_year: i32,
) -> Option<TimelineBar> {
    let (start_year, estimated_birth) = match extract_year(&person.date_of_birth) {
        Some(year) => (year, false),
        None => match estimate_birth_year(person, persons, config) {
            Some(year) => (year, true),
            None => {
                tracing::debug!(person = %label, "no birth year, skipping");
                return None;
            }
        },
    };

    let death = extract_year(&person.date_of_death);
    let age = known_age(Some(start_year.as_str()), death.as_deref(), current_year);
    let assumed_lifespan = age.is_none();
    let age = age.unwrap_or_else(|| {
        tracing::info!(
            person = %label,
            years = config.default_lifespan,
            "assumed default lifespan"
        );
        config.default_lifespan
    });

    Some(TimelineBar {
        label,
        start_year,
        duration_days: i64::from(age) * i64::from(config.days_per_year),
        estimated_birth,
        assumed_lifespan,
    })
}

/// Builds the timeline: one bar per person whose birth year is known or can
/// be inferred from one of their children. Bars are labelled with the same
/// node keys as the flowchart.
pub fn build_timeline(
    persons: &[Person],
    keys: &RenderKeys,
    config: &TimelineConfig,
    current_year: i32,
) -> Timeline {
    let header = vec![
        "gantt".to_string(),
        format!("title {}", config.title),
        format!("dateFormat  {}", config.date_format),
        format!("axisFormat  {}", config.axis_format),
    ];

    let sorted = sort_persons(persons);
    let bars: Vec<TimelineBar> = sorted
        .iter()
        .filter_map(|&(id, person)| {
            bar(person, keys.get(id).to_string(), &sorted, config, current_year)
        })
        .collect();

    tracing::debug!(persons = persons.len(), bars = bars.len(), "built timeline");
    Timeline { header, bars }
}
