//! Family-tree flowchart.
//!
//! Every person hangs off a union node `father=mother`. Fathers and mothers
//! point at the union, the union points at the child. A union with an
//! unknown mother only gets drawn when several children share it; the
//! missing parent is then shown as a placeholder node.

use std::collections::{HashMap, HashSet};

use crate::ancestor::UnionIndex;
use crate::config::{FlowchartConfig, StyleMode};
use crate::dates::{UNKNOWN_YEAR, extract_year, known_age};
use crate::identity::{ParentKeys, RenderKeys, family_key};
use crate::record::{Person, PersonId};
use crate::theme::Theme;

const FALLBACK_LINK_COLOR: &str = "#333333";

/// One family's Mermaid class and fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyStyle {
    pub family: String,
    /// Sanitized class name, unique across families.
    pub class: String,
    pub color: String,
}

/// Surname → color, assigned round-robin from the palette in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct FamilyColors {
    order: Vec<FamilyStyle>,
    index: HashMap<String, usize>,
    classes: HashSet<String>,
    next: usize,
}

impl FamilyColors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color of `family`, claiming the next palette entry on first sight.
    pub fn assign(&mut self, family: &str, palette: &[String]) -> String {
        if let Some(&idx) = self.index.get(family) {
            return self.order[idx].color.clone();
        }
        let color = palette
            .get(self.next)
            .cloned()
            .unwrap_or_else(|| FALLBACK_LINK_COLOR.to_string());
        self.next = if palette.is_empty() {
            0
        } else {
            (self.next + 1) % palette.len()
        };

        // `D'Angelo` and `D Angelo` sanitize alike; later ones get `_2`, `_3`
        let base = class_name(family);
        let mut class = base.clone();
        let mut n = 1;
        while self.classes.contains(&class) {
            n += 1;
            class = format!("{base}_{n}");
        }
        if n > 1 {
            tracing::debug!(family, class = %class, "family class renamed");
        }
        self.classes.insert(class.clone());

        self.index.insert(family.to_string(), self.order.len());
        self.order.push(FamilyStyle {
            family: family.to_string(),
            class,
            color: color.clone(),
        });
        color
    }

    pub fn get(&self, family: &str) -> Option<&str> {
        self.index
            .get(family)
            .map(|&idx| self.order[idx].color.as_str())
    }

    pub fn class_of(&self, family: &str) -> Option<&str> {
        self.index
            .get(family)
            .map(|&idx| self.order[idx].class.as_str())
    }

    /// Families in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &FamilyStyle> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Flowchart {
    pub lines: Vec<String>,
    pub families: FamilyColors,
    /// Number of edges, i.e. the next free `linkStyle` index.
    pub edge_count: usize,
}

impl Flowchart {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

struct FlowchartBuilder<'a> {
    theme: &'a Theme,
    config: &'a FlowchartConfig,
    current_year: i32,
    lines: Vec<String>,
    emitted: HashSet<String>,
    families: FamilyColors,
    edge_count: usize,
}

impl<'a> FlowchartBuilder<'a> {
    fn new(theme: &'a Theme, config: &'a FlowchartConfig, current_year: i32) -> Self {
        Self {
            theme,
            config,
            current_year,
            lines: Vec::new(),
            emitted: HashSet::new(),
            families: FamilyColors::new(),
            edge_count: 0,
        }
    }

    fn push(&mut self, line: String) {
        self.emitted.insert(line.clone());
        self.lines.push(line);
    }

    /// Pushes `line` unless an identical line was already emitted.
    fn push_once(&mut self, line: String) -> bool {
        if self.emitted.contains(&line) {
            return false;
        }
        self.push(line);
        true
    }

    fn header(&mut self) {
        self.push(format!("graph {}", self.config.direction.as_token()));
        if self.config.style_mode == StyleMode::Gender {
            self.push(format!("classDef M fill:{}", self.theme.male_color));
            self.push(format!("classDef F fill:{}", self.theme.female_color));
        }
    }

    fn link_style(&mut self, color: &str) {
        self.push(format!("linkStyle {} stroke:{}", self.edge_count, color));
        self.edge_count += 1;
    }

    fn person(&mut self, id: PersonId, person: &Person, node_id: &str, unions: &UnionIndex) {
        let parents = ParentKeys::resolve(id, person);
        let union = parents.union_key();
        let family = family_key(person);
        let color = self.families.assign(&family, &self.theme.palette);
        let shared = unions.is_shared(&parents);

        if !person.father_fullname.trim().is_empty()
            && !self.emitted.contains(&edge(&parents.father, &union))
        {
            self.push(format!("{}({})", union, self.config.union_label));
            self.push(edge(&parents.father, &union));
            self.link_style(&color);
        }

        if parents.is_partial() && shared {
            self.push_once(format!(
                "{}[[{}]]",
                union, self.config.missing_ancestor_label
            ));
        }

        if !parents.mother.is_empty() && self.push_once(edge(&parents.mother, &union)) {
            self.edge_count += 1;
        }

        let node = self.person_node(person, node_id, &family);
        if !parents.is_partial() || shared {
            // merged duplicate rows resolve to the same edge
            if self.push_once(edge(&union, &node)) {
                self.link_style(&color);
            }
        } else {
            self.push(node);
        }
    }

    fn person_node(&self, person: &Person, node_id: &str, family: &str) -> String {
        let born = extract_year(&person.date_of_birth);
        let death = extract_year(&person.date_of_death);
        let mut label = person.full_name();
        if let Some(symbol) = person.gender_symbol() {
            label.push(' ');
            label.push_str(&symbol);
        }
        let lifespan = format!(
            "{} - {}",
            born.as_deref().unwrap_or(UNKNOWN_YEAR),
            death.as_deref().unwrap_or("")
        );
        label.push_str("<br />");
        label.push_str(lifespan.trim_end());
        if let Some(age) = known_age(born.as_deref(), death.as_deref(), self.current_year) {
            label.push_str(&format!(" ({age})"));
        }

        let class = match self.config.style_mode {
            StyleMode::Family => self.families.class_of(family).map(str::to_string),
            StyleMode::Gender => Some(person.gender.trim().to_string()).filter(|g| !g.is_empty()),
        };
        let mut node = format!("{}[\"{}\"]", node_id, escape_label(&label));
        if let Some(class) = class {
            node.push_str(":::");
            node.push_str(&class);
        }
        node
    }

    fn finish(mut self) -> Flowchart {
        if self.config.style_mode == StyleMode::Family {
            let class_defs: Vec<String> = self
                .families
                .iter()
                .map(|style| format!("classDef {} fill:{}", style.class, style.color))
                .collect();
            for line in class_defs {
                self.push(line);
            }
        }
        Flowchart {
            lines: self.lines,
            families: self.families,
            edge_count: self.edge_count,
        }
    }
}

fn edge(from: &str, to: &str) -> String {
    format!("{from} --> {to}")
}

/// Mermaid class names only take word characters and dashes.
fn class_name(family: &str) -> String {
    family
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || ch == '_' || ch == '-' {
                ch
            } else {
                '_'
            }
        })
        .collect()
}

fn escape_label(label: &str) -> String {
    label.replace('"', "#quot;")
}

/// Builds the family-tree flowchart, processing persons in input order.
pub fn build_flowchart(
    persons: &[Person],
    theme: &Theme,
    config: &FlowchartConfig,
    current_year: i32,
) -> Flowchart {
    let unions = UnionIndex::build(persons);
    let keys = RenderKeys::assign(persons, config.disambiguate_collisions);

    let mut builder = FlowchartBuilder::new(theme, config, current_year);
    builder.header();
    for (idx, person) in persons.iter().enumerate() {
        let id = PersonId(idx);
        builder.person(id, person, keys.get(id), &unions);
    }
    let flowchart = builder.finish();

    tracing::debug!(
        persons = persons.len(),
        lines = flowchart.lines.len(),
        edges = flowchart.edge_count,
        families = flowchart.families.len(),
        "built flowchart"
    );
    flowchart
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Direction;
    use crate::record::person;

    const YEAR: i32 = 2024;

    fn build(persons: &[Person]) -> Flowchart {
        build_flowchart(persons, &Theme::classic(), &FlowchartConfig::default(), YEAR)
    }

    fn edge_lines(flowchart: &Flowchart) -> Vec<&str> {
        flowchart
            .lines
            .iter()
            .map(String::as_str)
            .filter(|line| line.contains(" --> "))
            .collect()
    }

    #[test]
    fn lone_person_renders_detached() {
        let flowchart = build(&[person("Mario", "Rossi", "1950", "", "")]);
        assert_eq!(
            flowchart.lines,
            vec![
                "graph TD".to_string(),
                "Mario_Rossi[\"Mario Rossi<br />1950 - (74)\"]:::Rossi".to_string(),
                "classDef Rossi fill:#5f0b2b".to_string(),
            ]
        );
        assert_eq!(flowchart.edge_count, 0);
    }

    #[test]
    fn shared_father_gets_placeholder_and_attached_children() {
        let mut luigi = person("Luigi", "Bianchi", "1920", "", "");
        luigi.date_of_death = "3/4/1990".to_string();
        luigi.gender = "M".to_string();
        let persons = vec![
            luigi,
            person("Mario", "Bianchi", "1950", "Luigi Bianchi", ""),
            person("Paolo", "Bianchi", "1952", "Luigi Bianchi", ""),
        ];
        let flowchart = build(&persons);
        assert_eq!(
            flowchart.lines,
            vec![
                "graph TD",
                "Luigi_Bianchi[\"Luigi Bianchi ♂<br />1920 - 1990 (70)\"]:::Bianchi",
                "Luigi_Bianchi=(Marriage)",
                "Luigi_Bianchi --> Luigi_Bianchi=",
                "linkStyle 0 stroke:#5f0b2b",
                "Luigi_Bianchi=[[Missing ancestor]]",
                "Luigi_Bianchi= --> Mario_Bianchi[\"Mario Bianchi<br />1950 - (74)\"]:::Bianchi",
                "linkStyle 1 stroke:#5f0b2b",
                "Luigi_Bianchi= --> Paolo_Bianchi[\"Paolo Bianchi<br />1952 - (72)\"]:::Bianchi",
                "linkStyle 2 stroke:#5f0b2b",
                "classDef Bianchi fill:#5f0b2b",
            ]
        );
    }

    #[test]
    fn known_parents_share_one_union() {
        let persons = vec![
            person("Sara", "Neri", "1970", "Carlo Neri", "Lia Blu"),
            person("Ugo", "Neri", "1972", "Carlo Neri", "Lia Blu"),
        ];
        let flowchart = build(&persons);
        let edges = edge_lines(&flowchart);
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[0], "Carlo_Neri --> Carlo_Neri=Lia_Blu");
        assert_eq!(edges[1], "Lia_Blu --> Carlo_Neri=Lia_Blu");
        assert!(edges[2].starts_with("Carlo_Neri=Lia_Blu --> Sara_Neri["));
        assert!(edges[3].starts_with("Carlo_Neri=Lia_Blu --> Ugo_Neri["));
        assert!(!flowchart.text().contains("Missing ancestor"));
        // mother edge takes index 1 without a style line
        assert!(flowchart.lines.contains(&"linkStyle 0 stroke:#5f0b2b".to_string()));
        assert!(flowchart.lines.contains(&"linkStyle 2 stroke:#5f0b2b".to_string()));
        assert!(flowchart.lines.contains(&"linkStyle 3 stroke:#5f0b2b".to_string()));
        assert!(!flowchart.text().contains("linkStyle 1 "));
        assert_eq!(flowchart.edge_count, 4);
    }

    #[test]
    fn unknown_father_known_mother_attaches_to_family_union() {
        let flowchart = build(&[person("Nina", "Verdi", "1990", "", "Eva Gialli")]);
        let edges = edge_lines(&flowchart);
        assert_eq!(edges[0], "Eva_Gialli --> Family_Verdi=Eva_Gialli");
        assert!(edges[1].starts_with("Family_Verdi=Eva_Gialli --> Nina_Verdi["));
        assert!(!flowchart.text().contains("(Marriage)"));
    }

    #[test]
    fn siblings_of_unknown_father_share_family_union() {
        let persons = vec![
            person("Anna", "Verdi", "1960", "", ""),
            person("Bice", "Verdi", "1962", "", ""),
        ];
        let flowchart = build(&persons);
        let placeholders: Vec<_> = flowchart
            .lines
            .iter()
            .filter(|l| l.ends_with("[[Missing ancestor]]"))
            .collect();
        assert_eq!(placeholders, vec!["Family_Verdi=[[Missing ancestor]]"]);
        assert_eq!(edge_lines(&flowchart).len(), 2);
    }

    #[test]
    fn edges_are_never_repeated() {
        let persons = vec![
            person("A", "X", "1900", "F X", "M Y"),
            person("B", "X", "1901", "F X", "M Y"),
            person("C", "X", "1902", "F X", ""),
            person("D", "X", "1903", "F X", ""),
            person("E", "X", "1904", "", "M Y"),
        ];
        let flowchart = build(&persons);
        let mut seen = HashSet::new();
        for line in edge_lines(&flowchart) {
            assert!(seen.insert(line), "duplicate edge: {line}");
        }
    }

    #[test]
    fn family_colors_round_robin_and_stable() {
        let mut theme = Theme::classic();
        theme.palette = vec!["#a".to_string(), "#b".to_string()];
        let persons = vec![
            person("A", "Uno", "", "", ""),
            person("B", "Due", "", "", ""),
            person("C", "Uno", "", "", ""),
            person("D", "Tre", "", "", ""),
            person("E", "", "", "", ""),
        ];
        let flowchart = build_flowchart(&persons, &theme, &FlowchartConfig::default(), YEAR);
        assert_eq!(flowchart.families.get("Uno"), Some("#a"));
        assert_eq!(flowchart.families.get("Due"), Some("#b"));
        assert_eq!(flowchart.families.get("Tre"), Some("#a"));
        assert_eq!(flowchart.families.get("missing"), Some("#b"));
        let class_defs: Vec<_> = flowchart
            .lines
            .iter()
            .filter(|l| l.starts_with("classDef "))
            .cloned()
            .collect();
        assert_eq!(
            class_defs,
            vec![
                "classDef Uno fill:#a",
                "classDef Due fill:#b",
                "classDef Tre fill:#a",
                "classDef missing fill:#b",
            ]
        );
    }

    #[test]
    fn gender_mode_uses_sex_classes() {
        let config = FlowchartConfig {
            style_mode: StyleMode::Gender,
            direction: Direction::LeftRight,
            ..Default::default()
        };
        let mut anna = person("Anna", "Rossi", "", "", "");
        anna.gender = "F".to_string();
        let flowchart = build_flowchart(&[anna], &Theme::classic(), &config, YEAR);
        assert_eq!(
            flowchart.lines,
            vec![
                "graph LR",
                "classDef M fill:#ccf2ff",
                "classDef F fill:#ffe6ff",
                "Anna_Rossi[\"Anna Rossi ♀<br />? -\"]:::F",
            ]
        );
    }

    #[test]
    fn duplicate_names_are_suffixed() {
        let persons = vec![
            person("Mario", "Rossi", "1900", "", ""),
            person("Mario", "Rossi", "1930", "", ""),
        ];
        let text = build(&persons).text();
        assert!(text.contains("Mario_Rossi_2[\"Mario Rossi<br />1930 - (94)\"]"));
    }

    #[test]
    fn labels_escape_quotes_and_classes_are_sanitized() {
        let text = build(&[person("Gino \"Il Rosso\"", "D'Angelo", "", "", "")]).text();
        assert!(text.contains("#quot;Il Rosso#quot;"));
        assert!(text.contains(":::D_Angelo"));
        assert!(text.contains("classDef D_Angelo fill:"));
    }

    #[test]
    fn families_with_clashing_class_names_stay_apart() {
        let persons = vec![
            person("Gino", "D'Angelo", "", "", ""),
            person("Rita", "D Angelo", "", "", ""),
        ];
        let flowchart = build(&persons);
        let text = flowchart.text();
        assert_eq!(flowchart.families.class_of("D'Angelo"), Some("D_Angelo"));
        assert_eq!(flowchart.families.class_of("D_Angelo"), Some("D_Angelo_2"));
        assert!(text.contains(":::D_Angelo\n"));
        assert!(text.contains(":::D_Angelo_2"));
        assert!(text.contains("classDef D_Angelo fill:#5f0b2b"));
        assert!(text.contains("classDef D_Angelo_2 fill:#d11638"));
        let class_defs = text.lines().filter(|l| l.starts_with("classDef ")).count();
        assert_eq!(class_defs, 2);
    }

    #[test]
    fn merged_duplicate_children_draw_one_edge() {
        let config = FlowchartConfig {
            disambiguate_collisions: false,
            ..Default::default()
        };
        let persons = vec![
            person("Mario", "Bianchi", "1950", "Luigi Bianchi", "Anna Verdi"),
            person("Mario", "Bianchi", "1950", "Luigi Bianchi", "Anna Verdi"),
        ];
        let flowchart = build_flowchart(&persons, &Theme::classic(), &config, YEAR);
        let edges = edge_lines(&flowchart);
        let mut unique = edges.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(edges.len(), unique.len());
        assert_eq!(
            edges
                .iter()
                .filter(|l| l.starts_with("Luigi_Bianchi=Anna_Verdi --> Mario_Bianchi"))
                .count(),
            1
        );
        let styles = flowchart
            .lines
            .iter()
            .filter(|l| l.starts_with("linkStyle "))
            .count();
        // father and child edges are styled, the mother edge is not
        assert_eq!(styles, 2);
        assert_eq!(flowchart.edge_count, 3);
    }

    #[test]
    fn empty_input_yields_header_only() {
        let flowchart = build(&[]);
        assert_eq!(flowchart.lines, vec!["graph TD"]);
        assert!(flowchart.families.is_empty());
    }
}
