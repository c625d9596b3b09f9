use crate::config::Config;
use crate::error::{Error, Result};
use crate::flowchart::build_flowchart;
use crate::identity::RenderKeys;
use crate::parser::parse_csv;
use crate::record::{Person, normalize};
use crate::timeline::build_timeline;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagrams {
    pub flowchart: String,
    pub timeline: String,
}

pub fn render_flowchart(persons: &[Person], config: &Config) -> String {
    build_flowchart(
        persons,
        &config.theme,
        &config.flowchart,
        config.current_year(),
    )
    .text()
}

pub fn render_timeline(persons: &[Person], config: &Config) -> String {
    let keys = RenderKeys::assign(persons, config.flowchart.disambiguate_collisions);
    build_timeline(persons, &keys, &config.timeline, config.current_year()).text()
}

pub fn render_diagrams(persons: &[Person], config: &Config) -> Diagrams {
    Diagrams {
        flowchart: render_flowchart(persons, config),
        timeline: render_timeline(persons, config),
    }
}

/// Renders both diagrams straight from CSV text (header row included).
pub fn render_csv(input: &str, config: &Config) -> Result<Diagrams> {
    let rows = parse_csv(input);
    if rows.is_empty() {
        return Err(Error::InvalidInput("no header row".to_string()));
    }
    let persons = normalize(&rows);
    Ok(render_diagrams(&persons, config))
}

/// Writes `content` to `output`, or to stdout when there is no path.
pub fn write_text(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|source| Error::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            std::fs::write(path, content).map_err(|source| Error::Io {
                path: path.to_path_buf(),
                source,
            })?;
            tracing::debug!(path = %path.display(), bytes = content.len(), "wrote diagram");
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
