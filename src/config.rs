use crate::error::{Error, Result};
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    TopDown,
    BottomUp,
    LeftRight,
    RightLeft,
}

impl Direction {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "TD" | "TB" => Some(Self::TopDown),
            "BT" => Some(Self::BottomUp),
            "LR" => Some(Self::LeftRight),
            "RL" => Some(Self::RightLeft),
            _ => None,
        }
    }

    pub fn as_token(self) -> &'static str {
        match self {
            Self::TopDown => "TD",
            Self::BottomUp => "BT",
            Self::LeftRight => "LR",
            Self::RightLeft => "RL",
        }
    }
}

/// How person nodes are tinted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StyleMode {
    /// One class per family, declared after all nodes.
    Family,
    /// `M` / `F` classes declared up front, nodes tagged with their gender code.
    Gender,
}

impl StyleMode {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "family" | "surname" => Some(Self::Family),
            "gender" | "sex" => Some(Self::Gender),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowchartConfig {
    pub direction: Direction,
    pub union_label: String,
    pub missing_ancestor_label: String,
    pub style_mode: StyleMode,
    pub disambiguate_collisions: bool,
}

impl Default for FlowchartConfig {
    fn default() -> Self {
        Self {
            direction: Direction::TopDown,
            union_label: "Marriage".to_string(),
            missing_ancestor_label: "Missing ancestor".to_string(),
            style_mode: StyleMode::Family,
            disambiguate_collisions: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineConfig {
    pub title: String,
    pub date_format: String,
    pub axis_format: String,
    /// Years assumed when the age cannot be computed.
    pub default_lifespan: i32,
    /// Length of the schematic year used for bar durations.
    pub days_per_year: i32,
    pub parent_age_base: f64,
    pub parent_age_slope: f64,
    pub parent_age_pivot_year: i32,
}

impl TimelineConfig {
    /// Estimated age of a parent when a child was born in `child_year`.
    pub fn parent_age_at(&self, child_year: i32) -> i32 {
        let years = f64::from(child_year) - f64::from(self.parent_age_pivot_year);
        // `as` saturates, so absurd years cannot wrap
        (years * self.parent_age_slope + self.parent_age_base).round() as i32
    }
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            title: "Annali".to_string(),
            date_format: "YYYY".to_string(),
            axis_format: "%Y".to_string(),
            default_lifespan: 70,
            days_per_year: 360,
            parent_age_base: 20.3,
            parent_age_slope: 0.1,
            parent_age_pivot_year: 1900,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub flowchart_file: String,
    pub timeline_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            flowchart_file: "ancestor.mermaid".to_string(),
            timeline_file: "ancestor_gantt.mermaid".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub flowchart: FlowchartConfig,
    pub timeline: TimelineConfig,
    pub output: OutputConfig,
    /// Fixed "current year" for ages of living persons.
    pub reference_year: Option<i32>,
}

impl Config {
    pub fn current_year(&self) -> i32 {
        self.reference_year.unwrap_or_else(crate::dates::current_year)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlowchartConfigFile {
    direction: Option<String>,
    union_label: Option<String>,
    missing_ancestor_label: Option<String>,
    style_mode: Option<String>,
    disambiguate_collisions: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimelineConfigFile {
    title: Option<String>,
    date_format: Option<String>,
    axis_format: Option<String>,
    default_lifespan: Option<i32>,
    days_per_year: Option<i32>,
    parent_age_base: Option<f64>,
    parent_age_slope: Option<f64>,
    parent_age_pivot_year: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OutputConfigFile {
    flowchart_file: Option<String>,
    timeline_file: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    palette: Option<Vec<String>>,
    male_color: Option<String>,
    female_color: Option<String>,
    flowchart: Option<FlowchartConfigFile>,
    timeline: Option<TimelineConfigFile>,
    output: Option<OutputConfigFile>,
    reference_year: Option<i32>,
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&contents).map_err(|reason| Error::Config {
        path: path.to_path_buf(),
        reason,
    })
}

/// Strict JSON first, JSON5 (comments, trailing commas) as a fallback.
pub fn parse_config(contents: &str) -> std::result::Result<Config, String> {
    let parsed: ConfigFile = match serde_json::from_str(contents) {
        Ok(parsed) => parsed,
        Err(json_err) => json5::from_str(contents).map_err(|_| json_err.to_string())?,
    };

    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme =
            Theme::by_name(theme_name).ok_or_else(|| format!("unknown theme `{theme_name}`"))?;
    }
    if let Some(palette) = parsed.palette {
        if palette.is_empty() {
            return Err("palette must not be empty".to_string());
        }
        config.theme.palette = palette;
    }
    if let Some(v) = parsed.male_color {
        config.theme.male_color = v;
    }
    if let Some(v) = parsed.female_color {
        config.theme.female_color = v;
    }

    if let Some(flowchart) = parsed.flowchart {
        if let Some(token) = flowchart.direction {
            config.flowchart.direction = Direction::from_token(&token)
                .ok_or_else(|| format!("unknown direction `{token}`"))?;
        }
        if let Some(v) = flowchart.union_label {
            config.flowchart.union_label = v;
        }
        if let Some(v) = flowchart.missing_ancestor_label {
            config.flowchart.missing_ancestor_label = v;
        }
        if let Some(token) = flowchart.style_mode {
            config.flowchart.style_mode = StyleMode::from_token(&token)
                .ok_or_else(|| format!("unknown style mode `{token}`"))?;
        }
        if let Some(v) = flowchart.disambiguate_collisions {
            config.flowchart.disambiguate_collisions = v;
        }
    }

    if let Some(timeline) = parsed.timeline {
        if let Some(v) = timeline.title {
            config.timeline.title = v;
        }
        if let Some(v) = timeline.date_format {
            config.timeline.date_format = v;
        }
        if let Some(v) = timeline.axis_format {
            config.timeline.axis_format = v;
        }
        if let Some(v) = timeline.default_lifespan {
            config.timeline.default_lifespan = v;
        }
        if let Some(v) = timeline.days_per_year {
            config.timeline.days_per_year = v;
        }
        if let Some(v) = timeline.parent_age_base {
            config.timeline.parent_age_base = v;
        }
        if let Some(v) = timeline.parent_age_slope {
            config.timeline.parent_age_slope = v;
        }
        if let Some(v) = timeline.parent_age_pivot_year {
            config.timeline.parent_age_pivot_year = v;
        }
    }

    if let Some(output) = parsed.output {
        if let Some(v) = output.flowchart_file {
            config.output.flowchart_file = v;
        }
        if let Some(v) = output.timeline_file {
            config.output.timeline_file = v;
        }
    }

    config.reference_year = parsed.reference_year;

    Ok(config)
}
