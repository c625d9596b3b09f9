use family_tree_mermaid::{Config, Diagrams, Theme, render_csv};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FamilyTreeOptions {
    theme: Option<String>,
    reference_year: Option<i32>,
    timeline_title: Option<String>,
    union_label: Option<String>,
}

#[derive(Debug, Serialize)]
struct DiagramsJson {
    flowchart: String,
    timeline: String,
}

impl From<Diagrams> for DiagramsJson {
    fn from(diagrams: Diagrams) -> Self {
        Self {
            flowchart: diagrams.flowchart,
            timeline: diagrams.timeline,
        }
    }
}

fn build_config(options: FamilyTreeOptions) -> Config {
    let mut config = Config::default();
    if let Some(theme) = options.theme.as_deref().and_then(Theme::by_name) {
        config.theme = theme;
    }
    if let Some(title) = options.timeline_title {
        config.timeline.title = title;
    }
    if let Some(label) = options.union_label {
        config.flowchart.union_label = label;
    }
    config.reference_year = options.reference_year;
    config
}

/// Returns `{"flowchart": ..., "timeline": ...}` as a JSON string.
#[wasm_bindgen]
pub fn render_family_tree(csv: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<FamilyTreeOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        FamilyTreeOptions::default()
    };

    let diagrams = render_csv(csv, &build_config(options))
        .map_err(|error| JsValue::from_str(&error.to_string()))?;
    serde_json::to_string(&DiagramsJson::from(diagrams))
        .map_err(|error| JsValue::from_str(&error.to_string()))
}

#[cfg(test)]
mod tests {
    use family_tree_mermaid::render_csv;

    use crate::{FamilyTreeOptions, build_config};

    #[test]
    fn renders_both_diagrams_with_options() {
        let csv = "Nome,Cognome,data nascita,luogo nascita,data morte,luogo morte,sesso,padre,madre,dettagli
Luigi,Bianchi,1920,,1990,,M,,,
Mario,Bianchi,1950,,,,M,Luigi Bianchi,,
Paolo,Bianchi,1952,,,,M,Luigi Bianchi,,";

        let options: FamilyTreeOptions = serde_json::from_str(
            r#"{"referenceYear": 2000, "timelineTitle": "Bianchi", "unionLabel": "Union"}"#,
        )
        .unwrap();
        let diagrams = render_csv(csv, &build_config(options)).expect("sheet should render");

        assert!(diagrams.flowchart.contains("Luigi_Bianchi=(Union)"));
        assert!(diagrams.flowchart.contains("Luigi_Bianchi=[[Missing ancestor]]"));
        assert!(diagrams.timeline.contains("title Bianchi"));
        assert!(diagrams.timeline.contains("Mario_Bianchi :1950, 18000d"));
    }
}
