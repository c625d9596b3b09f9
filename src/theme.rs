use serde::{Deserialize, Serialize};

const CLASSIC_PALETTE: [&str; 17] = [
    "#5f0b2b", "#d11638", "#f08801", "#face00", "#ada20b", "#d6e738", "#fb97ab", "#27c346",
    "#fda7c5", "#fdcbea", "#8173c6", "#b9eaee", "#a52fa5", "#7260c6", "#e1c6fb", "#f7b193",
    "#e4c029",
];

const PASTEL_PALETTE: [&str; 12] = [
    "#8DD3C7", "#FFFFB3", "#BEBADA", "#FB8072", "#80B1D3", "#FDB462", "#B3DE69", "#FCCDE5",
    "#D9D9D9", "#BC80BD", "#CCEBC5", "#FFED6F",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    /// Family colors, handed out round-robin in first-seen surname order.
    pub palette: Vec<String>,
    pub male_color: String,
    pub female_color: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            palette: CLASSIC_PALETTE.iter().map(|c| c.to_string()).collect(),
            male_color: "#ccf2ff".to_string(),
            female_color: "#ffe6ff".to_string(),
        }
    }

    pub fn pastel() -> Self {
        Self {
            palette: PASTEL_PALETTE.iter().map(|c| c.to_string()).collect(),
            male_color: "#DEEBF7".to_string(),
            female_color: "#FDE0EF".to_string(),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "classic" | "default" => Some(Self::classic()),
            "pastel" => Some(Self::pastel()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
