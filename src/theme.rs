use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub text_color: String,
    pub box_stroke: String,
    pub line_color: String,
    /// Fill for individuals without a stored color.
    pub default_fill: String,
    pub expander_fill: String,
    pub background: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 12.0,
            text_color: "#000".to_string(),
            box_stroke: "#000".to_string(),
            line_color: "#000".to_string(),
            default_fill: "#FFF".to_string(),
            expander_fill: "#FFF".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 12.0,
            text_color: "#1C2430".to_string(),
            box_stroke: "#7A8AA6".to_string(),
            line_color: "#7A8AA6".to_string(),
            default_fill: "#FFF".to_string(),
            expander_fill: "#EEF2F8".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
