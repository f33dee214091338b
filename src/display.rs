use serde::Deserialize;

/// How the model overlay draws spots. Shared by every view of a session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "DisplaySettings::default_spot_color")]
    pub spot_color: [f32; 4],
    #[serde(default = "DisplaySettings::default_selection_color")]
    pub selection_color: [f32; 4],
    #[serde(default = "DisplaySettings::default_text_color")]
    pub text_color: [f32; 4],
    #[serde(default)]
    pub show_labels: bool,
    /// Multiplier applied to the spot radius before drawing.
    #[serde(default = "DisplaySettings::default_radius_ratio")]
    pub radius_ratio: f64,
}

impl DisplaySettings {
    fn default_spot_color() -> [f32; 4] {
        [0.8, 0.0, 0.8, 1.0]
    }

    fn default_selection_color() -> [f32; 4] {
        [0.0, 1.0, 0.0, 1.0]
    }

    fn default_text_color() -> [f32; 4] {
        [1.0, 1.0, 1.0, 1.0]
    }

    const fn default_radius_ratio() -> f64 {
        1.0
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            spot_color: Self::default_spot_color(),
            selection_color: Self::default_selection_color(),
            text_color: Self::default_text_color(),
            show_labels: false,
            radius_ratio: Self::default_radius_ratio(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_uses_defaults() {
        let settings = DisplaySettings::from_json("{}").expect("parses");
        assert_eq!(settings, DisplaySettings::default());
    }

    #[test]
    fn json_overrides_labels_and_ratio() {
        let settings = DisplaySettings::from_json(r#"{ "show_labels": true, "radius_ratio": 0.5 }"#).expect("parses");
        assert!(settings.show_labels);
        assert_eq!(settings.radius_ratio, 0.5);
    }
}
