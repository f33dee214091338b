use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "WindowConfig::default_title")]
    pub title: String,
    #[serde(default = "WindowConfig::default_width")]
    pub width: i32,
    #[serde(default = "WindowConfig::default_height")]
    pub height: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverlayConfig {
    /// How long a status/progress/log/error message stays on screen.
    #[serde(default = "OverlayConfig::default_text_display_ms")]
    pub text_display_ms: u64,
    #[serde(default = "OverlayConfig::default_font_size")]
    pub font_size: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnimationConfig {
    #[serde(default = "AnimationConfig::default_center_duration_ms")]
    pub center_duration_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ViewerConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
}

#[derive(Debug, Clone, Default)]
pub struct ViewerConfigOverrides {
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub text_display_ms: Option<u64>,
    pub center_duration_ms: Option<u64>,
}

impl WindowConfig {
    fn default_title() -> String {
        "Viewer".to_string()
    }

    const fn default_width() -> i32 {
        800
    }

    const fn default_height() -> i32 {
        600
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { title: Self::default_title(), width: Self::default_width(), height: Self::default_height() }
    }
}

impl OverlayConfig {
    const fn default_text_display_ms() -> u64 {
        3_000
    }

    const fn default_font_size() -> f32 {
        16.0
    }

    pub fn text_display_duration(&self) -> Duration {
        Duration::from_millis(self.text_display_ms)
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self { text_display_ms: Self::default_text_display_ms(), font_size: Self::default_font_size() }
    }
}

impl AnimationConfig {
    const fn default_center_duration_ms() -> u64 {
        300
    }

    pub fn center_duration(&self) -> Duration {
        Duration::from_millis(self.center_duration_ms)
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self { center_duration_ms: Self::default_center_duration_ms() }
    }
}

impl ViewerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let cfg = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(cfg)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                log::warn!("[config] load error: {err:?}. Falling back to defaults.");
                Self::default()
            }
        }
    }

    /// Applies `overrides` and returns the names of the fields it changed.
    pub fn apply_overrides(&mut self, overrides: &ViewerConfigOverrides) -> Vec<&'static str> {
        if overrides.is_empty() {
            return Vec::new();
        }
        if let Some(width) = overrides.width {
            self.window.width = width;
        }
        if let Some(height) = overrides.height {
            self.window.height = height;
        }
        if let Some(ms) = overrides.text_display_ms {
            self.overlay.text_display_ms = ms;
        }
        if let Some(ms) = overrides.center_duration_ms {
            self.animation.center_duration_ms = ms;
        }
        let fields = overrides.applied_fields();
        log::info!("[config] overrides applied: {}", fields.join(", "));
        fields
    }
}

impl ViewerConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self.width.is_none()
            && self.height.is_none()
            && self.text_display_ms.is_none()
            && self.center_duration_ms.is_none()
    }

    pub fn applied_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.width.is_some() {
            fields.push("width");
        }
        if self.height.is_some() {
            fields.push("height");
        }
        if self.text_display_ms.is_some() {
            fields.push("text_display_ms");
        }
        if self.center_duration_ms.is_some() {
            fields.push("center_duration_ms");
        }
        fields
    }
}
