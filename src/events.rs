use std::fmt;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub enum StatusKind {
    Status(String),
    /// Fraction in `[0, 1]`.
    Progress(f64),
    Log(String),
    Error(String),
}

/// One status input addressed to a window, stamped when it was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub created_at: Instant,
}

impl StatusMessage {
    pub fn new(kind: StatusKind) -> Self {
        Self { kind, created_at: Instant::now() }
    }

    pub fn status(text: impl Into<String>) -> Self {
        Self::new(StatusKind::Status(text.into()))
    }

    pub fn progress(fraction: f64) -> Self {
        Self::new(StatusKind::Progress(fraction))
    }

    pub fn log(text: impl Into<String>) -> Self {
        Self::new(StatusKind::Log(text.into()))
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(StatusKind::Error(text.into()))
    }

    /// Text shown by the transient overlay. All four kinds collapse to plain text.
    pub fn overlay_text(&self) -> String {
        match &self.kind {
            StatusKind::Status(text) | StatusKind::Log(text) | StatusKind::Error(text) => text.clone(),
            StatusKind::Progress(fraction) => format_percentage(*fraction),
        }
    }
}

pub fn format_percentage(fraction: f64) -> String {
    let fraction = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 0.0 };
    format!("{}%", (fraction * 100.0).round() as i64)
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            StatusKind::Status(text) => write!(f, "Status {text}"),
            StatusKind::Progress(fraction) => write!(f, "Progress {}", format_percentage(*fraction)),
            StatusKind::Log(text) => write!(f, "Log {text}"),
            StatusKind::Error(text) => write!(f, "Error {text}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_rounds_to_percentage() {
        assert_eq!(StatusMessage::progress(0.456).overlay_text(), "46%");
        assert_eq!(StatusMessage::progress(0.1).overlay_text(), "10%");
        assert_eq!(StatusMessage::progress(1.7).overlay_text(), "100%");
        assert_eq!(StatusMessage::progress(f64::NAN).overlay_text(), "0%");
    }

    #[test]
    fn text_kinds_pass_through() {
        assert_eq!(StatusMessage::error("disk full").overlay_text(), "disk full");
        assert_eq!(StatusMessage::log("tracking").to_string(), "Log tracking");
    }
}
