use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn a session file into a [`crate::session::SessionDocument`].
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to read session file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed session XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("malformed XML attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),
    #[error("malformed session document: {0}")]
    Malformed(String),
}

/// Diagnostics collected while reconstructing the windows of a session.
///
/// Every variant flips the aggregate `ok` flag of the restoration result.
#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("Could not find GUI state element.")]
    MissingGuiState,
    #[error("Could not find view key attribute for view element #{index}.")]
    MissingViewKind { index: usize },
    #[error("Unknown view for key {kind}.")]
    UnknownViewKind { kind: String },
    #[error("View factory for key {kind} failed to create a window")]
    FactoryFailed {
        kind: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Saved bounds that could not be applied. Logged only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("missing bounds attribute '{attribute}'")]
    MissingAttribute { attribute: &'static str },
    #[error("bounds attribute '{attribute}' is not an integer: '{value}'")]
    InvalidInteger { attribute: &'static str, value: String },
    #[error("view '{kind}' cannot be positioned")]
    NotPositionable { kind: String },
}
