//! Error types with fix suggestions

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum XtlError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] anyhow::Error),
}

impl FixSuggestion for XtlError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            XtlError::Io(_) => Some("Check file path and permissions"),
            XtlError::Settings(_) => {
                Some("Delete the settings file to regenerate defaults")
            }
            XtlError::Prompt(_) => Some("Run xtl inside an interactive terminal"),
        }
    }
}
