//! Prompt service - select/text/confirm with a cancellation sentinel
//!
//! Screens depend on this trait, never on a concrete widget implementation.
//! Cancellation is a first-class outcome distinct from success and failure:
//! handlers treat [`Answer::Cancelled`] as "return to a safe prior screen".

mod scripted;
mod term;

pub use scripted::{ScriptedAnswer, ScriptedPrompt};
pub use term::TermPrompt;

use anyhow::Result;
use async_trait::async_trait;

/// Outcome of a prompt: a value, or the user backed out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer<T> {
    Value(T),
    Cancelled,
}

impl<T> Answer<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Answer::Cancelled)
    }

    pub fn value(self) -> Option<T> {
        match self {
            Answer::Value(v) => Some(v),
            Answer::Cancelled => None,
        }
    }
}

/// One choice in a select prompt.
#[derive(Debug, Clone)]
pub struct SelectItem {
    pub value: String,
    pub label: String,
    pub hint: Option<String>,
}

impl SelectItem {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            hint: None,
        }
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Input validator: `Some(message)` rejects the value.
pub type Validator = fn(&str) -> Option<String>;

/// The interactive prompt abstraction consumed by every screen.
#[async_trait]
pub trait Prompt: Send {
    /// Pick one of `items`; resolves to the chosen item's `value`.
    async fn select(&mut self, message: &str, items: &[SelectItem]) -> Result<Answer<String>>;

    /// Free-form text entry with optional validation.
    async fn text(
        &mut self,
        message: &str,
        placeholder: &str,
        validate: Option<Validator>,
    ) -> Result<Answer<String>>;

    /// Yes/no confirmation.
    async fn confirm(&mut self, message: &str) -> Result<Answer<bool>>;
}
