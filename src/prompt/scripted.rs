//! Scripted prompt - deterministic test double
//!
//! Plays back a queue of prepared answers, panicking loudly on any mismatch
//! between the script and the prompts a screen actually issues. Used by
//! integration tests to drive whole screen flows without a terminal.

use std::collections::VecDeque;

use anyhow::Result;
use async_trait::async_trait;

use super::{Answer, Prompt, SelectItem, Validator};

/// One prepared answer in a script.
#[derive(Debug, Clone)]
pub enum ScriptedAnswer {
    Select(String),
    Text(String),
    Confirm(bool),
    Cancel,
}

impl ScriptedAnswer {
    pub fn select(value: impl Into<String>) -> Self {
        Self::Select(value.into())
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    queue: VecDeque<ScriptedAnswer>,
}

impl ScriptedPrompt {
    pub fn new(answers: impl IntoIterator<Item = ScriptedAnswer>) -> Self {
        Self {
            queue: answers.into_iter().collect(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.queue.is_empty()
    }

    fn next(&mut self, kind: &str, message: &str) -> ScriptedAnswer {
        self.queue.pop_front().unwrap_or_else(|| {
            panic!("scripted prompt exhausted at {} prompt {:?}", kind, message)
        })
    }
}

#[async_trait]
impl Prompt for ScriptedPrompt {
    async fn select(&mut self, message: &str, items: &[SelectItem]) -> Result<Answer<String>> {
        match self.next("select", message) {
            ScriptedAnswer::Select(value) => {
                assert!(
                    items.iter().any(|i| i.value == value),
                    "scripted answer {:?} is not an option of {:?}",
                    value,
                    message
                );
                Ok(Answer::Value(value))
            }
            ScriptedAnswer::Cancel => Ok(Answer::Cancelled),
            other => panic!("expected select answer for {:?}, got {:?}", message, other),
        }
    }

    async fn text(
        &mut self,
        message: &str,
        _placeholder: &str,
        validate: Option<Validator>,
    ) -> Result<Answer<String>> {
        match self.next("text", message) {
            ScriptedAnswer::Text(value) => {
                if let Some(validate) = validate {
                    if let Some(err) = validate(&value) {
                        panic!("scripted answer {:?} rejected: {}", value, err);
                    }
                }
                Ok(Answer::Value(value))
            }
            ScriptedAnswer::Cancel => Ok(Answer::Cancelled),
            other => panic!("expected text answer for {:?}, got {:?}", message, other),
        }
    }

    async fn confirm(&mut self, message: &str) -> Result<Answer<bool>> {
        match self.next("confirm", message) {
            ScriptedAnswer::Confirm(value) => Ok(Answer::Value(value)),
            ScriptedAnswer::Cancel => Ok(Answer::Cancelled),
            other => panic!("expected confirm answer for {:?}, got {:?}", message, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn plays_back_in_order() {
        let mut prompt = ScriptedPrompt::new([
            ScriptedAnswer::select("A"),
            ScriptedAnswer::Confirm(true),
            ScriptedAnswer::Cancel,
        ]);

        let items = [SelectItem::new("A", "a"), SelectItem::new("B", "b")];
        assert_eq!(
            prompt.select("pick", &items).await.unwrap(),
            Answer::Value("A".to_string())
        );
        assert_eq!(
            prompt.confirm("sure?").await.unwrap(),
            Answer::Value(true)
        );
        assert!(prompt.text("name", "", None).await.unwrap().is_cancelled());
        assert!(prompt.is_exhausted());
    }
}
