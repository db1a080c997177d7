//! Final answer accumulation

use savant_config::AnswerScope;

/// Collects response text into the answer returned to the caller
#[derive(Debug, Clone)]
pub struct AnswerBuffer {
    scope: AnswerScope,
    text: String,
}

impl AnswerBuffer {
    pub fn new(scope: AnswerScope) -> Self {
        Self {
            scope,
            text: String::new(),
        }
    }

    /// Record the text of one response. With `FinalTurn` only the latest
    /// response is kept.
    pub fn observe(&mut self, text: &str) {
        if self.scope == AnswerScope::FinalTurn {
            self.text.clear();
        }
        self.text.push_str(text);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_answer(self) -> String {
        self.text
    }
}
