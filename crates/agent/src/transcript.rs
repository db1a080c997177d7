//! Conversation state for a single run

use savant_provider::{ContentBlock, Message, Role};

/// Append-only sequence of turns, seeded with the user's question.
///
/// Turns cannot be removed or edited once pushed.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Start a transcript with the question as the first user turn
    pub fn new(question: &str) -> Self {
        Self {
            messages: vec![Message::user_text(question)],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Append the assistant turn that produced tool requests
    pub fn push_assistant(&mut self, content: Vec<ContentBlock>) {
        self.push(Message::assistant(content));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// The question this transcript was seeded with
    pub fn question(&self) -> String {
        self.messages.first().map(Message::text).unwrap_or_default()
    }

    /// Ids of tool results that do not match exactly one request in the turn
    /// before them. Empty for a well-formed transcript.
    pub fn orphan_results(&self) -> Vec<String> {
        let mut orphans = Vec::new();
        for (i, message) in self.messages.iter().enumerate() {
            if message.role != Role::User {
                continue;
            }
            let requested: Vec<&str> = match i.checked_sub(1).map(|p| &self.messages[p]) {
                Some(prev) if prev.role == Role::Assistant => prev
                    .content
                    .iter()
                    .filter_map(|block| match block {
                        ContentBlock::ToolUse { id, .. } => Some(id.as_str()),
                        _ => None,
                    })
                    .collect(),
                _ => Vec::new(),
            };
            for block in &message.content {
                if let ContentBlock::ToolResult { tool_use_id, .. } = block {
                    let matches = requested
                        .iter()
                        .filter(|&&id| id == tool_use_id.as_str())
                        .count();
                    if matches != 1 {
                        orphans.push(tool_use_id.clone());
                    }
                }
            }
        }
        orphans
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}
