use tracing::debug;

use crate::models::message::Message;
use crate::models::role::Role;
use crate::token_counter::{ModelFamily, TokenCounter};

/// Bounded conversational buffer.
///
/// After every [`add_message`](Self::add_message) the retained window holds at most
/// `max_messages` entries and its estimated token total stays within `max_tokens`.
/// Both limits drop from the oldest end. The memory is owned by one agent or chain;
/// cloning it yields an independent snapshot.
#[derive(Debug, Clone, Default)]
pub struct ContextMemory {
    messages: Vec<Message>,
    max_tokens: Option<usize>,
    max_messages: Option<usize>,
    counter: TokenCounter,
}

impl ContextMemory {
    pub fn new(max_tokens: Option<usize>, max_messages: Option<usize>, model: ModelFamily) -> Self {
        Self {
            messages: Vec::new(),
            max_tokens,
            max_messages,
            counter: TokenCounter::new(model),
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_max_messages(mut self, max_messages: usize) -> Self {
        self.max_messages = Some(max_messages);
        self
    }

    pub fn max_tokens(&self) -> Option<usize> {
        self.max_tokens
    }

    pub fn max_messages(&self) -> Option<usize> {
        self.max_messages
    }

    pub fn model(&self) -> ModelFamily {
        self.counter.model()
    }

    /// Append a message, then trim to the configured limits
    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
        self.trim_if_needed();
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

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Render retained messages as `role: text` lines. Messages without text are skipped.
    pub fn as_prompt_context(&self) -> String {
        self.messages
            .iter()
            .filter_map(|message| {
                message
                    .text_content()
                    .filter(|text| !text.is_empty())
                    .map(|text| format!("{}: {}", message.role, text))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn last_user_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|message| message.role == Role::User)
    }

    /// Estimated token total of the retained window
    pub fn estimated_tokens(&self) -> usize {
        self.messages
            .iter()
            .map(|message| self.counter.message_tokens(message))
            .sum()
    }

    fn trim_if_needed(&mut self) {
        let before = self.messages.len();

        if let Some(max_messages) = self.max_messages {
            if self.messages.len() > max_messages {
                let excess = self.messages.len() - max_messages;
                self.messages.drain(..excess);
            }
        }

        if let Some(max_tokens) = self.max_tokens {
            // keep the longest suffix whose running total, newest first, fits the budget
            let mut total = 0;
            let mut keep_from = self.messages.len();
            for (index, message) in self.messages.iter().enumerate().rev() {
                let tokens = self.counter.message_tokens(message);
                if total + tokens > max_tokens {
                    break;
                }
                total += tokens;
                keep_from = index;
            }
            self.messages.drain(..keep_from);
        }

        let dropped = before - self.messages.len();
        if dropped > 0 {
            debug!(dropped, retained = self.messages.len(), "trimmed context memory");
        }
    }
}
