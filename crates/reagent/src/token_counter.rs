use serde::{Deserialize, Serialize};

use crate::models::message::Message;

/// Rough token cost charged for every image reference in a message
pub const IMAGE_TOKEN_ESTIMATE: usize = 85;

/// Model families with a known average characters-per-token ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFamily {
    Gpt3,
    Gpt4,
    Mistral,
    Custom(usize),
}

impl Default for ModelFamily {
    fn default() -> Self {
        ModelFamily::Gpt4
    }
}

impl ModelFamily {
    pub fn chars_per_token(&self) -> usize {
        match self {
            ModelFamily::Gpt3 => 4,
            ModelFamily::Gpt4 | ModelFamily::Mistral => 3,
            // a zero ratio would divide by zero
            ModelFamily::Custom(ratio) => (*ratio).max(1),
        }
    }

    /// Guess the family from a provider model name, defaulting to gpt-4
    pub fn from_model_name(model_name: &str) -> Self {
        let model_name = model_name.to_lowercase();
        if model_name.contains("gpt-3") {
            ModelFamily::Gpt3
        } else if model_name.contains("mistral") || model_name.contains("mixtral") {
            ModelFamily::Mistral
        } else {
            ModelFamily::Gpt4
        }
    }
}

/// Cheap, tokenizer-free token estimates
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenCounter {
    model: ModelFamily,
}

impl TokenCounter {
    pub fn new(model: ModelFamily) -> Self {
        Self { model }
    }

    pub fn model(&self) -> ModelFamily {
        self.model
    }

    /// Characters divided by the model's characters-per-token ratio
    pub fn estimate(&self, text: &str) -> usize {
        text.chars().count() / self.model.chars_per_token()
    }

    /// Keep the prefix of `text` that fits within `max_tokens`
    pub fn truncate(&self, text: &str, max_tokens: usize) -> String {
        let max_chars = max_tokens.saturating_mul(self.model.chars_per_token());
        text.chars().take(max_chars).collect()
    }

    /// Estimate used for context trimming: whitespace-delimited words of the text
    /// plus a flat surcharge per image.
    pub fn message_tokens(&self, message: &Message) -> usize {
        let text_tokens = message
            .text_content()
            .map(|text| text.split_whitespace().count())
            .unwrap_or(0);
        text_tokens + message.image_urls().len() * IMAGE_TOKEN_ESTIMATE
    }
}
