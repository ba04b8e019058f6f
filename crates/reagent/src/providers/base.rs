use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::models::message::Message;

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Sampling parameters forwarded to the model. Unset options are omitted from requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters {
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: None,
            top_p: None,
            frequency_penalty: None,
            presence_penalty: None,
        }
    }
}

impl GenerationParameters {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_frequency_penalty(mut self, penalty: f32) -> Self {
        self.frequency_penalty = Some(penalty);
        self
    }

    pub fn with_presence_penalty(mut self, penalty: f32) -> Self {
        self.presence_penalty = Some(penalty);
        self
    }
}

/// Base trait for LLM providers (OpenAI, Ollama, etc)
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate a completion for a single prompt
    async fn generate(&self, prompt: &str, params: &GenerationParameters) -> ProviderResult<String>;

    /// Generate with default parameters
    async fn complete(&self, prompt: &str) -> ProviderResult<String> {
        self.generate(prompt, &GenerationParameters::default()).await
    }

    /// Generate the next assistant turn for a conversation.
    ///
    /// Providers without a native chat endpoint get the conversation flattened into
    /// `role: text` lines.
    async fn chat(&self, messages: &[Message], params: &GenerationParameters) -> ProviderResult<String> {
        let transcript = messages
            .iter()
            .filter_map(|message| {
                message
                    .text_content()
                    .map(|text| format!("{}: {}", message.role, text))
            })
            .collect::<Vec<_>>()
            .join("\n");
        self.generate(&transcript, params).await
    }
}
