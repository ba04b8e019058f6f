use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use super::base::{GenerationParameters, Provider, ProviderResult};
use super::configs::OpenAiProviderConfig;
use super::utils::{build_payload, messages_to_openai_spec, openai_response_to_text, post};
use crate::models::message::Message;

pub struct OpenAiProvider {
    client: Client,
    config: OpenAiProviderConfig,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiProviderConfig) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;

        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.host.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    async fn generate(&self, prompt: &str, params: &GenerationParameters) -> ProviderResult<String> {
        let messages = vec![json!({"role": "user", "content": prompt})];
        let payload = build_payload(&self.config.model, messages, params);
        let response = post(&self.client, &self.url(), Some(&self.config.api_key), &payload).await?;
        openai_response_to_text(&response)
    }

    async fn chat(&self, messages: &[Message], params: &GenerationParameters) -> ProviderResult<String> {
        let payload = build_payload(&self.config.model, messages_to_openai_spec(messages), params);
        let response = post(&self.client, &self.url(), Some(&self.config.api_key), &payload).await?;
        openai_response_to_text(&response)
    }
}
