use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::base::{GenerationParameters, Provider, ProviderResult};

/// A mock provider that returns pre-configured responses for testing
#[derive(Clone)]
pub struct MockProvider {
    responses: Arc<Mutex<Vec<ProviderResult<String>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    /// Create a new mock provider with a sequence of responses
    pub fn new<S: Into<String>>(responses: Vec<S>) -> Self {
        Self::with_results(responses.into_iter().map(|r| Ok(r.into())).collect())
    }

    /// Create a mock provider whose calls may also fail
    pub fn with_results(responses: Vec<ProviderResult<String>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every prompt received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn generate(&self, prompt: &str, _params: &GenerationParameters) -> ProviderResult<String> {
        self.prompts.lock().push(prompt.to_string());
        let mut responses = self.responses.lock();
        if responses.is_empty() {
            Err(ProviderError::EmptyResponse)
        } else {
            responses.remove(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_then_runs_dry() {
        let provider = MockProvider::new(vec!["first"]);
        let params = GenerationParameters::default();

        assert_eq!(provider.generate("a", &params).await.unwrap(), "first");
        assert_eq!(
            provider.generate("b", &params).await,
            Err(ProviderError::EmptyResponse)
        );
        assert_eq!(provider.prompts(), vec!["a", "b"]);
    }
}
