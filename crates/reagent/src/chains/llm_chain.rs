use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use super::Chain;
use crate::errors::Result;
use crate::prompt_template::PromptTemplate;
use crate::providers::base::{GenerationParameters, Provider};

/// Formats a [`PromptTemplate`] with the input variables and asks the provider once
pub struct LlmChain {
    template: PromptTemplate,
    provider: Arc<dyn Provider>,
    params: GenerationParameters,
}

impl LlmChain {
    pub fn new(template: PromptTemplate, provider: Arc<dyn Provider>) -> Self {
        Self {
            template,
            provider,
            params: GenerationParameters::default(),
        }
    }

    pub fn with_parameters(mut self, params: GenerationParameters) -> Self {
        self.params = params;
        self
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }
}

#[async_trait]
impl Chain for LlmChain {
    type Input = HashMap<String, String>;
    type Output = String;

    async fn run(&mut self, input: Self::Input) -> Result<String> {
        let prompt = self.template.format(&input);
        Ok(self.provider.generate(&prompt, &self.params).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::ChainExt;
    use crate::providers::mock::MockProvider;
    use anyhow::Result;

    #[tokio::test]
    async fn test_formats_template_before_generating() -> Result<()> {
        let provider = MockProvider::new(vec!["Bonjour"]);
        let template = PromptTemplate::new("Translate '{text}' to {language}")
            .with_input_variables(["text", "language"]);
        let mut chain = LlmChain::new(template, Arc::new(provider.clone()));

        let input = HashMap::from([
            ("text".to_string(), "Hello".to_string()),
            ("language".to_string(), "French".to_string()),
        ]);
        assert_eq!(chain.run(input).await?, "Bonjour");
        assert_eq!(provider.prompts(), vec!["Translate 'Hello' to French"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_llm_chain_composes_with_string_chains() -> Result<()> {
        let provider = MockProvider::new(vec!["rust", "Rust is a systems language"]);
        let shared: Arc<dyn Provider> = Arc::new(provider.clone());

        let topic = LlmChain::new(PromptTemplate::new("Pick a topic about {area}"), shared.clone());
        let explain = crate::chains::ConversationChain::new(shared, Default::default());
        let mut chain = topic.then(explain);

        let input = HashMap::from([("area".to_string(), "programming".to_string())]);
        assert_eq!(chain.run(input).await?, "Rust is a systems language");
        assert_eq!(provider.prompts()[0], "Pick a topic about programming");
        assert_eq!(provider.prompts()[1], "user: rust");
        Ok(())
    }
}
