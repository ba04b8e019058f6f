use super::{
    base::{Provider, ProviderResult},
    configs::ProviderConfig,
    ollama::OllamaProvider,
    openai::OpenAiProvider,
};

pub fn get_provider(config: ProviderConfig) -> ProviderResult<Box<dyn Provider>> {
    match config {
        ProviderConfig::OpenAi(openai_config) => Ok(Box::new(OpenAiProvider::new(openai_config)?)),
        ProviderConfig::Ollama(ollama_config) => Ok(Box::new(OllamaProvider::new(ollama_config)?)),
    }
}
