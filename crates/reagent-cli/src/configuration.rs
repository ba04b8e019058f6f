use crate::error::{to_env_var, ConfigError, ENV_PREFIX};
use config::{Config, Environment, File, FileFormat};
use reagent::agents::AgentKind;
use reagent::providers::base::GenerationParameters;
use reagent::providers::configs::{
    OllamaProviderConfig, OpenAiProviderConfig, ProviderConfig, OLLAMA_HOST, OLLAMA_MODEL,
    OPENAI_HOST, OPENAI_MODEL,
};
use reagent::token_counter::ModelFamily;
use reagent::ContextMemory;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type")]
pub enum ProviderSettings {
    OpenAi {
        #[serde(default = "default_openai_host")]
        host: String,
        api_key: String,
        #[serde(default = "default_openai_model")]
        model: String,
        #[serde(default)]
        temperature: Option<f32>,
        #[serde(default)]
        max_tokens: Option<u32>,
    },
    Ollama {
        #[serde(default = "default_ollama_host")]
        host: String,
        #[serde(default = "default_ollama_model")]
        model: String,
        #[serde(default)]
        temperature: Option<f32>,
        #[serde(default)]
        max_tokens: Option<u32>,
    },
}

impl ProviderSettings {
    pub fn model(&self) -> &str {
        match self {
            ProviderSettings::OpenAi { model, .. } | ProviderSettings::Ollama { model, .. } => model,
        }
    }

    // Split into the provider connection and the per-request sampling parameters
    pub fn into_parts(self) -> (ProviderConfig, GenerationParameters) {
        let (config, temperature, max_tokens) = match self {
            ProviderSettings::OpenAi {
                host,
                api_key,
                model,
                temperature,
                max_tokens,
            } => (
                ProviderConfig::OpenAi(OpenAiProviderConfig {
                    host,
                    api_key,
                    model,
                }),
                temperature,
                max_tokens,
            ),
            ProviderSettings::Ollama {
                host,
                model,
                temperature,
                max_tokens,
            } => (
                ProviderConfig::Ollama(OllamaProviderConfig { host, model }),
                temperature,
                max_tokens,
            ),
        };

        let mut params = GenerationParameters::default();
        if let Some(temperature) = temperature {
            params = params.with_temperature(temperature);
        }
        if let Some(max_tokens) = max_tokens {
            params = params.with_max_tokens(max_tokens);
        }
        (config, params)
    }
}

#[derive(Debug, Deserialize)]
pub struct AgentSettings {
    #[serde(default)]
    pub kind: AgentKind,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default)]
    pub verbose: bool,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            kind: AgentKind::default(),
            max_iterations: default_max_iterations(),
            verbose: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MemorySettings {
    #[serde(default)]
    pub max_messages: Option<usize>,
    #[serde(default)]
    pub max_tokens: Option<usize>,
    /// Falls back to a guess from the provider's model name
    #[serde(default)]
    pub model: Option<ModelFamily>,
}

impl MemorySettings {
    pub fn build(&self, provider_model: &str) -> ContextMemory {
        let model = self
            .model
            .unwrap_or_else(|| ModelFamily::from_model_name(provider_model));
        ContextMemory::new(self.max_tokens, self.max_messages, model)
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub provider: ProviderSettings,
    #[serde(default)]
    pub agent: AgentSettings,
    #[serde(default)]
    pub memory: MemorySettings,
}

impl Settings {
    /// Defaults, then the optional TOML file, then `REAGENT_*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("agent.kind", AgentKind::default().as_str())?
            .set_default("agent.max_iterations", default_max_iterations() as i64)?
            .set_default("agent.verbose", false)?
            .set_default("memory.max_messages", default_max_messages() as i64)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let result: Result<Self, config::ConfigError> = config.try_deserialize();

        match result {
            Ok(settings) => Ok(settings),
            Err(err) => {
                tracing::debug!("Configuration error: {:?}", &err);

                if let Some(field) = missing_field(&err.to_string()) {
                    Err(ConfigError::MissingEnvVar {
                        env_var: to_env_var(&field),
                    })
                } else if let config::ConfigError::NotFound(field) = &err {
                    Err(ConfigError::MissingEnvVar {
                        env_var: to_env_var(field),
                    })
                } else {
                    Err(ConfigError::Other(err))
                }
            }
        }
    }
}

// "missing field `api_key` for key `provider`" -> "provider.api_key"
fn missing_field(message: &str) -> Option<String> {
    let rest = message.strip_prefix("missing field `")?;
    let (field, rest) = rest.split_once('`')?;
    let parent = rest
        .strip_prefix(" for key `")
        .and_then(|rest| rest.split_once('`'))
        .map(|(key, _)| key);
    Some(match parent {
        Some(parent) => format!("{}.{}", parent, field),
        None => field.to_string(),
    })
}

fn default_max_iterations() -> usize {
    reagent::agents::react::DEFAULT_MAX_ITERATIONS
}

fn default_max_messages() -> usize {
    50
}

fn default_openai_host() -> String {
    OPENAI_HOST.to_string()
}

fn default_openai_model() -> String {
    OPENAI_MODEL.to_string()
}

fn default_ollama_host() -> String {
    OLLAMA_HOST.to_string()
}

fn default_ollama_model() -> String {
    OLLAMA_MODEL.to_string()
}
