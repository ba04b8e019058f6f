pub mod chat;
pub mod run;
pub mod tools;

use anyhow::{anyhow, Result};
use bat::PrettyPrinter;
use reagent::providers::base::Provider;
use reagent::providers::factory::get_provider;
use reagent::tools::{default_tools, Tool};
use reagent::{AgentBuilder, AgentKind, ToolRegistry};
use std::sync::Arc;

use crate::configuration::Settings;

pub fn tool_registry() -> ToolRegistry {
    let registry = ToolRegistry::new();
    for tool in default_tools() {
        registry.register(tool);
    }
    registry
}

/// Registered tools in name order, so prompts list them the same way every run
pub fn sorted_tools(registry: &ToolRegistry) -> Vec<Arc<dyn Tool>> {
    registry
        .names()
        .iter()
        .filter_map(|name| registry.get(name))
        .collect()
}

/// Provider, default tools, memory and limits from the settings, ready for `kind`
pub fn agent_builder(settings: Settings, kind: AgentKind) -> Result<AgentBuilder> {
    let memory = settings.memory.build(settings.provider.model());
    let (provider_config, params) = settings.provider.into_parts();
    let provider: Arc<dyn Provider> = Arc::from(get_provider(provider_config)?);

    Ok(AgentBuilder::new()
        .provider(provider)
        .tools(sorted_tools(&tool_registry()))
        .kind(kind)
        .max_iterations(settings.agent.max_iterations)
        .verbose(settings.agent.verbose)
        .memory(memory)
        .parameters(params))
}

pub fn render(content: &str) -> Result<()> {
    PrettyPrinter::new()
        .input_from_bytes(content.as_bytes())
        .language("markdown")
        .print()
        .map_err(|e| anyhow!("failed to render output: {}", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::{AgentSettings, MemorySettings, ProviderSettings};
    use reagent::Agent;

    fn ollama_settings() -> Settings {
        Settings {
            provider: ProviderSettings::Ollama {
                host: "http://localhost:11434".to_string(),
                model: "qwen2.5".to_string(),
                temperature: None,
                max_tokens: None,
            },
            agent: AgentSettings::default(),
            memory: MemorySettings::default(),
        }
    }

    #[test]
    fn test_tool_registry_has_defaults() {
        assert_eq!(
            tool_registry().names(),
            vec!["calculator", "database", "search", "weather"]
        );
    }

    #[test]
    fn test_sorted_tools_follow_names() {
        let names: Vec<String> = sorted_tools(&tool_registry())
            .iter()
            .map(|tool| tool.name().to_string())
            .collect();
        assert_eq!(names, vec!["calculator", "database", "search", "weather"]);
    }

    #[test]
    fn test_agent_builder_assembles_each_kind() {
        let agent = agent_builder(ollama_settings(), AgentKind::PlanAndExecute)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(agent.description(), "Plan-and-Execute Agent with 4 tools");

        let agent = agent_builder(ollama_settings(), AgentKind::Conversational)
            .unwrap()
            .require_memory(true)
            .build_conversational()
            .unwrap();
        assert!(agent.memory().is_some());
    }
}
