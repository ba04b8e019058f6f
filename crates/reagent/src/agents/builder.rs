use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::react::DEFAULT_MAX_ITERATIONS;
use super::{Agent, ConversationalAgent, PlanAndExecuteAgent, ReActAgent};
use crate::errors::{AgentError, Result};
use crate::memory::ContextMemory;
use crate::providers::base::{GenerationParameters, Provider};
use crate::tools::Tool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    #[default]
    React,
    #[serde(alias = "plan")]
    PlanAndExecute,
    Conversational,
}

impl AgentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::React => "react",
            AgentKind::PlanAndExecute => "plan_and_execute",
            AgentKind::Conversational => "conversational",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "react" => Ok(AgentKind::React),
            "plan" | "plan_and_execute" | "plan-and-execute" => Ok(AgentKind::PlanAndExecute),
            "conversational" | "chat" => Ok(AgentKind::Conversational),
            other => Err(format!("unknown agent kind '{}'", other)),
        }
    }
}

/// Fluent assembly of any of the three agent kinds
pub struct AgentBuilder {
    provider: Option<Arc<dyn Provider>>,
    tools: Vec<Arc<dyn Tool>>,
    max_iterations: usize,
    verbose: bool,
    kind: AgentKind,
    memory: Option<ContextMemory>,
    require_memory: bool,
    params: GenerationParameters,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self {
            provider: None,
            tools: Vec::new(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            verbose: false,
            kind: AgentKind::default(),
            memory: None,
            require_memory: false,
            params: GenerationParameters::default(),
        }
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider(mut self, provider: Arc<dyn Provider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Replace the tool list
    pub fn tools(mut self, tools: Vec<Arc<dyn Tool>>) -> Self {
        self.tools = tools;
        self
    }

    /// Append one tool
    pub fn tool<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.push(Arc::new(tool));
        self
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn kind(mut self, kind: AgentKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn memory(mut self, memory: ContextMemory) -> Self {
        self.memory = Some(memory);
        self
    }

    /// Make building a conversational agent fail when no memory was supplied
    pub fn require_memory(mut self, require: bool) -> Self {
        self.require_memory = require;
        self
    }

    pub fn parameters(mut self, params: GenerationParameters) -> Self {
        self.params = params;
        self
    }

    fn take_provider(&mut self) -> Result<Arc<dyn Provider>> {
        self.provider.take().ok_or(AgentError::ProviderNotConfigured)
    }

    pub fn build(self) -> Result<Box<dyn Agent>> {
        let kind = self.kind;
        let agent: Box<dyn Agent> = match kind {
            AgentKind::React => Box::new(self.build_react()?),
            AgentKind::PlanAndExecute => Box::new(self.build_plan_and_execute()?),
            AgentKind::Conversational => Box::new(self.build_conversational()?),
        };
        Ok(agent)
    }

    pub fn build_react(mut self) -> Result<ReActAgent> {
        let provider = self.take_provider()?;
        Ok(ReActAgent::new(provider, self.tools)
            .with_max_iterations(self.max_iterations)
            .with_verbose(self.verbose)
            .with_parameters(self.params))
    }

    pub fn build_plan_and_execute(mut self) -> Result<PlanAndExecuteAgent> {
        let provider = self.take_provider()?;
        Ok(PlanAndExecuteAgent::new(provider, self.tools)
            .with_verbose(self.verbose)
            .with_parameters(self.params))
    }

    pub fn build_conversational(mut self) -> Result<ConversationalAgent> {
        let provider = self.take_provider()?;
        if self.require_memory && self.memory.is_none() {
            return Err(AgentError::MemoryRequired);
        }
        let agent = ConversationalAgent::new(provider, self.tools)
            .with_verbose(self.verbose)
            .with_parameters(self.params);
        Ok(match self.memory {
            Some(memory) => agent.with_memory(memory),
            None => agent,
        })
    }
}
