#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use reagent::providers::base::{GenerationParameters, Provider, ProviderResult};
use reagent::tools::{Tool, ToolResult};
use reagent::ProviderError;

/// Replays canned completions in order and keeps every prompt it was given
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    script: Arc<Mutex<VecDeque<String>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedProvider {
    pub fn new<S: Into<String>>(script: impl IntoIterator<Item = S>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into_iter().map(Into::into).collect())),
            prompts: Arc::default(),
        }
    }

    /// Same completion for every call
    pub fn repeating(response: &str, times: usize) -> Self {
        Self::new(std::iter::repeat(response).take(times))
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn generate(&self, prompt: &str, _params: &GenerationParameters) -> ProviderResult<String> {
        self.prompts.lock().push(prompt.to_string());
        self.script.lock().pop_front().ok_or(ProviderError::EmptyResponse)
    }
}

/// Tool that answers `{name}({input})` and counts its calls
pub struct EchoTool {
    name: String,
    calls: Mutex<Vec<String>>,
}

impl EchoTool {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Echoes its input"
    }

    async fn execute(&self, input: &str) -> ToolResult<String> {
        self.calls.lock().push(input.to_string());
        Ok(format!("{}({})", self.name, input))
    }
}
