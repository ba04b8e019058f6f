pub mod builder;
pub mod conversational;
pub mod parser;
pub mod plan_execute;
pub mod react;

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::chains::Chain;
use crate::errors::{AgentError, Result};
use crate::models::step::{AgentResult, AgentStep};
use crate::tools::Tool;

pub use builder::{AgentBuilder, AgentKind};
pub use conversational::ConversationalAgent;
pub use plan_execute::PlanAndExecuteAgent;
pub use react::ReActAgent;

/// A chain from a question to an answer that can call tools along the way.
///
/// [`Chain::run`] returns only the answer; [`execute`](Agent::execute) also
/// reports the recorded steps, iteration count and elapsed time, including on failure.
#[async_trait]
pub trait Agent: Chain<Input = String, Output = String> {
    fn tools(&self) -> Vec<Arc<dyn Tool>>;

    fn description(&self) -> String;

    async fn execute(&mut self, input: &str) -> AgentResult;
}

#[async_trait]
impl<A: Agent + ?Sized> Agent for Box<A> {
    fn tools(&self) -> Vec<Arc<dyn Tool>> {
        (**self).tools()
    }

    fn description(&self) -> String {
        (**self).description()
    }

    async fn execute(&mut self, input: &str) -> AgentResult {
        (**self).execute(input).await
    }
}

/// Tool name and description as shown to the model
#[derive(Debug, Serialize)]
pub(crate) struct ToolView<'a> {
    name: &'a str,
    description: &'a str,
}

pub(crate) fn tool_views(tools: &[Arc<dyn Tool>]) -> Vec<ToolView<'_>> {
    tools
        .iter()
        .map(|tool| ToolView {
            name: tool.name(),
            description: tool.description(),
        })
        .collect()
}

/// Exact-name lookup in an agent's tool list
pub(crate) fn find_tool<'a>(tools: &'a [Arc<dyn Tool>], name: &str) -> Result<&'a Arc<dyn Tool>> {
    tools
        .iter()
        .find(|tool| tool.name() == name)
        .ok_or_else(|| AgentError::ToolNotFound(name.to_string()))
}

pub(crate) fn log_step(verbose: bool, iteration: usize, step: &AgentStep) {
    if verbose {
        info!(
            iteration,
            thought = %step.thought,
            action = %step.action,
            action_input = %step.action_input,
            observation = ?step.observation,
            "agent step"
        );
    } else {
        debug!(
            iteration,
            thought = %step.thought,
            action = %step.action,
            action_input = %step.action_input,
            observation = ?step.observation,
            "agent step"
        );
    }
}

/// Wrap the outcome of a run into an [`AgentResult`] and log it
pub(crate) fn finish(
    outcome: Result<String>,
    steps: Vec<AgentStep>,
    iterations: usize,
    started: Instant,
) -> AgentResult {
    let elapsed = started.elapsed();
    match outcome {
        Ok(output) => {
            info!(
                iterations,
                steps = steps.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "agent run completed"
            );
            AgentResult::succeeded(output, steps, iterations, elapsed)
        }
        Err(error) => {
            warn!(
                iterations,
                steps = steps.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                %error,
                "agent run failed"
            );
            AgentResult::failed(error, steps, iterations, elapsed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{CalculatorTool, SearchTool};

    #[test]
    fn test_find_tool() {
        let tools: Vec<Arc<dyn Tool>> = vec![Arc::new(SearchTool::new()), Arc::new(CalculatorTool::new())];
        assert_eq!(find_tool(&tools, "calculator").unwrap().name(), "calculator");
        assert_eq!(
            find_tool(&tools, "Calculator").err(),
            Some(AgentError::ToolNotFound("Calculator".to_string()))
        );
    }

    #[test]
    fn test_finish_keeps_steps_on_failure() {
        let steps = vec![AgentStep::new("t", "search", "x")];
        let result = finish(
            Err(AgentError::MaxIterationsExceeded(1)),
            steps,
            1,
            Instant::now(),
        );
        assert!(!result.success);
        assert_eq!(result.steps.len(), 1);
        assert_eq!(result.error, Some(AgentError::MaxIterationsExceeded(1)));
    }
}
