use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use super::Chain;
use crate::agents::Agent;
use crate::errors::Result;
use crate::models::step::AgentResult;
use crate::tools::Tool;

/// Two chains run back to back; the first one's output is the second one's input.
///
/// A failure in either stage ends the run with that stage's error.
pub struct Sequential<A, B> {
    first: A,
    second: B,
}

impl<A, B> Sequential<A, B>
where
    A: Chain,
    B: Chain<Input = A::Output>,
{
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    pub fn into_parts(self) -> (A, B) {
        (self.first, self.second)
    }
}

#[async_trait]
impl<A, B> Chain for Sequential<A, B>
where
    A: Chain,
    B: Chain<Input = A::Output>,
{
    type Input = A::Input;
    type Output = B::Output;

    async fn run(&mut self, input: Self::Input) -> Result<Self::Output> {
        debug!("running first stage");
        let intermediate = self.first.run(input).await?;
        debug!("running second stage");
        self.second.run(intermediate).await
    }
}

#[async_trait]
impl<A, B> Agent for Sequential<A, B>
where
    A: Agent,
    B: Agent,
{
    fn tools(&self) -> Vec<Arc<dyn Tool>> {
        let mut tools = self.first.tools();
        tools.extend(self.second.tools());
        tools
    }

    fn description(&self) -> String {
        format!(
            "Sequential: {} -> {}",
            self.first.description(),
            self.second.description()
        )
    }

    async fn execute(&mut self, input: &str) -> AgentResult {
        let started = Instant::now();
        let first = self.first.execute(input).await;
        if !first.success {
            return first;
        }

        let second = self.second.execute(&first.output).await;
        let mut steps = first.steps;
        steps.extend(second.steps);
        let iterations = first.iterations + second.iterations;
        let elapsed = started.elapsed();
        match second.error {
            Some(error) => AgentResult::failed(error, steps, iterations, elapsed),
            None => AgentResult::succeeded(second.output, steps, iterations, elapsed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::ChainExt;
    use crate::errors::AgentError;
    use crate::providers::mock::MockProvider;
    use crate::ReActAgent;

    /// Emits a fixed value regardless of input
    struct Constant(&'static str);

    #[async_trait]
    impl Chain for Constant {
        type Input = String;
        type Output = String;

        async fn run(&mut self, _input: String) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    /// Prefixes its input and counts invocations
    struct Prefix {
        prefix: &'static str,
        calls: usize,
    }

    #[async_trait]
    impl Chain for Prefix {
        type Input = String;
        type Output = String;

        async fn run(&mut self, input: String) -> Result<String> {
            self.calls += 1;
            Ok(format!("{}{}", self.prefix, input))
        }
    }

    struct Fails;

    #[async_trait]
    impl Chain for Fails {
        type Input = String;
        type Output = String;

        async fn run(&mut self, _input: String) -> Result<String> {
            Err(AgentError::ExecutionFailed("boom".to_string()))
        }
    }

    struct Length;

    #[async_trait]
    impl Chain for Length {
        type Input = String;
        type Output = usize;

        async fn run(&mut self, input: String) -> Result<usize> {
            Ok(input.len())
        }
    }

    #[tokio::test]
    async fn test_output_feeds_next_input() {
        let mut chain = Constant("42").then(Prefix { prefix: "got:", calls: 0 });
        assert_eq!(chain.run("ignored".to_string()).await.unwrap(), "got:42");
    }

    #[tokio::test]
    async fn test_types_flow_through_stages() {
        let mut chain = Prefix { prefix: "ab", calls: 0 }.then(Length);
        assert_eq!(chain.run("cd".to_string()).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_first_failure_skips_second_stage() {
        let mut chain = Fails.then(Prefix { prefix: "x", calls: 0 });
        assert_eq!(
            chain.run("in".to_string()).await.unwrap_err(),
            AgentError::ExecutionFailed("boom".to_string())
        );
        let (_, second) = chain.into_parts();
        assert_eq!(second.calls, 0);
    }

    #[tokio::test]
    async fn test_second_failure_surfaces() {
        let mut chain = Constant("1").then(Fails);
        assert!(chain.run(String::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_three_stage_composition() {
        let mut chain = Constant("1")
            .then(Prefix { prefix: "a", calls: 0 })
            .then(Prefix { prefix: "b", calls: 0 });
        assert_eq!(chain.run(String::new()).await.unwrap(), "ba1");
    }

    #[tokio::test]
    async fn test_sequential_agents_merge_results() {
        let first = ReActAgent::new(
            Arc::new(MockProvider::new(vec!["Thought: t\nAction: Final Answer\nAction Input: 42"])),
            vec![],
        );
        let second = ReActAgent::new(
            Arc::new(MockProvider::new(vec!["Thought: t\nAction: Final Answer\nAction Input: got:42"])),
            vec![Arc::new(crate::tools::SearchTool::new())],
        );
        let mut combined = first.then(second);

        assert_eq!(
            combined.description(),
            "Sequential: ReAct Agent with 0 tools -> ReAct Agent with 1 tools"
        );
        assert_eq!(combined.tools().len(), 1);

        let result = combined.execute("q").await;
        assert!(result.success);
        assert_eq!(result.output, "got:42");
        assert_eq!(result.steps.len(), 2);
        assert_eq!(result.iterations, 2);
    }
}
