use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info_span, Instrument};
use uuid::Uuid;

use super::parser::{parse_plan, ToolSelector};
use super::{finish, find_tool, log_step, tool_views, Agent, ToolView};
use crate::chains::Chain;
use crate::errors::{AgentError, Result};
use crate::models::step::{AgentResult, AgentStep, Plan};
use crate::prompt_template::render_embedded;
use crate::providers::base::{GenerationParameters, Provider};
use crate::tools::Tool;

pub const EXECUTE_PLAN_STEP: &str = "execute_plan_step";

/// Plans once, runs each step through a keyword-selected tool, then synthesizes an answer
pub struct PlanAndExecuteAgent {
    provider: Arc<dyn Provider>,
    tools: Vec<Arc<dyn Tool>>,
    selector: ToolSelector,
    verbose: bool,
    params: GenerationParameters,
    last_plan: Option<Plan>,
}

#[derive(Serialize)]
struct PlanContext<'a> {
    tools: Vec<ToolView<'a>>,
    question: &'a str,
}

#[derive(Serialize)]
struct SynthesisContext<'a> {
    question: &'a str,
    plan: &'a [String],
    results: &'a [String],
}

impl PlanAndExecuteAgent {
    pub fn new(provider: Arc<dyn Provider>, tools: Vec<Arc<dyn Tool>>) -> Self {
        Self {
            provider,
            tools,
            selector: ToolSelector::default(),
            verbose: false,
            params: GenerationParameters::default(),
            last_plan: None,
        }
    }

    pub fn with_selector(mut self, selector: ToolSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_parameters(mut self, params: GenerationParameters) -> Self {
        self.params = params;
        self
    }

    /// Plan produced by the most recent run, if planning succeeded
    pub fn last_plan(&self) -> Option<&Plan> {
        self.last_plan.as_ref()
    }

    async fn create_plan(&self, question: &str) -> Result<Plan> {
        let prompt = render_embedded(
            "plan.md",
            &PlanContext {
                tools: tool_views(&self.tools),
                question,
            },
        )?;
        let response = self.provider.generate(&prompt, &self.params).await?;
        parse_plan(&response)
    }

    async fn execute_plan(
        &self,
        plan: &Plan,
        steps: &mut Vec<AgentStep>,
        iterations: &mut usize,
    ) -> Result<Vec<String>> {
        let mut results: Vec<String> = Vec::with_capacity(plan.len());

        for (index, step_text) in plan.iter().enumerate() {
            let number = index + 1;
            *iterations = number;

            let tool_input = if results.is_empty() {
                step_text.clone()
            } else {
                format!("Step: {}\nPrevious results: {}", step_text, results.join("; "))
            };
            let step = AgentStep::new(
                format!("Executing plan step {}", number),
                EXECUTE_PLAN_STEP,
                step_text.as_str(),
            );

            let tool_name = self.selector.select(step_text);
            debug!(step = number, tool = tool_name, "dispatching plan step");
            let outcome = match find_tool(&self.tools, tool_name) {
                Ok(tool) => tool.execute(&tool_input).await.map_err(AgentError::from),
                Err(err) => Err(err),
            };
            let result = match outcome {
                Ok(result) => result,
                Err(err) => {
                    log_step(self.verbose, number, &step);
                    steps.push(step);
                    return Err(err);
                }
            };

            let step = step.with_observation(result.as_str());
            log_step(self.verbose, number, &step);
            steps.push(step);
            results.push(result);
        }

        Ok(results)
    }

    async fn synthesize(&self, question: &str, plan: &Plan, results: &[String]) -> Result<String> {
        let prompt = render_embedded(
            "synthesize.md",
            &SynthesisContext {
                question,
                plan: plan.steps(),
                results,
            },
        )?;
        Ok(self.provider.generate(&prompt, &self.params).await?)
    }

    async fn drive(&mut self, input: &str, steps: &mut Vec<AgentStep>, iterations: &mut usize) -> Result<String> {
        self.last_plan = None;
        let plan = self.create_plan(input).await?;
        debug!(steps = plan.len(), plan = %plan.numbered(), "plan created");
        self.last_plan = Some(plan.clone());

        let results = self.execute_plan(&plan, steps, iterations).await?;
        self.synthesize(input, &plan, &results).await
    }
}

#[async_trait]
impl Chain for PlanAndExecuteAgent {
    type Input = String;
    type Output = String;

    async fn run(&mut self, input: String) -> Result<String> {
        self.execute(&input).await.into_result()
    }
}

#[async_trait]
impl Agent for PlanAndExecuteAgent {
    fn tools(&self) -> Vec<Arc<dyn Tool>> {
        self.tools.clone()
    }

    fn description(&self) -> String {
        format!("Plan-and-Execute Agent with {} tools", self.tools.len())
    }

    async fn execute(&mut self, input: &str) -> AgentResult {
        let span = info_span!("agent_run", agent = "plan_and_execute", run_id = %Uuid::new_v4());
        async {
            let started = Instant::now();
            let mut steps = Vec::new();
            let mut iterations = 0;
            let outcome = self.drive(input, &mut steps, &mut iterations).await;
            finish(outcome, steps, iterations, started)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::mock::MockProvider;
    use crate::tools::mock::MockTool;
    use crate::tools::ToolError;
    use anyhow::Result;

    struct Fixture {
        provider: MockProvider,
        search: Arc<MockTool>,
        calculator: Arc<MockTool>,
    }

    impl Fixture {
        fn new(responses: Vec<&str>) -> Self {
            Self {
                provider: MockProvider::new(responses),
                search: Arc::new(MockTool::new("search", "found:")),
                calculator: Arc::new(MockTool::new("calculator", "computed:")),
            }
        }

        fn agent(&self) -> PlanAndExecuteAgent {
            PlanAndExecuteAgent::new(
                Arc::new(self.provider.clone()),
                vec![self.search.clone(), self.calculator.clone()],
            )
        }
    }

    #[tokio::test]
    async fn test_plan_dispatch_and_synthesis() -> Result<()> {
        let fixture = Fixture::new(vec!["1. search for X\n2. calculate Y", "X is 7"]);
        let mut agent = fixture.agent();

        let result = agent.execute("What is X?").await;
        assert!(result.success, "{:?}", result.error);
        assert_eq!(result.output, "X is 7");

        let plan = agent.last_plan().unwrap();
        assert_eq!(plan.steps(), ["search for X", "calculate Y"]);

        assert_eq!(fixture.search.calls(), vec!["search for X"]);
        assert_eq!(
            fixture.calculator.calls(),
            vec!["Step: calculate Y\nPrevious results: found:search for X"]
        );

        assert_eq!(result.steps.len(), 2);
        assert_eq!(result.steps[0].thought, "Executing plan step 1");
        assert_eq!(result.steps[0].action, EXECUTE_PLAN_STEP);
        assert_eq!(result.steps[0].action_input, "search for X");
        assert_eq!(result.steps[1].observation.as_deref(), Some("computed:Step: calculate Y\nPrevious results: found:search for X"));
        assert_eq!(result.iterations, 2);

        let prompts = fixture.provider.prompts();
        assert!(prompts[0].contains("- search: Mock tool for tests"));
        assert!(prompts[1].contains("Original question: What is X?"));
        assert!(prompts[1].contains("Plan executed:\n1. search for X\n2. calculate Y\n"));
        assert!(prompts[1].contains("Results:\n1. found:search for X\n2. computed:"));
        Ok(())
    }

    #[tokio::test]
    async fn test_results_accumulate_with_semicolons() -> Result<()> {
        let fixture = Fixture::new(vec!["1. find a\n2. find b\n3. find c", "done"]);
        let mut agent = fixture.agent();

        agent.run("q".to_string()).await?;
        assert_eq!(
            fixture.search.calls()[2],
            "Step: find c\nPrevious results: found:find a; found:Step: find b\nPrevious results: found:find a"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_plan_fails() -> Result<()> {
        let fixture = Fixture::new(vec!["I have no idea"]);
        let mut agent = fixture.agent();

        let result = agent.execute("q").await;
        assert!(matches!(result.error, Some(AgentError::PlanningFailed(_))));
        assert!(agent.last_plan().is_none());
        assert!(result.steps.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_tool_aborts_run() -> Result<()> {
        let fixture = Fixture::new(vec!["1. search for X\n2. check the weather", "unused"]);
        let mut agent = fixture.agent();

        let result = agent.execute("q").await;
        assert_eq!(result.error, Some(AgentError::ToolNotFound("weather".to_string())));
        assert_eq!(result.steps.len(), 2);
        assert!(result.steps[1].observation.is_none());
        // synthesis never ran
        assert_eq!(fixture.provider.prompts().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_tool_failure_aborts_without_retry() -> Result<()> {
        let provider = MockProvider::new(vec!["1. calculate 1/0", "unused"]);
        let failing = crate::tools::mock::FailingTool {
            name: "calculator".to_string(),
            error: ToolError::ExecutionFailed("division by zero".to_string()),
        };
        let mut agent = PlanAndExecuteAgent::new(Arc::new(provider.clone()), vec![Arc::new(failing)]);

        let err = agent.run("q".to_string()).await.unwrap_err();
        assert_eq!(
            err,
            AgentError::Tool(ToolError::ExecutionFailed("division by zero".to_string()))
        );
        assert_eq!(provider.prompts().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_custom_selector() -> Result<()> {
        let fixture = Fixture::new(vec!["1. add the numbers", "sum"]);
        let mut agent = fixture
            .agent()
            .with_selector(ToolSelector::empty("search").with_rule(&["add"], "calculator"));

        agent.run("q".to_string()).await?;
        assert_eq!(fixture.calculator.calls(), vec!["add the numbers"]);
        Ok(())
    }
}
