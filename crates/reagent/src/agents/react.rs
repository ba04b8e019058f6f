use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use super::parser::parse_react;
use super::{finish, find_tool, log_step, tool_views, Agent, ToolView};
use crate::chains::Chain;
use crate::errors::{AgentError, Result};
use crate::models::step::{AgentResult, AgentStep};
use crate::prompt_template::render_embedded;
use crate::providers::base::{GenerationParameters, Provider};
use crate::tools::Tool;

pub const DEFAULT_MAX_ITERATIONS: usize = 10;

const NO_OBSERVATION: &str = "No observation";

/// Reason-and-act loop: the model picks a tool each iteration until it answers
pub struct ReActAgent {
    provider: Arc<dyn Provider>,
    tools: Vec<Arc<dyn Tool>>,
    max_iterations: usize,
    verbose: bool,
    params: GenerationParameters,
}

#[derive(Serialize)]
struct StepView<'a> {
    thought: &'a str,
    action: &'a str,
    action_input: &'a str,
    observation: &'a str,
}

#[derive(Serialize)]
struct ReActContext<'a> {
    tools: Vec<ToolView<'a>>,
    steps: Vec<StepView<'a>>,
    question: &'a str,
}

impl ReActAgent {
    pub fn new(provider: Arc<dyn Provider>, tools: Vec<Arc<dyn Tool>>) -> Self {
        Self {
            provider,
            tools,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            verbose: false,
            params: GenerationParameters::default(),
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
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

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    fn prompt(&self, question: &str, steps: &[AgentStep]) -> Result<String> {
        let context = ReActContext {
            tools: tool_views(&self.tools),
            steps: steps
                .iter()
                .map(|step| StepView {
                    thought: &step.thought,
                    action: &step.action,
                    action_input: &step.action_input,
                    observation: step.observation.as_deref().unwrap_or(NO_OBSERVATION),
                })
                .collect(),
            question,
        };
        Ok(render_embedded("react.md", &context)?)
    }

    async fn drive(&self, input: &str, steps: &mut Vec<AgentStep>, iterations: &mut usize) -> Result<String> {
        let mut current_input = input.to_string();

        for iteration in 1..=self.max_iterations {
            *iterations = iteration;

            let prompt = self.prompt(&current_input, steps)?;
            let response = self.provider.generate(&prompt, &self.params).await?;
            let decision = parse_react(&response)?;

            let step = AgentStep::new(
                decision.thought.as_str(),
                decision.action.as_str(),
                decision.action_input.as_str(),
            );

            if decision.is_final_answer() {
                let step = step.with_final_answer(decision.action_input.as_str());
                log_step(self.verbose, iteration, &step);
                steps.push(step);
                return Ok(decision.action_input);
            }

            // failed actions are still recorded, without an observation
            let observation = match find_tool(&self.tools, &decision.action) {
                Ok(tool) => tool.execute(&decision.action_input).await.map_err(AgentError::from),
                Err(err) => Err(err),
            };
            let observation = match observation {
                Ok(observation) => observation,
                Err(err) => {
                    log_step(self.verbose, iteration, &step);
                    steps.push(step);
                    return Err(err);
                }
            };

            let step = step.with_observation(observation.as_str());
            log_step(self.verbose, iteration, &step);
            steps.push(step);

            current_input = format!("Previous observation: {}\nQuestion: {}", observation, input);
        }

        Err(AgentError::MaxIterationsExceeded(self.max_iterations))
    }
}

#[async_trait]
impl Chain for ReActAgent {
    type Input = String;
    type Output = String;

    async fn run(&mut self, input: String) -> Result<String> {
        self.execute(&input).await.into_result()
    }
}

#[async_trait]
impl Agent for ReActAgent {
    fn tools(&self) -> Vec<Arc<dyn Tool>> {
        self.tools.clone()
    }

    fn description(&self) -> String {
        format!("ReAct Agent with {} tools", self.tools.len())
    }

    async fn execute(&mut self, input: &str) -> AgentResult {
        let span = info_span!("agent_run", agent = "react", run_id = %Uuid::new_v4());
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
