use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use super::parser::{parse_tool_request, requests_tool};
use super::{finish, find_tool, log_step, tool_views, Agent, ToolView};
use crate::chains::Chain;
use crate::errors::{AgentError, Result};
use crate::memory::ContextMemory;
use crate::models::message::Message;
use crate::models::step::{AgentResult, AgentStep};
use crate::prompt_template::render_embedded;
use crate::providers::base::{GenerationParameters, Provider};
use crate::tools::Tool;

/// Single-turn chat agent that may call at most one tool per user message
pub struct ConversationalAgent {
    provider: Arc<dyn Provider>,
    tools: Vec<Arc<dyn Tool>>,
    memory: Option<ContextMemory>,
    verbose: bool,
    params: GenerationParameters,
}

#[derive(Serialize)]
struct ConversationContext<'a> {
    tools: Vec<ToolView<'a>>,
    context: &'a str,
    input: &'a str,
}

#[derive(Serialize)]
struct FollowUpContext<'a> {
    question: &'a str,
    tool: &'a str,
    tool_input: &'a str,
    result: &'a str,
}

impl ConversationalAgent {
    pub fn new(provider: Arc<dyn Provider>, tools: Vec<Arc<dyn Tool>>) -> Self {
        Self {
            provider,
            tools,
            memory: None,
            verbose: false,
            params: GenerationParameters::default(),
        }
    }

    pub fn with_memory(mut self, memory: ContextMemory) -> Self {
        self.memory = Some(memory);
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

    pub fn memory(&self) -> Option<&ContextMemory> {
        self.memory.as_ref()
    }

    pub fn clear_memory(&mut self) {
        if let Some(memory) = self.memory.as_mut() {
            memory.clear();
        }
    }

    fn remember(&mut self, message: Message) {
        if let Some(memory) = self.memory.as_mut() {
            memory.add_message(message);
        }
    }

    async fn drive(&mut self, input: &str, steps: &mut Vec<AgentStep>, iterations: &mut usize) -> Result<String> {
        *iterations = 1;
        self.remember(Message::user(input));

        let context = self
            .memory
            .as_ref()
            .map(ContextMemory::as_prompt_context)
            .unwrap_or_default();
        let prompt = render_embedded(
            "conversational.md",
            &ConversationContext {
                tools: tool_views(&self.tools),
                context: &context,
                input,
            },
        )?;
        let response = self.provider.generate(&prompt, &self.params).await?;

        if !requests_tool(&response) {
            self.remember(Message::assistant(response.as_str()));
            return Ok(response);
        }

        let (tool_name, tool_input) = parse_tool_request(&response)?;
        let step = AgentStep::new(
            format!("Using the {} tool", tool_name),
            tool_name.as_str(),
            tool_input.as_str(),
        );
        let outcome = match find_tool(&self.tools, &tool_name) {
            Ok(tool) => tool.execute(&tool_input).await.map_err(AgentError::from),
            Err(err) => Err(err),
        };
        let result = match outcome {
            Ok(result) => result,
            Err(err) => {
                log_step(self.verbose, 1, &step);
                steps.push(step);
                return Err(err);
            }
        };
        let step = step.with_observation(result.as_str());
        log_step(self.verbose, 1, &step);
        steps.push(step);

        let follow_up = render_embedded(
            "follow_up.md",
            &FollowUpContext {
                question: input,
                tool: &tool_name,
                tool_input: &tool_input,
                result: &result,
            },
        )?;
        let reply = self.provider.generate(&follow_up, &self.params).await?;
        self.remember(Message::assistant(reply.as_str()));
        Ok(reply)
    }
}

#[async_trait]
impl Chain for ConversationalAgent {
    type Input = String;
    type Output = String;

    async fn run(&mut self, input: String) -> Result<String> {
        self.execute(&input).await.into_result()
    }
}

#[async_trait]
impl Agent for ConversationalAgent {
    fn tools(&self) -> Vec<Arc<dyn Tool>> {
        self.tools.clone()
    }

    fn description(&self) -> String {
        format!("Conversational Agent with {} tools", self.tools.len())
    }

    async fn execute(&mut self, input: &str) -> AgentResult {
        let span = info_span!("agent_run", agent = "conversational", run_id = %Uuid::new_v4());
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
