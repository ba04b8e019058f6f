//! Parsing of free-form model output into agent decisions.
//!
//! All prefix matching is case-sensitive and applied to each line after trimming
//! surrounding whitespace. When a prefix appears on several lines the first one wins.

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::{AgentError, Result};
use crate::models::step::Plan;

pub const THOUGHT_PREFIX: &str = "Thought:";
pub const ACTION_PREFIX: &str = "Action:";
pub const ACTION_INPUT_PREFIX: &str = "Action Input:";
pub const USE_TOOL_PREFIX: &str = "USE_TOOL:";
pub const TOOL_INPUT_PREFIX: &str = "INPUT:";

/// Action name that ends a ReAct loop
pub const FINAL_ANSWER: &str = "Final Answer";

lazy_static! {
    static ref PLAN_STEP: Regex = Regex::new(r"^\d+\.\s*(.+)").expect("plan step pattern is valid");
}

/// A single ReAct turn as written by the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReActDecision {
    pub thought: String,
    pub action: String,
    pub action_input: String,
}

impl ReActDecision {
    pub fn is_final_answer(&self) -> bool {
        self.action == FINAL_ANSWER
    }
}

/// Value following the first line that starts with `prefix`
fn first_prefixed(response: &str, prefix: &str) -> Option<String> {
    response
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix(prefix))
        .map(|rest| rest.trim().to_string())
}

/// Extract `Thought:` / `Action:` / `Action Input:`. The action input may be empty.
pub fn parse_react(response: &str) -> Result<ReActDecision> {
    let thought = first_prefixed(response, THOUGHT_PREFIX).unwrap_or_default();
    let action = first_prefixed(response, ACTION_PREFIX).unwrap_or_default();
    let action_input = first_prefixed(response, ACTION_INPUT_PREFIX).unwrap_or_default();

    if thought.is_empty() || action.is_empty() {
        return Err(AgentError::InvalidResponseFormat(response.to_string()));
    }

    Ok(ReActDecision {
        thought,
        action,
        action_input,
    })
}

/// Whether a conversational reply asks for a tool
pub fn requests_tool(response: &str) -> bool {
    response.contains(USE_TOOL_PREFIX)
}

/// Extract `(tool name, tool input)` from a `USE_TOOL:` / `INPUT:` reply
pub fn parse_tool_request(response: &str) -> Result<(String, String)> {
    let name = first_prefixed(response, USE_TOOL_PREFIX).unwrap_or_default();
    let input = first_prefixed(response, TOOL_INPUT_PREFIX).unwrap_or_default();

    if name.is_empty() {
        return Err(AgentError::InvalidResponseFormat(response.to_string()));
    }
    Ok((name, input))
}

/// Collect `N. step` lines into a plan, dropping the numbering
pub fn parse_plan(response: &str) -> Result<Plan> {
    let steps: Vec<String> = response
        .lines()
        .map(str::trim)
        .filter_map(|line| PLAN_STEP.captures(line))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim().to_string()))
        .filter(|step| !step.is_empty())
        .collect();

    if steps.is_empty() {
        return Err(AgentError::PlanningFailed(
            "Failed to create a valid plan".to_string(),
        ));
    }
    Ok(Plan::new(steps))
}

/// Ordered keyword table mapping a plan step to a tool name.
///
/// Rules are checked in insertion order against the lowercased step text; the
/// first rule with a matching keyword decides. Unmatched steps go to the fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSelector {
    rules: Vec<(Vec<String>, String)>,
    fallback: String,
}

impl Default for ToolSelector {
    fn default() -> Self {
        Self::empty("search")
            .with_rule(&["search", "find", "look up"], "search")
            .with_rule(&["calculate", "math", "compute"], "calculator")
            .with_rule(&["weather", "temperature"], "weather")
            .with_rule(&["database", "query"], "database")
    }
}

impl ToolSelector {
    /// A selector with no rules that always picks `fallback`
    pub fn empty<S: Into<String>>(fallback: S) -> Self {
        Self {
            rules: Vec::new(),
            fallback: fallback.into(),
        }
    }

    /// Append a rule; it is consulted after every existing rule
    pub fn with_rule<S: Into<String>>(mut self, keywords: &[&str], tool: S) -> Self {
        let keywords = keywords.iter().map(|k| k.to_lowercase()).collect();
        self.rules.push((keywords, tool.into()));
        self
    }

    pub fn select(&self, step: &str) -> &str {
        let step = step.to_lowercase();
        self.rules
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| step.contains(k.as_str())))
            .map(|(_, tool)| tool.as_str())
            .unwrap_or(&self.fallback)
    }
}
