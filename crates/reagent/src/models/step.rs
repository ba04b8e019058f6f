use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::{AgentError, Result};

/// One iteration of an agent loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStep {
    pub thought: String,
    pub action: String,
    pub action_input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_answer: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AgentStep {
    pub fn new<T, A, I>(thought: T, action: A, action_input: I) -> Self
    where
        T: Into<String>,
        A: Into<String>,
        I: Into<String>,
    {
        Self {
            thought: thought.into(),
            action: action.into(),
            action_input: action_input.into(),
            observation: None,
            final_answer: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_observation<S: Into<String>>(mut self, observation: S) -> Self {
        self.observation = Some(observation.into());
        self
    }

    pub fn with_final_answer<S: Into<String>>(mut self, answer: S) -> Self {
        self.final_answer = Some(answer.into());
        self
    }
}

/// Terminal summary of a run. Failed runs keep the steps recorded before the failure.
#[derive(Debug, Clone)]
pub struct AgentResult {
    pub output: String,
    pub steps: Vec<AgentStep>,
    pub iterations: usize,
    pub success: bool,
    pub error: Option<AgentError>,
    pub elapsed: Duration,
}

impl AgentResult {
    pub fn succeeded(output: String, steps: Vec<AgentStep>, iterations: usize, elapsed: Duration) -> Self {
        Self {
            output,
            steps,
            iterations,
            success: true,
            error: None,
            elapsed,
        }
    }

    pub fn failed(error: AgentError, steps: Vec<AgentStep>, iterations: usize, elapsed: Duration) -> Self {
        Self {
            output: String::new(),
            steps,
            iterations,
            success: false,
            error: Some(error),
            elapsed,
        }
    }

    /// Collapse into the plain output, surfacing the recorded error on failure
    pub fn into_result(self) -> Result<String> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.output),
        }
    }
}

/// Ordered step descriptions produced once per plan-and-execute run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan(Vec<String>);

impl Plan {
    pub fn new(steps: Vec<String>) -> Self {
        Self(steps)
    }

    pub fn steps(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Render as a `1. step` list, one entry per line
    pub fn numbered(&self) -> String {
        numbered(&self.0)
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

pub(crate) fn numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| format!("{}. {}", index + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}
