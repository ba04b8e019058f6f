use thiserror::Error;

use crate::tools::ToolError;

#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentError {
    #[error("Agent exceeded maximum iterations ({0})")]
    MaxIterationsExceeded(usize),

    #[error("Tool '{0}' not found")]
    ToolNotFound(String),

    #[error("Invalid response format: {0}")]
    InvalidResponseFormat(String),

    #[error("Planning failed: {0}")]
    PlanningFailed(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Invalid tool input: {0}")]
    InvalidToolInput(String),

    #[error("Memory is required for this agent type")]
    MemoryRequired,

    #[error("LLM provider is not configured")]
    ProviderNotConfigured,

    #[error("Prompt rendering failed: {0}")]
    Prompt(String),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl From<tera::Error> for AgentError {
    fn from(err: tera::Error) -> Self {
        // tera nests the useful part of the message in its source chain
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(inner) = source {
            message = format!("{}: {}", message, inner);
            source = inner.source();
        }
        AgentError::Prompt(message)
    }
}

/// Failures surfaced by a [`Provider`](crate::providers::base::Provider).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Could not decode provider response: {0}")]
    Decoding(String),

    #[error("Provider API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Context length exceeded. Message: {0}")]
    ContextLengthExceeded(String),

    #[error("Provider returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProviderError::Decoding(err.to_string())
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, AgentError>;
