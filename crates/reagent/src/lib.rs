pub mod agents;
pub mod chains;
pub mod errors;
pub mod memory;
pub mod models;
pub mod output_parser;
pub mod prompt_template;
pub mod providers;
pub mod registry;
pub mod token_counter;
pub mod tools;

pub use agents::{
    Agent, AgentBuilder, AgentKind, ConversationalAgent, PlanAndExecuteAgent, ReActAgent,
};
pub use chains::{Chain, ChainExt};
pub use errors::{AgentError, ProviderError, Result};
pub use memory::ContextMemory;
pub use registry::{AgentRegistry, ToolRegistry};
pub use tools::{Tool, ToolError};
