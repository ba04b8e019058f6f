mod authenticated;
mod builtin;
mod calculator;
mod chained;
mod error;
mod rate_limited;

pub use authenticated::{Authenticated, Authenticator};
pub use builtin::{DatabaseTool, SearchTool, WeatherTool};
pub use calculator::CalculatorTool;
pub use chained::Chained;
pub use error::{ToolError, ToolResult};
pub use rate_limited::RateLimited;

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

/// A named capability an agent can invoke with text input
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique key the model uses to select this tool
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    async fn execute(&self, input: &str) -> ToolResult<String>;

    /// Reject blank input
    fn validate_input(&self, input: &str) -> bool {
        !input.trim().is_empty()
    }

    /// Descriptor used when presenting tools to a planner
    fn metadata(&self) -> Value {
        json!({
            "name": self.name(),
            "description": self.description(),
            "type": "tool",
        })
    }
}

#[async_trait]
impl<T: Tool + ?Sized> Tool for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn description(&self) -> &str {
        (**self).description()
    }

    async fn execute(&self, input: &str) -> ToolResult<String> {
        (**self).execute(input).await
    }

    fn validate_input(&self, input: &str) -> bool {
        (**self).validate_input(input)
    }

    fn metadata(&self) -> Value {
        (**self).metadata()
    }
}

/// Extension methods for composing tools
pub trait ToolExt: Tool + Sized {
    /// Feed this tool's output into `next`
    fn chain<N: Tool>(self, next: N) -> Chained<Self, N> {
        Chained::new(self, next)
    }

    fn rate_limited(self, cooldown: std::time::Duration) -> RateLimited<Self> {
        RateLimited::new(self, cooldown)
    }

    fn authenticated<A: Authenticator>(self, authenticator: A) -> Authenticated<Self, A> {
        Authenticated::new(self, authenticator)
    }
}

impl<T: Tool + Sized> ToolExt for T {}

/// The default offline tool set: calculator, search, weather and database
pub fn default_tools() -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(CalculatorTool::new()),
        Arc::new(SearchTool::new()),
        Arc::new(WeatherTool::new()),
        Arc::new(DatabaseTool::new()),
    ]
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use parking_lot::Mutex;

    /// Records every input and answers with a fixed prefix
    pub struct MockTool {
        name: String,
        prefix: String,
        calls: Mutex<Vec<String>>,
    }

    impl MockTool {
        pub fn new(name: &str, prefix: &str) -> Self {
            Self {
                name: name.to_string(),
                prefix: prefix.to_string(),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl Tool for MockTool {
        fn name(&self) -> &str {
            &self.name
        }

        fn description(&self) -> &str {
            "Mock tool for tests"
        }

        async fn execute(&self, input: &str) -> ToolResult<String> {
            self.calls.lock().push(input.to_string());
            Ok(format!("{}{}", self.prefix, input))
        }
    }

    /// Always fails with the configured error
    pub struct FailingTool {
        pub name: String,
        pub error: ToolError,
    }

    #[async_trait]
    impl Tool for FailingTool {
        fn name(&self) -> &str {
            &self.name
        }

        fn description(&self) -> &str {
            "Tool that always fails"
        }

        async fn execute(&self, _input: &str) -> ToolResult<String> {
            Err(self.error.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_input_rejects_blank() {
        let tool = SearchTool::new();
        assert!(tool.validate_input("rust"));
        assert!(!tool.validate_input("  \n\t"));
    }

    #[test]
    fn test_metadata() {
        let tool = CalculatorTool::new();
        assert_eq!(
            tool.metadata(),
            json!({
                "name": "calculator",
                "description": "Performs mathematical calculations",
                "type": "tool"
            })
        );
    }

    #[tokio::test]
    async fn test_arc_tool_delegates() {
        let tool: Arc<dyn Tool> = Arc::new(WeatherTool::new());
        let shared = Arc::clone(&tool);
        assert_eq!(shared.name(), "weather");
        assert_eq!(shared.execute("Paris").await.unwrap(), "Weather for: Paris");
    }

    #[test]
    fn test_default_tools() {
        let names: Vec<String> = default_tools()
            .iter()
            .map(|tool| tool.name().to_string())
            .collect();
        assert_eq!(names, vec!["calculator", "search", "weather", "database"]);
    }
}
