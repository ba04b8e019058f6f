use async_trait::async_trait;

use super::{Tool, ToolResult};

/// Runs `first`, then feeds its output to `second`
pub struct Chained<T1, T2> {
    first: T1,
    second: T2,
    name: String,
    description: String,
}

impl<T1: Tool, T2: Tool> Chained<T1, T2> {
    pub fn new(first: T1, second: T2) -> Self {
        let name = format!("chained_{}_{}", first.name(), second.name());
        let description = format!("Chains {} and {} together", first.name(), second.name());
        Self {
            first,
            second,
            name,
            description,
        }
    }
}

#[async_trait]
impl<T1: Tool, T2: Tool> Tool for Chained<T1, T2> {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn execute(&self, input: &str) -> ToolResult<String> {
        let intermediate = self.first.execute(input).await?;
        self.second.execute(&intermediate).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{CalculatorTool, SearchTool, ToolError, ToolExt};

    #[tokio::test]
    async fn test_chained_pipes_output() {
        let tool = CalculatorTool::new().chain(SearchTool::new());
        assert_eq!(tool.name(), "chained_calculator_search");
        assert_eq!(tool.description(), "Chains calculator and search together");
        assert_eq!(tool.execute("6 * 7").await.unwrap(), "Search results for: 42");
    }

    #[tokio::test]
    async fn test_first_failure_short_circuits() {
        let tool = Chained::new(CalculatorTool::new(), SearchTool::new());
        assert!(matches!(
            tool.execute("").await,
            Err(ToolError::InvalidInput(_))
        ));
    }
}
