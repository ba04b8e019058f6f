use async_trait::async_trait;

use super::{Tool, ToolResult};

/// Offline stand-in for a web search backend
#[derive(Debug, Default, Clone)]
pub struct SearchTool;

impl SearchTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "Searches the web for information"
    }

    async fn execute(&self, input: &str) -> ToolResult<String> {
        Ok(format!("Search results for: {}", input))
    }
}

#[derive(Debug, Default, Clone)]
pub struct WeatherTool;

impl WeatherTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "weather"
    }

    fn description(&self) -> &str {
        "Gets weather information for a location"
    }

    async fn execute(&self, input: &str) -> ToolResult<String> {
        Ok(format!("Weather for: {}", input))
    }
}

#[derive(Debug, Default, Clone)]
pub struct DatabaseTool;

impl DatabaseTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for DatabaseTool {
    fn name(&self) -> &str {
        "database"
    }

    fn description(&self) -> &str {
        "Executes database queries"
    }

    async fn execute(&self, input: &str) -> ToolResult<String> {
        Ok(format!("Database query result for: {}", input))
    }
}
