use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::{Duration, Instant};

use super::{Tool, ToolError, ToolResult};

/// Wraps a tool so that calls inside the cooldown window after the previous
/// call are rejected with [`ToolError::RateLimitExceeded`].
pub struct RateLimited<T> {
    inner: T,
    cooldown: Duration,
    last_execution: Mutex<Option<Instant>>,
}

impl<T: Tool> RateLimited<T> {
    pub fn new(inner: T, cooldown: Duration) -> Self {
        Self {
            inner,
            cooldown,
            last_execution: Mutex::new(None),
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn last_execution_time(&self) -> Option<Instant> {
        *self.last_execution.lock()
    }

    // Claims the slot before the inner call so overlapping callers cannot both pass
    fn acquire(&self) -> ToolResult<()> {
        let mut last = self.last_execution.lock();
        let now = Instant::now();
        if let Some(previous) = *last {
            let elapsed = now.duration_since(previous);
            if elapsed < self.cooldown {
                return Err(ToolError::RateLimitExceeded {
                    retry_after: self.cooldown - elapsed,
                });
            }
        }
        *last = Some(now);
        Ok(())
    }
}

#[async_trait]
impl<T: Tool> Tool for RateLimited<T> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn description(&self) -> &str {
        self.inner.description()
    }

    async fn execute(&self, input: &str) -> ToolResult<String> {
        self.acquire()?;
        self.inner.execute(input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::WeatherTool;

    #[tokio::test]
    async fn test_second_call_inside_window_is_rejected() {
        let tool = RateLimited::new(WeatherTool::new(), Duration::from_secs(60));
        assert!(tool.last_execution_time().is_none());
        assert_eq!(tool.execute("Lima").await.unwrap(), "Weather for: Lima");
        assert!(tool.last_execution_time().is_some());

        match tool.execute("Lima").await {
            Err(ToolError::RateLimitExceeded { retry_after }) => {
                assert!(retry_after <= Duration::from_secs(60));
            }
            other => panic!("expected rate limit error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_call_after_cooldown_succeeds() {
        let tool = RateLimited::new(WeatherTool::new(), Duration::from_millis(20));
        tool.execute("Rome").await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(tool.execute("Rome").await.is_ok());
    }

    #[tokio::test]
    async fn test_zero_cooldown_never_limits() {
        let tool = RateLimited::new(WeatherTool::new(), Duration::ZERO);
        for _ in 0..3 {
            assert!(tool.execute("Kyiv").await.is_ok());
        }
    }
}
