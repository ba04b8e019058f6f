use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

use super::{Tool, ToolError, ToolResult};

/// Performs whatever handshake a wrapped tool needs before it may run
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self) -> ToolResult<()>;
}

/// Wraps a tool so that every call fails with [`ToolError::NotAuthenticated`]
/// until [`authenticate`](Self::authenticate) has succeeded once.
pub struct Authenticated<T, A> {
    inner: T,
    authenticator: A,
    authenticated: AtomicBool,
}

impl<T: Tool, A: Authenticator> Authenticated<T, A> {
    pub fn new(inner: T, authenticator: A) -> Self {
        Self {
            inner,
            authenticator,
            authenticated: AtomicBool::new(false),
        }
    }

    pub async fn authenticate(&self) -> ToolResult<()> {
        self.authenticator.authenticate().await?;
        self.authenticated.store(true, Ordering::SeqCst);
        debug!(tool = self.inner.name(), "tool authenticated");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[async_trait]
impl<T: Tool, A: Authenticator> Tool for Authenticated<T, A> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn description(&self) -> &str {
        self.inner.description()
    }

    async fn execute(&self, input: &str) -> ToolResult<String> {
        if !self.is_authenticated() {
            return Err(ToolError::NotAuthenticated);
        }
        self.inner.execute(input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::SearchTool;

    struct StaticKey(Option<&'static str>);

    #[async_trait]
    impl Authenticator for StaticKey {
        async fn authenticate(&self) -> ToolResult<()> {
            match self.0 {
                Some(_) => Ok(()),
                None => Err(ToolError::ExecutionFailed("no api key".to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_rejects_calls_before_authentication() {
        let tool = Authenticated::new(SearchTool::new(), StaticKey(Some("key")));
        assert!(!tool.is_authenticated());
        assert_eq!(tool.execute("rust").await, Err(ToolError::NotAuthenticated));

        tool.authenticate().await.unwrap();
        assert!(tool.is_authenticated());
        assert_eq!(tool.execute("rust").await.unwrap(), "Search results for: rust");
    }

    #[tokio::test]
    async fn test_failed_authentication_keeps_tool_locked() {
        let tool = Authenticated::new(SearchTool::new(), StaticKey(None));
        assert!(tool.authenticate().await.is_err());
        assert!(!tool.is_authenticated());
        assert_eq!(tool.name(), "search");
    }
}
