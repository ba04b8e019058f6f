//! Name-keyed directories of tools and agents.
//!
//! Registries are ordinary values: the application creates one and passes it
//! wherever it is needed. Every operation takes the lock for its own duration, so
//! concurrent callers are serialized and the last registration for a name wins.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::agents::Agent;
use crate::tools::Tool;

#[derive(Default)]
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, Arc<dyn Tool>>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its own name, replacing any previous entry
    pub fn register(&self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.write().insert(name.clone(), tool).is_some() {
            debug!(tool = %name, "replaced registered tool");
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.read().get(name).cloned()
    }

    /// Snapshot of every registered tool, in no particular order
    pub fn all(&self) -> Vec<Arc<dyn Tool>> {
        self.tools.read().values().cloned().collect()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn remove(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.write().remove(name)
    }

    pub fn clear(&self) {
        self.tools.write().clear();
    }

    pub fn len(&self) -> usize {
        self.tools.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.read().is_empty()
    }
}

/// Agents are stateful while running, so each entry sits behind an async mutex
pub type SharedAgent = Arc<Mutex<Box<dyn Agent>>>;

#[derive(Default)]
pub struct AgentRegistry {
    agents: RwLock<HashMap<String, SharedAgent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent under `name`, replacing any previous entry
    pub fn register<S: Into<String>>(&self, name: S, agent: Box<dyn Agent>) -> SharedAgent {
        let shared: SharedAgent = Arc::new(Mutex::new(agent));
        self.agents.write().insert(name.into(), Arc::clone(&shared));
        shared
    }

    pub fn get(&self, name: &str) -> Option<SharedAgent> {
        self.agents.read().get(name).cloned()
    }

    pub fn all(&self) -> Vec<SharedAgent> {
        self.agents.read().values().cloned().collect()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.agents.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn remove(&self, name: &str) -> Option<SharedAgent> {
        self.agents.write().remove(name)
    }

    pub fn clear(&self) {
        self.agents.write().clear();
    }

    pub fn len(&self) -> usize {
        self.agents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.read().is_empty()
    }
}
