use async_trait::async_trait;
use std::sync::Arc;

use super::Chain;
use crate::errors::Result;
use crate::memory::ContextMemory;
use crate::models::message::Message;
use crate::providers::base::{GenerationParameters, Provider};

/// Multi-turn chat over the provider's chat interface, remembering each exchange
pub struct ConversationChain {
    provider: Arc<dyn Provider>,
    memory: ContextMemory,
    params: GenerationParameters,
}

impl ConversationChain {
    pub fn new(provider: Arc<dyn Provider>, memory: ContextMemory) -> Self {
        Self {
            provider,
            memory,
            params: GenerationParameters::default(),
        }
    }

    pub fn with_parameters(mut self, params: GenerationParameters) -> Self {
        self.params = params;
        self
    }

    pub fn memory(&self) -> &ContextMemory {
        &self.memory
    }
}

#[async_trait]
impl Chain for ConversationChain {
    type Input = String;
    type Output = String;

    async fn run(&mut self, input: String) -> Result<String> {
        self.memory.add_message(Message::user(input));
        let reply = self
            .provider
            .chat(self.memory.messages(), &self.params)
            .await?;
        self.memory.add_message(Message::assistant(reply.as_str()));
        Ok(reply)
    }
}
