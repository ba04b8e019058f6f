pub mod conversation;
pub mod llm_chain;
pub mod sequential;

use async_trait::async_trait;

use crate::errors::Result;

pub use conversation::ConversationChain;
pub use llm_chain::LlmChain;
pub use sequential::Sequential;

/// A unit of work from `Input` to `Output`. Chains may keep state between runs.
#[async_trait]
pub trait Chain: Send {
    type Input: Send + 'static;
    type Output: Send + 'static;

    async fn run(&mut self, input: Self::Input) -> Result<Self::Output>;
}

#[async_trait]
impl<C: Chain + ?Sized> Chain for Box<C> {
    type Input = C::Input;
    type Output = C::Output;

    async fn run(&mut self, input: Self::Input) -> Result<Self::Output> {
        (**self).run(input).await
    }
}

pub trait ChainExt: Chain + Sized {
    /// Run `self`, then feed its output to `next`
    fn then<N>(self, next: N) -> Sequential<Self, N>
    where
        N: Chain<Input = Self::Output>,
    {
        Sequential::new(self, next)
    }
}

impl<C: Chain + Sized> ChainExt for C {}
