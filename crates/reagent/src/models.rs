//! These models represent the objects passed around by the agents
//!
//! Messages are what [`ContextMemory`](crate::memory::ContextMemory) retains and what
//! chat-capable providers consume. Steps and results are the trace a loop hands back
//! to its caller once a run finishes.
pub mod message;
pub mod role;
pub mod step;
