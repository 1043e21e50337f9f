//! Scripted remote agent for development and testing

use crate::{AgentError, RemoteAgent, RemoteReply, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays queued replies in order; an empty queue behaves like an
/// unreachable endpoint.
#[derive(Default)]
pub struct MockAgent {
    script: Mutex<VecDeque<Result<RemoteReply>>>,
}

impl MockAgent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, reply: RemoteReply) -> Self {
        self.push(Ok(reply))
    }

    pub fn fail(self, error: AgentError) -> Self {
        self.push(Err(error))
    }

    fn push(self, item: Result<RemoteReply>) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(item);
        }
        self
    }
}

#[async_trait]
impl RemoteAgent for MockAgent {
    async fn complete(&self, text: &str) -> Result<RemoteReply> {
        tracing::debug!(text, "mock agent request");
        let mut script = self
            .script
            .lock()
            .map_err(|_| AgentError::Unavailable("mock script poisoned".to_string()))?;
        script
            .pop_front()
            .unwrap_or_else(|| Err(AgentError::Unavailable("no scripted reply".to_string())))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
