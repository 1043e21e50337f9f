use crate::{RemoteReply, Result};
use async_trait::async_trait;

/// A remote conversational agent (e.g. a hosted chat-completion model behind
/// an HTTP route).
#[async_trait]
pub trait RemoteAgent: Send + Sync {
    /// Send one user message and wait for the reply.
    async fn complete(&self, text: &str) -> Result<RemoteReply>;

    /// Short name for logs
    fn name(&self) -> &str;
}
