use crate::{AgentError, ChatMode, ChatReply, RemoteAgent, RemoteReply, Result};
use flight_plan::{Dispatcher, RandomSource};
use intent_parser::{help_text, IntentParser};
use tracing::{info, warn};

/// One user's chat session over a flight-path registry.
///
/// Messages go to the remote agent while in [`ChatMode::Remote`]. Any remote
/// failure drops the session to [`ChatMode::Local`] until [`set_mode`] is
/// called. `send` borrows the session mutably, so at most one request is in
/// flight per session.
///
/// [`set_mode`]: ChatSession::set_mode
pub struct ChatSession<R> {
    mode: ChatMode,
    parser: IntentParser,
    dispatcher: Dispatcher<R>,
    agent: Option<Box<dyn RemoteAgent>>,
}

impl<R: RandomSource> ChatSession<R> {
    /// A session that only uses the local parser.
    pub fn local(parser: IntentParser, dispatcher: Dispatcher<R>) -> Self {
        Self {
            mode: ChatMode::Local,
            parser,
            dispatcher,
            agent: None,
        }
    }

    /// Attach a remote agent and start in remote mode.
    pub fn with_agent(mut self, agent: Box<dyn RemoteAgent>) -> Self {
        info!(agent = agent.name(), "remote agent attached");
        self.agent = Some(agent);
        self.mode = ChatMode::Remote;
        self
    }

    pub fn mode(&self) -> ChatMode {
        self.mode
    }

    /// Manual mode switch. Remote mode needs an agent.
    pub fn set_mode(&mut self, mode: ChatMode) -> Result<()> {
        if mode == ChatMode::Remote && self.agent.is_none() {
            return Err(AgentError::NotConfigured);
        }
        if self.mode != mode {
            info!(from = %self.mode, to = %mode, "chat mode changed");
        }
        self.mode = mode;
        Ok(())
    }

    pub fn dispatcher(&self) -> &Dispatcher<R> {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher<R> {
        &mut self.dispatcher
    }

    pub async fn send(&mut self, text: &str) -> ChatReply {
        let text = text.trim();
        if text.is_empty() {
            return ChatReply::text(help_text(), self.mode);
        }

        let mut notice = None;
        if self.mode == ChatMode::Remote {
            match self.ask_remote(text).await {
                Ok(reply) => return reply,
                Err(e) => {
                    warn!(error = %e, "remote agent failed; falling back to local parsing");
                    self.mode = ChatMode::Local;
                    notice = Some(format!(
                        "Remote agent unavailable ({e}). Switched to local mode."
                    ));
                }
            }
        }

        let mut reply = self.handle_locally(text);
        reply.notice = notice;
        reply
    }

    async fn ask_remote(&mut self, text: &str) -> Result<ChatReply> {
        let agent = self.agent.as_ref().ok_or(AgentError::NotConfigured)?;
        let reply = agent.complete(text).await?;
        Ok(match reply {
            RemoteReply::FunctionCall { name, arguments } => {
                let result = self.dispatcher.dispatch_raw(&name, arguments);
                ChatReply::from_action(result, ChatMode::Remote)
            }
            RemoteReply::Text { text } => ChatReply::text(text, ChatMode::Remote),
        })
    }

    fn handle_locally(&mut self, text: &str) -> ChatReply {
        let intent = self.parser.parse(text);
        let mut reply = match &intent.call {
            Some(call) => ChatReply::from_action(self.dispatcher.execute(call), ChatMode::Local),
            None => ChatReply::text(help_text(), ChatMode::Local),
        };
        reply.confidence = Some(intent.confidence);
        reply
    }
}
