//! agent-chat: chat orchestration for the flight planner
//!
//! A chat session forwards user messages to a remote agent when one is
//! attached and falls back, for the rest of the session, to the local intent
//! parser as soon as the remote side fails. Either way the resolved function
//! call is applied through the `flight-plan` dispatcher.

mod error;
pub use error::{AgentError, Result};

mod types;
pub use types::{ChatMode, ChatReply, RemoteReply};

mod traits;
pub use traits::RemoteAgent;

mod session;
pub use session::ChatSession;

#[cfg(feature = "mock")]
mod mock;

#[cfg(feature = "mock")]
pub use mock::MockAgent;
