use core::fmt;
use flight_plan::ActionResult;
use serde::{Deserialize, Serialize};

/// Where chat messages are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatMode {
    /// Forwarded to a remote agent
    Remote,
    /// Parsed by the local intent parser
    Local,
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatMode::Remote => write!(f, "remote"),
            ChatMode::Local => write!(f, "local"),
        }
    }
}

/// What a remote agent answered, after the transport layer has pulled any
/// function-call payload out of the model text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RemoteReply {
    FunctionCall {
        name: String,
        #[serde(default)]
        arguments: serde_json::Value,
    },
    Text {
        text: String,
    },
}

/// Answer to one chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Text to show the user
    pub text: String,
    /// Mode that produced this reply
    pub mode: ChatMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionResult>,
    /// Parser confidence, local mode only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Informational status, e.g. a switch to local mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl ChatReply {
    pub fn text(text: impl Into<String>, mode: ChatMode) -> Self {
        Self {
            text: text.into(),
            mode,
            action: None,
            confidence: None,
            notice: None,
        }
    }

    pub fn from_action(result: ActionResult, mode: ChatMode) -> Self {
        Self {
            text: result.message.clone(),
            mode,
            action: Some(result),
            confidence: None,
            notice: None,
        }
    }
}
