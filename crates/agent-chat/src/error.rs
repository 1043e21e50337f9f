use thiserror::Error;

pub type Result<T, E = AgentError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("no remote agent configured")]
    NotConfigured,
    #[error("remote agent unavailable: {0}")]
    Unavailable(String),
    #[error("remote agent returned status {0}")]
    Status(u16),
    #[error("malformed reply: {0}")]
    Malformed(String),
}
