use thiserror::Error;

pub type Result<T, E = IntentError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum IntentError {
    #[error("invalid pattern: {0}")]
    Regex(#[from] regex::Error),
    #[error("unknown fallback area: {0}")]
    UnknownArea(String),
}
