#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("connection refused: {reason}")]
    ConnectionRefused { reason: String },

    #[error("timeout waiting for {operation}")]
    Timeout { operation: String },

    #[error("gateway rejected {command}: {reason}")]
    Rejected { command: String, reason: String },

    #[error("invalid response to {command}: {reason}")]
    InvalidResponse { command: String, reason: String },

    #[error("{action} failed: {reason}")]
    ActionFailed { action: &'static str, reason: String },

    #[error("disconnected: {reason}")]
    Disconnected { reason: String },

    #[error("not connected")]
    NotConnected,

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

impl Error {
    pub fn action(action: &'static str, reason: impl Into<String>) -> Self {
        Error::ActionFailed { action, reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
