use thiserror::Error;

/// Errors that can occur while scanning, analyzing, or serving requests.
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("invalid path '{path}': {message}")]
    InvalidPath { path: String, message: String },

    #[error("cannot read '{path}': {message}")]
    FileUnreadable { path: String, message: String },

    #[error("scan failed for '{path}': {message}")]
    Scan { path: String, message: String },

    #[error("method not found: {method}")]
    UnknownMethod { method: String },

    #[error("unknown resource: {uri}")]
    UnknownResource { uri: String },

    #[error("unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("unknown prompt: {name}")]
    UnknownPrompt { name: String },

    #[error("invalid params: {message}")]
    InvalidParams { message: String },

    #[error("handler failed: {message}")]
    Handler { message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MetricsError {
    /// Returns the unrecognized identifier for the `Unknown*` variants.
    pub fn identifier(&self) -> Option<&str> {
        match self {
            Self::UnknownMethod { method } => Some(method),
            Self::UnknownResource { uri } => Some(uri),
            Self::UnknownTool { name } | Self::UnknownPrompt { name } => Some(name),
            _ => None,
        }
    }

    pub(crate) fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParams {
            message: message.into(),
        }
    }
}

/// Convenience alias for results using `MetricsError`.
pub type Result<T> = std::result::Result<T, MetricsError>;
