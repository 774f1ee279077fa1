use thiserror::Error;

/// Ways a completion request can fail.
///
/// The controller folds every variant into the same fallback reply; the
/// distinction only shows up in logs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompletionError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("completion service returned status {status}")]
    Status { status: u16 },

    #[error("malformed completion response: {0}")]
    MalformedResponse(String),
}

impl CompletionError {
    /// Short label used as a structured log field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Status { .. } => "status",
            Self::MalformedResponse(_) => "malformed",
        }
    }
}
