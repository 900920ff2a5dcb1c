use thiserror::Error;

pub type MailcastResult<T> = Result<T, MailcastError>;

#[derive(Error, Debug)]
pub enum MailcastError {
    /// Bad input or an operation against an entity in the wrong state.
    /// Surfaced to API callers with 4xx semantics.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// Campaign lifecycle violation (e.g. dispatching a non-draft campaign).
    #[error("Invalid campaign state: {action} requires {required}, campaign is {actual}")]
    InvalidState {
        action: &'static str,
        required: &'static str,
        actual: String,
    },

    /// Resolution produced an empty recipient set; dispatch never started.
    #[error("Campaign has no recipients")]
    NoRecipients,

    #[error("Insufficient permissions: {0}")]
    Forbidden(String),

    /// A single send attempt failed. Recorded per recipient, never aborts
    /// the batch.
    #[error("Mail transport error: {0}")]
    Transport(String),

    /// The transport session could not be established at all; the whole
    /// batch aborts and the campaign is marked failed.
    #[error("Mail transport unavailable: {0}")]
    TransportUnavailable(String),

    /// Engagement-write failure. Logged and swallowed; never surfaced to
    /// the remote mail client.
    #[error("Tracking error: {0}")]
    Tracking(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl MailcastError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }
}
