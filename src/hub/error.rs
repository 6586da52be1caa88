use time::Duration;

/// Recoverable failures of hub operations. Each is reported back to the
/// originating connection only; `Banned` additionally closes the connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HubError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("message is empty after sanitization")]
    EmptyMessage,
    #[error("no active pairing")]
    NotPaired,
    #[error("not authorized")]
    NotAuthorized,
    #[error("no such pairing")]
    UnknownPairing,
    #[error("banned")]
    Banned {
        reason: String,
        /// `None` means permanent.
        duration: Option<Duration>,
    },
}

impl HubError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }
}
