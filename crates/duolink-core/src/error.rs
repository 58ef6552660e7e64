//! Shared error type across duolink crates.

use thiserror::Error;

/// Stable error codes (used in logs and asserted by tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid or out-of-range configuration.
    BadConfig,
    /// Unsupported config/protocol version.
    UnsupportedVersion,
    /// Serial hardware access failed.
    Link,
    /// A frame's END marker has not arrived yet.
    IncompleteFrame,
    /// A well-formed message arrived in a state that does not expect it.
    UnexpectedMessage,
    /// The session was ended by an abort condition.
    SessionAbort,
    /// Internal invariant failure.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Link => "LINK",
            ErrorCode::IncompleteFrame => "INCOMPLETE_FRAME",
            ErrorCode::UnexpectedMessage => "UNEXPECTED_MESSAGE",
            ErrorCode::SessionAbort => "SESSION_ABORT",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, DuolinkError>;

/// Unified error type used by core and node.
#[derive(Debug, Error)]
pub enum DuolinkError {
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("link: {0}")]
    Link(String),
    #[error("incomplete frame")]
    IncompleteFrame,
    #[error("unexpected message {message} in state {state}")]
    UnexpectedMessage { message: String, state: String },
    #[error("session aborted: {0}")]
    SessionAbort(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl DuolinkError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            DuolinkError::BadConfig(_) => ErrorCode::BadConfig,
            DuolinkError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            DuolinkError::Link(_) => ErrorCode::Link,
            DuolinkError::IncompleteFrame => ErrorCode::IncompleteFrame,
            DuolinkError::UnexpectedMessage { .. } => ErrorCode::UnexpectedMessage,
            DuolinkError::SessionAbort(_) => ErrorCode::SessionAbort,
            DuolinkError::Internal(_) => ErrorCode::Internal,
        }
    }
}
