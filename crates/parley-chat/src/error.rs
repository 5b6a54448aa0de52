//! Error types for parley-chat

use thiserror::Error;

/// Result type alias using parley-chat Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving a chat session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The cancellation token fired before the response settled
    #[error("Request was cancelled by user")]
    Cancelled,

    /// The transport failed to produce a response
    #[error("{0}")]
    Transport(String),

    /// A request is already in flight for this session
    #[error("a request is already in flight")]
    Busy,

    /// Anything unclassified
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a transport error from a message
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Check if this error is a user cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_message_is_specific() {
        assert_eq!(Error::Cancelled.to_string(), "Request was cancelled by user");
        assert!(Error::Cancelled.is_cancelled());
    }

    #[test]
    fn test_transport_message_verbatim() {
        let e = Error::transport("mock backend unavailable");
        assert_eq!(e.to_string(), "mock backend unavailable");
        assert!(!e.is_cancelled());
    }
}
