//! Error types for the HTTP client.
//!
//! # Design
//! Every failure reaches the caller through the `Err` arm of a single
//! `ClientError`, so a `Response` is only ever observed whole. The variants
//! say where the call failed: before anything was sent, on the wire, or while
//! draining the response body.

use thiserror::Error;

/// Errors returned by `Client` operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be built: bad URL, unsupported method, a body
    /// on a method that does not take one, or an illegal header.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The transport failed before a status line arrived (DNS, connect, TLS).
    #[error("transport error: {0}")]
    Transport(String),

    /// The configured timeout elapsed.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The status line arrived but the body could not be read in full.
    #[error("failed to read response body")]
    BodyRead(#[source] std::io::Error),

    /// A `ClientConfig` could not be parsed.
    #[error("invalid client config: {0}")]
    Config(String),
}

impl ClientError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;
    use std::io;

    use super::*;

    #[test]
    fn body_read_keeps_io_source() {
        let err = ClientError::BodyRead(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated"));
        assert_eq!(err.to_string(), "failed to read response body");
        assert_eq!(err.source().unwrap().to_string(), "truncated");
    }

    #[test]
    fn only_timeout_reports_timeout() {
        assert!(ClientError::Timeout("global".to_string()).is_timeout());
        assert!(!ClientError::Transport("refused".to_string()).is_timeout());
    }
}
