//! Error classification shared by every component.
//!
//! Each component keeps its own `thiserror` enum. They all implement [`DomainError`] so
//! the HTTP layer can turn any of them into the same `{error, kind, message}` body
//! without knowing the concrete type.

use std::fmt;

/// Coarse error class. Decides the HTTP status of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Unauthorized,
    Forbidden,
    NotFound,
    InvalidSignature,
    InvalidTransition,
    UpstreamUnavailable,
    UpstreamTimeout,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::InvalidSignature => "INVALID_SIGNATURE",
            ErrorKind::InvalidTransition => "INVALID_TRANSITION",
            ErrorKind::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            ErrorKind::UpstreamTimeout => "UPSTREAM_TIMEOUT",
            ErrorKind::Internal => "INTERNAL",
        }
    }

    /// True when the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::UpstreamUnavailable | ErrorKind::UpstreamTimeout
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A component error with a stable machine-readable code.
pub trait DomainError: std::error::Error {
    fn kind(&self) -> ErrorKind;

    /// Upper-case code such as `EMPTY_CART`. Defaults to the kind's name.
    fn code(&self) -> &'static str {
        self.kind().as_str()
    }
}
