use std::fmt;

use storefront_core::LoadError;
use thiserror::Error;

/// Failure of one GraphQL round trip.
///
/// Displays as the bare message so it reads the same once recorded in
/// loader state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn missing(path: &str, message: impl Into<String>) -> Self {
        Self::new(
            FailureKind::MissingData {
                path: path.to_string(),
            },
            message,
        )
    }
}

impl From<FetchError> for LoadError {
    fn from(err: FetchError) -> Self {
        LoadError::new(err.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidEndpoint,
    HttpStatus(u16),
    Timeout,
    Network,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    GraphqlErrors,
    MissingData { path: String },
    ClientPanicked,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidEndpoint => write!(f, "invalid endpoint"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::GraphqlErrors => write!(f, "graphql errors"),
            FailureKind::MissingData { path } => write!(f, "missing data at {path}"),
            FailureKind::ClientPanicked => write!(f, "query client panicked"),
        }
    }
}
