use thiserror::Error;

/// Failure of a single page fetch, as recorded in loader state.
///
/// The loader treats every failure the same way, so only the rendered
/// message of the underlying error is kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LoadError {
    pub message: String,
}

impl LoadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
