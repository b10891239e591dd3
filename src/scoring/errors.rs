use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("Invalid outcome: {0}")]
    InvalidOutcome(String),
}

impl ScoringError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ScoringError::InvalidOutcome(message.into())
    }
}
