use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TalentError {
    #[error("Invalid move: no job currently has order {from_order}")]
    InvalidMove { from_order: u32 },

    #[error("{collection} record not found: {id}")]
    NotFound { collection: &'static str, id: u32 },

    #[error("Transient server failure")]
    TransientFailure,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl TalentError {
    pub fn not_found(collection: &'static str, id: u32) -> Self {
        TalentError::NotFound { collection, id }
    }

    /// Whether re-issuing the same request could plausibly succeed.
    /// Transient and network failures are retryable by the user; validation
    /// and not-found errors are deterministic.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TalentError::TransientFailure | TalentError::Network(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TalentError>;
