use thiserror::Error;

use crate::ephemeris::EphemerisError;

/// Errors surfaced by chart derivation.
#[derive(Error, Debug)]
pub enum KundaliError {
    /// Malformed birth data or query parameters. Never retried.
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
    /// The ephemeris provider could not supply a complete sample; no partial chart is produced.
    #[error("Ephemeris unavailable: {0}")]
    EphemerisUnavailable(#[from] EphemerisError),
    /// An internal invariant broke. This is a defect, not a runtime condition.
    #[error("Invariant violated: {0}")]
    Invariant(String),
}

impl KundaliError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        KundaliError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        let message = message.into();
        log::error!("invariant violated: {}", message);
        KundaliError::Invariant(message)
    }
}

pub type Result<T> = std::result::Result<T, KundaliError>;
