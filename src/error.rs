use rusqlite::ErrorCode;
use thiserror::Error;

use crate::models::Entity;

/// Failures surfaced by the record store and the input validation in front of
/// it. The shell turns each kind into its own footer message.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: i64 },

    #[error("score {score} exceeds the exam maximum of {max_score}")]
    ScoreExceedsMaximum { score: i64, max_score: i64 },

    #[error("constraint violated: {0}")]
    ConstraintViolation(String),

    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// Label a rusqlite failure with the operation that produced it. Constraint
/// failures are reported as [`StoreError::ConstraintViolation`] instead.
pub(crate) trait StoreContext<T> {
    fn context(self, context: &'static str) -> Result<T>;
}

impl<T> StoreContext<T> for rusqlite::Result<T> {
    fn context(self, context: &'static str) -> Result<T> {
        self.map_err(|source| {
            if matches!(
                source.sqlite_error_code(),
                Some(ErrorCode::ConstraintViolation)
            ) {
                StoreError::ConstraintViolation(format!("{context}: {source}"))
            } else {
                StoreError::Store { context, source }
            }
        })
    }
}
