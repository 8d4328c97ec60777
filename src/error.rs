//! Errors surfaced to the user for direct actions (add/delete column or card,
//! deck and profile commands). Background work logs instead of returning these.

use crate::domain::{ColumnId, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Column {0} not found on this board")]
    ColumnNotFound(ColumnId),

    #[error("No user is signed in")]
    NotSignedIn,

    #[error("Not authorized: {0}")]
    NotAuthorized(String),
}

pub type BoardResult<T> = Result<T, BoardError>;

/// Trimmed `value`, or `InvalidInput` naming `field` when it is blank
pub(crate) fn require_text(value: &str, field: &str) -> BoardResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BoardError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}
