use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced by [`MealStore`](super::MealStore) operations.
///
/// Unknown ids are not errors; those operations are silent no-ops.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to persist catalog: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to serialize catalog: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Another `fetch_and_merge` has not finished yet
    #[error("A fetch is already in progress")]
    FetchInProgress,
}
