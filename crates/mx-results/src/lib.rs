//! mx-results: batch keys, in-memory recipe cache and on-disk batch store.

pub mod cache;
pub mod hash;
pub mod store;
pub mod types;

pub use cache::RecipeCache;
pub use hash::{GenerationInputs, compute_batch_key};
pub use store::BatchStore;
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Batch not found: {key}")]
    BatchNotFound { key: String },

    #[error("Invalid path: {message}")]
    InvalidPath { message: String },
}
