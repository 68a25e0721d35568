pub mod memory;
pub mod seed;

use async_trait::async_trait;

use crate::models::{NewSubmission, Submission};

pub use memory::MemoryStore;

#[derive(Debug)]
pub enum StoreError {
    /// The backend could not be reached or refused the operation. The
    /// in-memory store never fails; durable backends report through this.
    Unavailable(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Append-only collection of accepted submissions.
///
/// Implementations own id assignment: `append` returns the id it gave the
/// record, and `list` yields records in insertion order.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn append(&self, record: NewSubmission) -> Result<String, StoreError>;
    async fn list(&self) -> Result<Vec<Submission>, StoreError>;
}
