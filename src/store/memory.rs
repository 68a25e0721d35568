use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{NewSubmission, Submission};

use super::{StoreError, SubmissionStore};

/// Process-lifetime store. Nothing survives a restart.
pub struct MemoryStore {
    submissions: RwLock<Vec<Submission>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            submissions: RwLock::new(Vec::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn append(&self, record: NewSubmission) -> Result<String, StoreError> {
        // The id is read and the record pushed under one write guard, so
        // concurrent appends can never observe the same length.
        let mut submissions = self.submissions.write().await;
        let id = submissions.len().to_string();
        submissions.push(record.with_id(id.clone()));
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<Submission>, StoreError> {
        Ok(self.submissions.read().await.clone())
    }
}
