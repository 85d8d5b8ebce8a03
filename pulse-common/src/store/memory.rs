//! In-process store used when no durable backend is configured

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StoreResult, SubmissionStore};
use crate::submission::Submission;

/// Ordered in-memory log; contents die with the instance
#[derive(Debug, Default)]
pub struct MemoryStore {
    submissions: RwLock<Vec<Submission>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn append(&self, mut submission: Submission) -> StoreResult<String> {
        submission.ensure_identity();
        let id = submission.id.clone();
        self.submissions.write().await.push(submission);
        Ok(id)
    }

    async fn list(&self) -> StoreResult<Vec<Submission>> {
        Ok(self.submissions.read().await.clone())
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut submissions = self.submissions.write().await;
        let before = submissions.len();
        submissions.retain(|s| s.id != id);
        Ok(submissions.len() != before)
    }
}
