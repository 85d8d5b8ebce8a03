//! File-backed store: a single JSON array on disk
//!
//! Every append reads the whole array, pushes, and rewrites the file. Writers
//! inside one process are serialized by `write_lock`; separate processes
//! sharing the file are not coordinated and can lose each other's updates.

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

use super::{decode_entries, StoreResult, SubmissionStore, SUBMISSIONS_KEY};
use crate::submission::Submission;

/// JSON-array file store
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open `<dir>/submissions.json`, creating the directory and an empty
    /// array when missing
    pub async fn open(dir: &Path) -> StoreResult<Self> {
        tokio::fs::create_dir_all(dir).await?;

        let path = dir.join(format!("{}.json", SUBMISSIONS_KEY));
        if !tokio::fs::try_exists(&path).await? {
            tokio::fs::write(&path, b"[]").await?;
            debug!(path = %path.display(), "Created empty submissions file");
        }

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw array entries; undecodable ones are kept so a rewrite never drops them
    async fn read_raw(&self) -> StoreResult<Vec<Value>> {
        let bytes = tokio::fs::read(&self.path).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn write_raw(&self, entries: &[Value]) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(entries)?;
        // Replace via rename so a crash mid-write never leaves a truncated file
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl SubmissionStore for FileStore {
    fn backend_name(&self) -> &'static str {
        "file"
    }

    async fn append(&self, mut submission: Submission) -> StoreResult<String> {
        submission.ensure_identity();
        let id = submission.id.clone();

        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_raw().await?;
        entries.push(serde_json::to_value(&submission)?);
        self.write_raw(&entries).await?;

        debug!(id = %id, total = entries.len(), "Appended submission to file");
        Ok(id)
    }

    async fn list(&self) -> StoreResult<Vec<Submission>> {
        Ok(decode_entries(self.read_raw().await?))
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_raw().await?;
        let before = entries.len();
        entries.retain(|entry| entry.get("id").and_then(Value::as_str) != Some(id));

        if entries.len() == before {
            return Ok(false);
        }
        self.write_raw(&entries).await?;
        Ok(true)
    }
}
