//! Submission store
//!
//! An append-only, oldest-first log of [`Submission`]s with delete-by-id.
//! Three interchangeable backends implement [`SubmissionStore`]:
//!
//! - [`FileStore`]: one JSON array on disk, rewritten on every append
//! - [`RemoteListStore`]: a REST key-value list (push-to-head, read reversed)
//! - [`MemoryStore`]: process-local, lost on restart
//!
//! The backend is chosen once at startup by [`select_backend`] and held as a
//! `SharedStore` for the process lifetime. Request handlers never inspect
//! configuration.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::BackendSettings;
use crate::error::{DecodeError, StoreError};
use crate::submission::Submission;

mod file;
mod memory;
mod remote;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use remote::{RemoteCredentials, RemoteListStore};

/// Fixed key / file stem under which submissions live
pub const SUBMISSIONS_KEY: &str = "submissions";

/// Store result type
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Store handle shared across request handlers
pub type SharedStore = Arc<dyn SubmissionStore>;

/// Append / list / delete over submissions
///
/// Every implementation returns `list()` oldest-first, whatever its native
/// ordering.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Short identifier for logs and the health endpoint
    fn backend_name(&self) -> &'static str;

    /// Persist a submission, assigning `id`/`timestamp` when absent
    ///
    /// Returns the record id.
    async fn append(&self, submission: Submission) -> StoreResult<String>;

    /// All submissions, oldest first
    async fn list(&self) -> StoreResult<Vec<Submission>>;

    /// Remove the submission with this id
    ///
    /// Deleting an unknown id is not an error; the return value reports
    /// whether a record was removed.
    async fn delete(&self, id: &str) -> StoreResult<bool>;
}

/// Outcome of the backend-selection policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendChoice {
    Remote(RemoteCredentials),
    File(PathBuf),
    Memory,
}

/// Decide which backend to use
///
/// Remote wins when both parameters are present and well formed. A partial or
/// malformed remote configuration is logged and ignored. Otherwise the file
/// backend is used when a data directory is configured, else memory.
pub fn select_backend(settings: &BackendSettings) -> BackendChoice {
    match RemoteCredentials::from_settings(settings) {
        Ok(Some(credentials)) => return BackendChoice::Remote(credentials),
        Ok(None) => {}
        Err(e) => {
            warn!(error = %e, "Ignoring remote store configuration, falling back");
        }
    }

    match &settings.data_dir {
        Some(dir) => BackendChoice::File(dir.clone()),
        None => BackendChoice::Memory,
    }
}

/// Build the store for a backend choice
pub async fn open_store(choice: BackendChoice) -> StoreResult<SharedStore> {
    let store: SharedStore = match choice {
        BackendChoice::Remote(credentials) => {
            info!(url = %credentials.url(), "Using remote list store");
            Arc::new(RemoteListStore::new(credentials)?)
        }
        BackendChoice::File(dir) => {
            let store = FileStore::open(&dir).await?;
            info!(path = %store.path().display(), "Using file store");
            Arc::new(store)
        }
        BackendChoice::Memory => {
            warn!("No remote store configured; submissions will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };
    Ok(store)
}

/// Convenience: select then open
pub async fn open_configured(settings: &BackendSettings) -> StoreResult<SharedStore> {
    open_store(select_backend(settings)).await
}

/// Decode one stored entry
///
/// Backends hand back either a JSON-encoded string or an already-decoded
/// object depending on how the entry was written; both are accepted.
pub(crate) fn decode_entry(index: usize, entry: serde_json::Value) -> Result<Submission, DecodeError> {
    let decoded = match entry {
        serde_json::Value::String(text) => serde_json::from_str(&text),
        other => serde_json::from_value(other),
    };
    decoded.map_err(|e| DecodeError {
        index,
        reason: e.to_string(),
    })
}

/// Decode a collection, dropping entries that fail with a warning
pub(crate) fn decode_entries(entries: Vec<serde_json::Value>) -> Vec<Submission> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match decode_entry(index, entry) {
            Ok(submission) => Some(submission),
            Err(e) => {
                warn!(error = %e, "Skipping undecodable submission");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings(url: Option<&str>, token: Option<&str>, dir: Option<&str>) -> BackendSettings {
        BackendSettings {
            remote_url: url.map(str::to_string),
            remote_token: token.map(str::to_string),
            data_dir: dir.map(PathBuf::from),
        }
    }

    #[test]
    fn test_selects_remote_for_https_with_token() {
        let choice = select_backend(&settings(
            Some("https://kv.example.com"),
            Some("secret"),
            Some("/tmp/data"),
        ));
        match choice {
            BackendChoice::Remote(c) => assert_eq!(c.url().as_str(), "https://kv.example.com/"),
            other => panic!("expected remote, got {:?}", other),
        }
    }

    #[test]
    fn test_insecure_scheme_falls_back_to_memory() {
        let choice = select_backend(&settings(Some("http://kv.example.com"), Some("secret"), None));
        assert_eq!(choice, BackendChoice::Memory);
    }

    #[test]
    fn test_missing_token_falls_back_to_file() {
        let choice = select_backend(&settings(Some("https://kv.example.com"), None, Some("/tmp/data")));
        assert_eq!(choice, BackendChoice::File(PathBuf::from("/tmp/data")));
    }

    #[test]
    fn test_blank_values_fall_back() {
        let choice = select_backend(&settings(Some("  "), Some(""), None));
        assert_eq!(choice, BackendChoice::Memory);
    }

    #[test]
    fn test_garbage_url_does_not_panic() {
        let choice = select_backend(&settings(Some("not a url"), Some("secret"), None));
        assert_eq!(choice, BackendChoice::Memory);
    }

    #[test]
    fn test_nothing_configured_is_memory() {
        assert_eq!(select_backend(&BackendSettings::default()), BackendChoice::Memory);
    }

    fn entry() -> serde_json::Value {
        json!({
            "id": "1",
            "name": "Jordi",
            "date": "2024-11-01T12:00",
            "narrative": "n",
            "valueTriad": {"x": 250.0, "y": 250.0},
            "identityTriad": {"x": 250.0, "y": 250.0},
            "universityStartupSlider": 40,
            "timestamp": "2024-11-01T12:00:00.000Z"
        })
    }

    #[test]
    fn test_decode_accepts_string_and_object() {
        let as_object = decode_entry(0, entry()).unwrap();
        let as_string = decode_entry(1, json!(entry().to_string())).unwrap();
        assert_eq!(as_object, as_string);
        assert_eq!(as_object.name, "Jordi");
    }

    #[test]
    fn test_decode_entries_skips_malformed() {
        let entries = vec![entry(), json!("{not json"), json!(42), json!({"name": "Anna"})];
        let decoded = decode_entries(entries);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].id, "1");
    }

    #[tokio::test]
    async fn test_open_memory_store() {
        let store = open_store(BackendChoice::Memory).await.unwrap();
        assert_eq!(store.backend_name(), "memory");
        assert!(store.list().await.unwrap().is_empty());
    }
}
