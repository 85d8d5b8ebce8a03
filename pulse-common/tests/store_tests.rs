//! Behavioural tests shared by the local store backends
//!
//! Covers:
//! - Oldest-first ordering after successive appends
//! - Durability across a simulated restart (file yes, memory no)
//! - Idempotent delete of unknown ids
//! - Backend selection through `open_configured`

use pulse_common::config::BackendSettings;
use pulse_common::store::{open_configured, FileStore, MemoryStore, SubmissionStore};
use pulse_common::submission::Submission;
use pulse_common::triad::Point;

fn submission(name: &str, narrative: &str) -> Submission {
    Submission {
        id: String::new(),
        name: name.to_string(),
        date: "2024-11-06T08:15".to_string(),
        narrative: narrative.to_string(),
        value_triad: Point::new(250.0, 250.0),
        identity_triad: Point::new(200.0, 300.0),
        university_startup_slider: 30,
        timestamp: String::new(),
        analysis: None,
    }
}

async fn assert_append_order(store: &dyn SubmissionStore) {
    let first = store.append(submission("Anna", "first")).await.unwrap();
    let second = store.append(submission("Matt", "second")).await.unwrap();
    assert_ne!(first, second);

    let listed = store.list().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, first);
    assert_eq!(listed[0].narrative, "first");
    assert_eq!(listed[1].id, second);
    assert_eq!(listed[1].narrative, "second");
    assert!(!listed[0].timestamp.is_empty());
}

async fn assert_delete_semantics(store: &dyn SubmissionStore) {
    let keep = store.append(submission("Jane", "keep")).await.unwrap();
    let doomed = store.append(submission("Jane", "drop")).await.unwrap();

    assert!(!store.delete("no-such-id").await.unwrap());
    assert_eq!(store.list().await.unwrap().len(), 2);

    assert!(store.delete(&doomed).await.unwrap());
    let listed = store.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, keep);

    // Second delete of the same id is a no-op
    assert!(!store.delete(&doomed).await.unwrap());
}

// =============================================================================
// Memory backend
// =============================================================================

#[tokio::test]
async fn test_memory_append_order() {
    assert_append_order(&MemoryStore::new()).await;
}

#[tokio::test]
async fn test_memory_delete() {
    assert_delete_semantics(&MemoryStore::new()).await;
}

#[tokio::test]
async fn test_memory_does_not_survive_restart() {
    let store = MemoryStore::new();
    store.append(submission("Kirill", "volatile")).await.unwrap();
    assert_eq!(store.list().await.unwrap().len(), 1);
    drop(store);

    let restarted = MemoryStore::new();
    assert!(restarted.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_memory_instances_are_independent() {
    let a = MemoryStore::new();
    let b = MemoryStore::new();
    a.append(submission("Anna", "only in a")).await.unwrap();
    assert!(b.list().await.unwrap().is_empty());
}

// =============================================================================
// File backend
// =============================================================================

#[tokio::test]
async fn test_file_creates_empty_array() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).await.unwrap();

    assert!(store.path().exists());
    assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "[]");
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_file_append_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).await.unwrap();
    assert_append_order(&store).await;
}

#[tokio::test]
async fn test_file_delete() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).await.unwrap();
    assert_delete_semantics(&store).await;
}

#[tokio::test]
async fn test_file_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let id = {
        let store = FileStore::open(dir.path()).await.unwrap();
        store.append(submission("Anastasia", "durable")).await.unwrap()
    };

    let reopened = FileStore::open(dir.path()).await.unwrap();
    let listed = reopened.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    assert_eq!(listed[0].narrative, "durable");
}

#[tokio::test]
async fn test_file_is_pretty_printed_camel_case() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).await.unwrap();
    store.append(submission("Andrej", "format")).await.unwrap();

    let text = std::fs::read_to_string(store.path()).unwrap();
    assert!(text.contains("\n  {"));
    assert!(text.contains("\"universityStartupSlider\": 30"));
}

#[tokio::test]
async fn test_file_skips_malformed_entries_but_keeps_them() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).await.unwrap();
    std::fs::write(store.path(), r#"[{"name": "half a record"}]"#).unwrap();

    assert!(store.list().await.unwrap().is_empty());

    store.append(submission("Jordi", "after damage")).await.unwrap();
    let listed = store.list().await.unwrap();
    assert_eq!(listed.len(), 1);

    let text = std::fs::read_to_string(store.path()).unwrap();
    assert!(text.contains("half a record"));
}

#[tokio::test]
async fn test_file_unparsable_document_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).await.unwrap();
    std::fs::write(store.path(), "{ not an array").unwrap();

    assert!(store.list().await.is_err());
}

// =============================================================================
// Selection through configuration
// =============================================================================

#[tokio::test]
async fn test_open_configured_file_backend() {
    let dir = tempfile::tempdir().unwrap();
    let settings = BackendSettings {
        remote_url: Some("http://insecure.example.com".to_string()),
        remote_token: Some("token".to_string()),
        data_dir: Some(dir.path().join("data")),
    };

    let store = open_configured(&settings).await.unwrap();
    assert_eq!(store.backend_name(), "file");
    assert!(dir.path().join("data").join("submissions.json").exists());
}

#[tokio::test]
async fn test_open_configured_memory_backend() {
    let store = open_configured(&BackendSettings::default()).await.unwrap();
    assert_eq!(store.backend_name(), "memory");
}

#[tokio::test]
async fn test_open_configured_remote_backend() {
    let settings = BackendSettings {
        remote_url: Some("https://kv.example.com".to_string()),
        remote_token: Some("token".to_string()),
        data_dir: None,
    };

    // Construction does not contact the service
    let store = open_configured(&settings).await.unwrap();
    assert_eq!(store.backend_name(), "remote");
}
