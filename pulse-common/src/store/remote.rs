//! Remote list store over a REST key-value service
//!
//! Speaks the Upstash / Vercel KV REST dialect: each command is a JSON array
//! POSTed to the base URL with a bearer token, answered by
//! `{"result": ...}` or `{"error": "..."}`. Transactions go to `/multi-exec`.
//!
//! Submissions live in one list under [`SUBMISSIONS_KEY`]. Appends push to the
//! head, so the native order is newest-first and `list()` reverses it.
//!
//! The list primitive has no delete-by-id. Delete rewrites the whole list in a
//! single `multi-exec` transaction (DEL + RPUSH of the survivors). Deletes in
//! this process are serialized by `rewrite_lock`; an append from another
//! process landing between the read and the transaction is lost.

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{decode_entries, decode_entry, StoreResult, SubmissionStore, SUBMISSIONS_KEY};
use crate::config::BackendSettings;
use crate::error::{BackendConfigError, StoreError};
use crate::submission::Submission;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Validated connection parameters for the remote store
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteCredentials {
    url: Url,
    token: String,
}

impl RemoteCredentials {
    /// Validate a URL + token pair; the URL must use https
    pub fn new(url: &str, token: &str) -> Result<Self, BackendConfigError> {
        let url = url.trim();
        let token = token.trim();
        if url.is_empty() {
            return Err(BackendConfigError::MissingParameter("remote store URL"));
        }
        if token.is_empty() {
            return Err(BackendConfigError::MissingParameter("remote store token"));
        }

        let parsed = Url::parse(url).map_err(|e| BackendConfigError::InvalidUrl(e.to_string()))?;
        if parsed.scheme() != "https" {
            return Err(BackendConfigError::InsecureScheme(parsed.scheme().to_string()));
        }

        Ok(Self {
            url: parsed,
            token: token.to_string(),
        })
    }

    /// `Ok(None)` when no remote parameter is set at all
    pub fn from_settings(settings: &BackendSettings) -> Result<Option<Self>, BackendConfigError> {
        let url = non_blank(settings.remote_url.as_deref());
        let token = non_blank(settings.remote_token.as_deref());

        match (url, token) {
            (None, None) => Ok(None),
            (Some(_), None) => Err(BackendConfigError::MissingParameter("remote store token")),
            (None, Some(_)) => Err(BackendConfigError::MissingParameter("remote store URL")),
            (Some(url), Some(token)) => Self::new(url, token).map(Some),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

// Keep the token out of logs and panic messages
impl fmt::Debug for RemoteCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteCredentials")
            .field("url", &self.url.as_str())
            .field("token", &"<redacted>")
            .finish()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Response envelope for a single REST command
#[derive(Debug, Deserialize)]
struct CommandResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Submission store backed by a remote list
pub struct RemoteListStore {
    http_client: reqwest::Client,
    credentials: RemoteCredentials,
    rewrite_lock: Mutex<()>,
}

impl RemoteListStore {
    pub fn new(credentials: RemoteCredentials) -> StoreResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            credentials,
            rewrite_lock: Mutex::new(()),
        })
    }

    fn transaction_url(&self) -> String {
        format!("{}/multi-exec", self.credentials.url.as_str().trim_end_matches('/'))
    }

    async fn post(&self, url: &str, body: &Value) -> StoreResult<reqwest::Response> {
        let response = self
            .http_client
            .post(url)
            .bearer_auth(&self.credentials.token)
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<CommandResponse>(&text)
            .ok()
            .and_then(|r| r.error)
            .unwrap_or(text);
        Err(StoreError::Remote {
            status: status.as_u16(),
            message,
        })
    }

    /// Run one command and return its `result`
    async fn command(&self, command: Value) -> StoreResult<Value> {
        let response = self.post(self.credentials.url.as_str(), &command).await?;
        let envelope: CommandResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Transport(e.without_url().to_string()))?;
        unwrap_envelope(envelope)
    }

    /// Run commands atomically
    async fn transaction(&self, commands: Vec<Value>) -> StoreResult<()> {
        let response = self.post(&self.transaction_url(), &Value::Array(commands)).await?;
        let envelopes: Vec<CommandResponse> = response
            .json()
            .await
            .map_err(|e| StoreError::Transport(e.without_url().to_string()))?;
        for envelope in envelopes {
            unwrap_envelope(envelope)?;
        }
        Ok(())
    }

    /// Raw entries in native (newest-first) order
    async fn range_all(&self) -> StoreResult<Vec<Value>> {
        match self.command(json!(["LRANGE", SUBMISSIONS_KEY, 0, -1])).await? {
            Value::Array(items) => Ok(items),
            Value::Null => Ok(Vec::new()),
            other => Err(StoreError::Remote {
                status: 200,
                message: format!("LRANGE returned a non-list result: {}", other),
            }),
        }
    }
}

fn unwrap_envelope(envelope: CommandResponse) -> StoreResult<Value> {
    match envelope.error {
        Some(message) => Err(StoreError::Remote {
            status: 200,
            message,
        }),
        None => Ok(envelope.result.unwrap_or(Value::Null)),
    }
}

/// Re-encode an entry as the string form the list stores
fn as_stored_string(entry: Value) -> Value {
    match entry {
        Value::String(_) => entry,
        other => Value::String(other.to_string()),
    }
}

#[async_trait]
impl SubmissionStore for RemoteListStore {
    fn backend_name(&self) -> &'static str {
        "remote"
    }

    async fn append(&self, mut submission: Submission) -> StoreResult<String> {
        submission.ensure_identity();
        let encoded = serde_json::to_string(&submission)?;

        let length = self.command(json!(["LPUSH", SUBMISSIONS_KEY, encoded])).await?;
        debug!(id = %submission.id, length = %length, "Pushed submission to remote list");
        Ok(submission.id)
    }

    async fn list(&self) -> StoreResult<Vec<Submission>> {
        let mut entries = self.range_all().await?;
        entries.reverse();
        Ok(decode_entries(entries))
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let _guard = self.rewrite_lock.lock().await;

        let entries = self.range_all().await?;
        let before = entries.len();
        let survivors: Vec<Value> = entries
            .into_iter()
            .enumerate()
            .filter(|(index, entry)| {
                // Undecodable entries are kept; only an exact id match is removed
                decode_entry(*index, entry.clone())
                    .map(|s| s.id != id)
                    .unwrap_or(true)
            })
            .map(|(_, entry)| as_stored_string(entry))
            .collect();

        let remaining = survivors.len();
        if remaining == before {
            return Ok(false);
        }

        let mut commands = vec![json!(["DEL", SUBMISSIONS_KEY])];
        if !survivors.is_empty() {
            let mut rpush = vec![json!("RPUSH"), json!(SUBMISSIONS_KEY)];
            rpush.extend(survivors);
            commands.push(Value::Array(rpush));
        }
        self.transaction(commands).await?;

        info!(id = %id, removed = before - remaining, remaining, "Rewrote remote list without submission");
        Ok(true)
    }
}
