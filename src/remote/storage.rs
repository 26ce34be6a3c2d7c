use std::path::Path;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, info};

use crate::config::RemoteConfig;
use crate::error::PipelineError;

/// Contract for the object-storage collaborator.
#[async_trait]
pub trait ObjectStore {
    /// Whether an object already exists at `key`.
    async fn exists(&self, key: &str) -> Result<bool, PipelineError>;

    /// Write `body` to `key`.
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), PipelineError>;
}

/// HTTP client for an S3-compatible object store.
pub struct HttpObjectStore {
    client: reqwest::Client,
    endpoint: String,
    bucket: String,
    api_key: String,
}

impl HttpObjectStore {
    pub fn new(remote: &RemoteConfig, bucket: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: remote.storage_endpoint.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
            api_key: remote.api_key.clone(),
        }
    }

    /// Public URL of the object at `key`; also handed to the transcription
    /// job as the media URI.
    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, self.bucket, key)
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn exists(&self, key: &str) -> Result<bool, PipelineError> {
        let response = self
            .client
            .head(self.object_url(key))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| PipelineError::Upload {
                key: key.to_string(),
                reason: format!("existence check failed: {e}"),
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(PipelineError::Upload {
                key: key.to_string(),
                reason: format!("existence check returned {status}"),
            }),
        }
    }

    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), PipelineError> {
        let response = self
            .client
            .put(self.object_url(key))
            .bearer_auth(&self.api_key)
            .body(body)
            .send()
            .await
            .map_err(|e| PipelineError::Upload {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(PipelineError::Upload {
                key: key.to_string(),
                reason: format!("upload returned {}", response.status()),
            });
        }
        Ok(())
    }
}

/// Remote key for a local file: prefix plus the file name.
pub fn object_key(prefix: &str, path: &Path) -> String {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("audio.wav");
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix.trim_end_matches('/'), name)
    }
}

/// Ensure the local file exists in storage at `key`, uploading only if
/// absent. Returns whether an upload was performed.
///
/// The existence check and the upload are not atomic with respect to
/// concurrent callers; the pipeline is a single one-shot invocation, so a
/// lost race is not a concern here.
pub async fn ensure_uploaded<S: ObjectStore>(
    store: &S,
    path: &Path,
    key: &str,
) -> Result<bool, PipelineError> {
    if store.exists(key).await? {
        info!("Source file already exists at {key}, delete it first to replace it");
        return Ok(false);
    }

    debug!("Reading {} for upload", path.display());
    let body = tokio::fs::read(path)
        .await
        .map_err(|e| PipelineError::Upload {
            key: key.to_string(),
            reason: format!("failed to read {}: {e}", path.display()),
        })?;

    info!("Uploading {} to {key}", path.display());
    store.put(key, body).await?;
    Ok(true)
}
