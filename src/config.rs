use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Pipeline configuration.
///
/// The original deployment of this tool hard-coded all of these; they are
/// explicit inputs here so each component receives what it needs instead of
/// reading process-wide state.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Service region, used to derive default endpoints.
    pub region: String,
    /// Storage bucket the normalized audio is uploaded to.
    pub bucket: String,
    /// Key prefix inside the bucket.
    pub key_prefix: String,
    /// Language code passed to the recognizer.
    pub language_code: String,
    /// Container format declared on the job (always wav after normalization).
    pub media_format: String,
    /// Maximum number of speakers. Values below 2 disable speaker labeling
    /// and the pipeline stops after printing the raw transcript.
    pub max_speakers: u32,
    /// Custom vocabulary name, omitted from the job when unset.
    pub vocabulary_name: Option<String>,
    /// Fixed delay between job status polls.
    pub poll_interval: Duration,
    /// Deadline for the job to reach a terminal status.
    pub poll_timeout: Duration,
    /// Local file the raw result document is written to, overwritten each run.
    pub raw_output_file: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            region: "ap-southeast-2".to_string(),
            bucket: "transcribe-demos".to_string(),
            key_prefix: "transcribe".to_string(),
            language_code: "en-AU".to_string(),
            media_format: "wav".to_string(),
            max_speakers: 2,
            vocabulary_name: None,
            poll_interval: Duration::from_secs(5),
            poll_timeout: Duration::from_secs(3600),
            raw_output_file: PathBuf::from("transcript-raw.json"),
        }
    }
}

impl PipelineConfig {
    /// Whether the job should ask for speaker diarization at all.
    pub fn speaker_labels_enabled(&self) -> bool {
        self.max_speakers >= 2
    }
}

/// Endpoints and credentials for the remote collaborators.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the object-storage service.
    pub storage_endpoint: String,
    /// Base URL of the transcription service.
    pub transcribe_endpoint: String,
    /// API key sent as a bearer token (from DIARIST_API_KEY env var).
    pub api_key: String,
}

impl RemoteConfig {
    /// Create config from environment variables, deriving regional endpoint
    /// defaults where the variables are unset.
    pub fn from_env(region: &str) -> Result<Self> {
        let api_key = std::env::var("DIARIST_API_KEY")
            .context("DIARIST_API_KEY environment variable not set")?;

        let storage_endpoint = std::env::var("DIARIST_STORAGE_ENDPOINT")
            .unwrap_or_else(|_| default_storage_endpoint(region));
        let transcribe_endpoint = std::env::var("DIARIST_TRANSCRIBE_ENDPOINT")
            .unwrap_or_else(|_| default_transcribe_endpoint(region));

        Ok(Self {
            storage_endpoint,
            transcribe_endpoint,
            api_key,
        })
    }

    /// Create with explicit endpoints.
    pub fn new(storage_endpoint: String, transcribe_endpoint: String, api_key: String) -> Self {
        Self {
            storage_endpoint,
            transcribe_endpoint,
            api_key,
        }
    }
}

fn default_storage_endpoint(region: &str) -> String {
    format!("https://s3-{region}.amazonaws.com")
}

fn default_transcribe_endpoint(region: &str) -> String {
    format!("https://transcribe.{region}.amazonaws.com")
}
