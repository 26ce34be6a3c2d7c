use std::path::PathBuf;

use thiserror::Error;

/// Failure taxonomy for the transcription pipeline.
///
/// Every stage fails fast and aborts the run: none of these are recoverable
/// locally because each stage depends on the previous stage's output.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Audio normalization failed. Fatal: submitting an unconverted file
    /// would fail remotely with a far less useful diagnostic.
    #[error("audio conversion failed for {path:?}: {reason}")]
    Conversion { path: PathBuf, reason: String },

    /// Object storage existence check or write failed.
    #[error("upload to object storage failed for key {key}: {reason}")]
    Upload { key: String, reason: String },

    /// The transcription service rejected the job submission.
    #[error("transcription job submission failed: {0}")]
    JobSubmission(String),

    /// A status poll could not be completed.
    #[error("status poll for transcription job {name} failed: {reason}")]
    JobPoll { name: String, reason: String },

    /// The transcription service reported a terminal FAILED status.
    #[error("transcription job {name} failed: {reason}")]
    JobFailed { name: String, reason: String },

    /// The job did not reach a terminal status before the poll deadline.
    #[error("transcription job {name} did not complete within {timeout_secs}s")]
    JobTimeout { name: String, timeout_secs: u64 },

    /// The result document could not be retrieved or read as JSON.
    #[error("failed to fetch transcript document: {0}")]
    Fetch(String),

    /// The result document parsed but is missing fields the merge needs.
    #[error("transcript document is malformed: {0}")]
    MalformedTranscript(String),
}
