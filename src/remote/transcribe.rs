use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::{PipelineConfig, RemoteConfig};
use crate::error::PipelineError;

/// Job states reported by the transcription service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Queued,
    InProgress,
    Completed,
    Failed,
}

impl JobStatus {
    /// Whether no further transitions can occur from this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Parameters for a transcription job submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    pub job_name: String,
    pub media_uri: String,
    pub media_format: String,
    pub language_code: String,
    pub settings: JobSettings,
}

/// Recognition options bundle.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSettings {
    pub enable_speaker_labels: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_speakers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary_name: Option<String>,
}

impl JobSettings {
    /// Build the options bundle the way the service expects: speaker labels
    /// and the speaker cap only when diarization is on, vocabulary only when
    /// one is configured.
    pub fn from_config(config: &PipelineConfig) -> Self {
        let mut settings = JobSettings {
            vocabulary_name: config.vocabulary_name.clone(),
            ..Default::default()
        };
        if config.speaker_labels_enabled() {
            settings.enable_speaker_labels = true;
            settings.max_speakers = Some(config.max_speakers);
        }
        settings
    }
}

/// Snapshot of a job as reported by the service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobState {
    pub job_name: String,
    pub status: JobStatus,
    /// Time-limited fetch location for the result document, present once
    /// the job completes.
    #[serde(default)]
    pub transcript_uri: Option<String>,
    #[serde(default)]
    pub failure_reason: Option<String>,
}

/// Contract for the transcription-service collaborator.
#[async_trait]
pub trait TranscribeService {
    async fn start_job(&self, request: &JobRequest) -> Result<(), PipelineError>;

    async fn get_job(&self, job_name: &str) -> Result<JobState, PipelineError>;
}

/// HTTP client for the transcription service.
pub struct HttpTranscribeClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpTranscribeClient {
    pub fn new(remote: &RemoteConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: remote.transcribe_endpoint.trim_end_matches('/').to_string(),
            api_key: remote.api_key.clone(),
        }
    }
}

#[async_trait]
impl TranscribeService for HttpTranscribeClient {
    async fn start_job(&self, request: &JobRequest) -> Result<(), PipelineError> {
        let response = self
            .client
            .post(format!("{}/jobs", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| PipelineError::JobSubmission(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::JobSubmission(format!(
                "service returned {status}: {body}"
            )));
        }
        Ok(())
    }

    async fn get_job(&self, job_name: &str) -> Result<JobState, PipelineError> {
        let response = self
            .client
            .get(format!("{}/jobs/{job_name}", self.endpoint))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| PipelineError::JobPoll {
                name: job_name.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(PipelineError::JobPoll {
                name: job_name.to_string(),
                reason: format!("service returned {}", response.status()),
            });
        }

        response.json().await.map_err(|e| PipelineError::JobPoll {
            name: job_name.to_string(),
            reason: format!("could not parse job state: {e}"),
        })
    }
}

/// Unique job name for this invocation: input stem, a second-resolution
/// timestamp, and a short random suffix so repeated runs on the same file
/// within one second still get distinct names.
pub fn job_name_for(input: &Path, now: DateTime<Local>) -> String {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("audio");
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "transcribe_{}_{}_{}",
        stem,
        now.format("%Y%m%d_%H%M%S"),
        &suffix[..8]
    )
}

/// Submit the job, then poll on a fixed interval until a terminal status.
///
/// FAILED is fatal. The wait is bounded: a job that is still running at the
/// deadline becomes a `JobTimeout` error instead of polling forever.
pub async fn submit_and_wait<S: TranscribeService>(
    service: &S,
    request: &JobRequest,
    poll_interval: Duration,
    poll_timeout: Duration,
) -> Result<JobState, PipelineError> {
    service.start_job(request).await?;
    info!("Started transcription job {}", request.job_name);

    let deadline = Instant::now() + poll_timeout;
    loop {
        let state = service.get_job(&request.job_name).await?;
        debug!("Job {} status: {:?}", request.job_name, state.status);

        if state.status.is_terminal() {
            if state.status == JobStatus::Failed {
                return Err(PipelineError::JobFailed {
                    name: request.job_name.clone(),
                    reason: state
                        .failure_reason
                        .unwrap_or_else(|| "no failure reason reported".to_string()),
                });
            }
            return Ok(state);
        }

        if Instant::now() >= deadline {
            return Err(PipelineError::JobTimeout {
                name: request.job_name.clone(),
                timeout_secs: poll_timeout.as_secs(),
            });
        }
        tokio::time::sleep(poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use chrono::TimeZone;

    use super::*;

    struct ScriptedService {
        statuses: Mutex<VecDeque<JobStatus>>,
        polls: Mutex<u32>,
    }

    impl ScriptedService {
        fn new(statuses: Vec<JobStatus>) -> Self {
            Self {
                statuses: Mutex::new(statuses.into()),
                polls: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl TranscribeService for ScriptedService {
        async fn start_job(&self, _request: &JobRequest) -> Result<(), PipelineError> {
            Ok(())
        }

        async fn get_job(&self, job_name: &str) -> Result<JobState, PipelineError> {
            *self.polls.lock().unwrap() += 1;
            let status = self
                .statuses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(JobStatus::InProgress);
            Ok(JobState {
                job_name: job_name.to_string(),
                status,
                transcript_uri: (status == JobStatus::Completed)
                    .then(|| "https://example.com/result.json".to_string()),
                failure_reason: (status == JobStatus::Failed)
                    .then(|| "bad media".to_string()),
            })
        }
    }

    fn request() -> JobRequest {
        JobRequest {
            job_name: "transcribe_demo_20250101_120000_ab12cd34".to_string(),
            media_uri: "https://s3/bucket/transcribe/demo.wav".to_string(),
            media_format: "wav".to_string(),
            language_code: "en-AU".to_string(),
            settings: JobSettings::default(),
        }
    }

    #[tokio::test]
    async fn test_polls_until_completed() {
        let service = ScriptedService::new(vec![
            JobStatus::Queued,
            JobStatus::InProgress,
            JobStatus::Completed,
        ]);

        let state = submit_and_wait(
            &service,
            &request(),
            Duration::from_millis(1),
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        assert_eq!(state.status, JobStatus::Completed);
        assert!(state.transcript_uri.is_some());
        assert_eq!(*service.polls.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_failed_job_is_fatal() {
        let service = ScriptedService::new(vec![JobStatus::Failed]);

        let err = submit_and_wait(
            &service,
            &request(),
            Duration::from_millis(1),
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();

        match err {
            PipelineError::JobFailed { reason, .. } => assert_eq!(reason, "bad media"),
            other => panic!("expected JobFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_poll_deadline_enforced() {
        // Service never reaches a terminal status; a zero timeout must trip
        // after the first poll instead of looping forever.
        let service = ScriptedService::new(vec![]);

        let err = submit_and_wait(
            &service,
            &request(),
            Duration::from_millis(1),
            Duration::ZERO,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, PipelineError::JobTimeout { .. }));
        assert_eq!(*service.polls.lock().unwrap(), 1);
    }

    #[test]
    fn test_job_names_are_unique_within_one_second() {
        let now = Local.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let path = Path::new("content/interview.wav");

        let a = job_name_for(path, now);
        let b = job_name_for(path, now);

        assert!(a.starts_with("transcribe_interview_20250101_120000_"));
        assert!(b.starts_with("transcribe_interview_20250101_120000_"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_settings_omit_unset_options() {
        let config = PipelineConfig {
            max_speakers: 1,
            ..Default::default()
        };
        let value = serde_json::to_value(JobSettings::from_config(&config)).unwrap();

        assert_eq!(value["enableSpeakerLabels"], false);
        assert!(value.get("maxSpeakers").is_none());
        assert!(value.get("vocabularyName").is_none());
    }

    #[test]
    fn test_settings_carry_speaker_cap_and_vocabulary() {
        let config = PipelineConfig {
            max_speakers: 4,
            vocabulary_name: Some("medical-terms".to_string()),
            ..Default::default()
        };
        let settings = JobSettings::from_config(&config);

        assert!(settings.enable_speaker_labels);
        assert_eq!(settings.max_speakers, Some(4));
        assert_eq!(settings.vocabulary_name.as_deref(), Some("medical-terms"));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::InProgress.is_terminal());
    }

    #[test]
    fn test_job_state_parsing() {
        let json = r#"{
            "jobName": "transcribe_demo_20250101_120000_ab12cd34",
            "status": "COMPLETED",
            "transcriptUri": "https://example.com/signed/result.json"
        }"#;

        let state: JobState = serde_json::from_str(json).unwrap();
        assert_eq!(state.status, JobStatus::Completed);
        assert_eq!(
            state.transcript_uri.as_deref(),
            Some("https://example.com/signed/result.json")
        );
        assert!(state.failure_reason.is_none());
    }
}
