pub mod audio;
pub mod config;
pub mod error;
pub mod merge;
pub mod models;
pub mod remote;

pub use audio::normalize_to_wav;
pub use config::{PipelineConfig, RemoteConfig};
pub use error::PipelineError;
pub use merge::{merge_speaker_segments, render_transcript, speaker_transcript, SpeakerBlock};
pub use models::{RecognitionItem, SpeakerSegment, TranscriptDocument};
pub use remote::{
    ensure_uploaded, fetch_transcript, job_name_for, object_key, submit_and_wait,
    HttpObjectStore, HttpTranscribeClient, JobRequest, JobSettings, JobStatus, ObjectStore,
    TranscribeService,
};
