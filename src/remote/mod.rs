pub mod fetch;
pub mod storage;
pub mod transcribe;

pub use fetch::{fetch_transcript, parse_document};
pub use storage::{ensure_uploaded, object_key, HttpObjectStore, ObjectStore};
pub use transcribe::{
    job_name_for, submit_and_wait, HttpTranscribeClient, JobRequest, JobSettings, JobState,
    JobStatus, TranscribeService,
};
