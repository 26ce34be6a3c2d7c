use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use diarist::{
    ensure_uploaded, fetch_transcript, job_name_for, normalize_to_wav, object_key,
    speaker_transcript, submit_and_wait, HttpObjectStore, HttpTranscribeClient, JobRequest,
    JobSettings, PipelineConfig, RemoteConfig,
};

#[derive(Parser)]
#[command(name = "diarist")]
#[command(author, version, about = "Speaker-attributed transcription via a remote speech-to-text service", long_about = None)]
struct Cli {
    /// Audio input file
    input: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Service region
    #[arg(long, default_value = "ap-southeast-2")]
    region: String,

    /// Storage bucket the audio is uploaded to
    #[arg(long, default_value = "transcribe-demos")]
    bucket: String,

    /// Key prefix inside the bucket
    #[arg(long, default_value = "transcribe")]
    key_prefix: String,

    /// Language code for recognition
    #[arg(long, default_value = "en-AU")]
    language: String,

    /// Maximum number of speakers (below 2 disables speaker labels)
    #[arg(long, default_value = "2")]
    max_speakers: u32,

    /// Custom vocabulary name
    #[arg(long)]
    vocabulary: Option<String>,

    /// Seconds between job status polls
    #[arg(long, default_value = "5")]
    poll_interval: u64,

    /// Give up on the job after this many seconds
    #[arg(long, default_value = "3600")]
    poll_timeout: u64,

    /// File the raw result document is written to
    #[arg(long, default_value = "transcript-raw.json")]
    raw_output: PathBuf,
}

impl Cli {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            region: self.region.clone(),
            bucket: self.bucket.clone(),
            key_prefix: self.key_prefix.clone(),
            language_code: self.language.clone(),
            max_speakers: self.max_speakers,
            vocabulary_name: self.vocabulary.clone(),
            poll_interval: Duration::from_secs(self.poll_interval),
            poll_timeout: Duration::from_secs(self.poll_timeout),
            raw_output_file: self.raw_output.clone(),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = cli.pipeline_config();
    let remote = RemoteConfig::from_env(&config.region)?;

    run_pipeline(&cli.input, &config, &remote).await
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn run_pipeline(input: &PathBuf, config: &PipelineConfig, remote: &RemoteConfig) -> Result<()> {
    info!("File to scan: {}", input.display());

    // Normalize the input audio to wav
    let wav_path = normalize_to_wav(input)
        .await
        .context("audio normalization stage failed")?;
    debug!("Normalized audio: {}", wav_path.display());

    // Ensure the asset exists in object storage
    let store = HttpObjectStore::new(remote, &config.bucket);
    let key = object_key(&config.key_prefix, &wav_path);
    ensure_uploaded(&store, &wav_path, &key)
        .await
        .context("asset upload stage failed")?;

    // Submit the transcription job and wait for a terminal status
    let job_name = job_name_for(&wav_path, Local::now());
    let request = JobRequest {
        job_name,
        media_uri: store.object_url(&key),
        media_format: config.media_format.clone(),
        language_code: config.language_code.clone(),
        settings: JobSettings::from_config(config),
    };
    debug!("Transcription job name: {}", request.job_name);
    debug!("Media URI: {}", request.media_uri);
    debug!("Settings: {:?}", request.settings);

    let service = HttpTranscribeClient::new(remote);
    let state = submit_and_wait(&service, &request, config.poll_interval, config.poll_timeout)
        .await
        .context("transcription job stage failed")?;

    // Fetch the result document from the signed location
    let transcript_uri = state
        .transcript_uri
        .context("completed job returned no transcript URI")?;
    let http = reqwest::Client::new();
    let document = fetch_transcript(&http, &transcript_uri, &config.raw_output_file)
        .await
        .context("transcript fetch stage failed")?;

    let raw = document
        .results
        .transcripts
        .first()
        .map(|t| t.transcript.as_str())
        .unwrap_or_default();

    println!("***************************");
    println!("*    Raw Transcription    *");
    println!("***************************");
    println!("{raw}");
    println!();

    // Merge the speaker timeline with the recognition timeline
    if config.speaker_labels_enabled() {
        let attributed = speaker_transcript(&document)
            .context("speaker attribution stage failed")?;
        print!("{attributed}");
    } else {
        info!("Speaker labeling disabled (max_speakers < 2), raw transcript only");
    }

    Ok(())
}
