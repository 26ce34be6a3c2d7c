use std::path::Path;

use tracing::{debug, info};

use crate::error::PipelineError;
use crate::models::TranscriptDocument;

/// Retrieve the result document from the signed URI returned by the job.
///
/// The raw bytes are written to `raw_output` (overwritten each run) before
/// parsing, so a document the parser rejects can still be inspected.
pub async fn fetch_transcript(
    client: &reqwest::Client,
    uri: &str,
    raw_output: &Path,
) -> Result<TranscriptDocument, PipelineError> {
    info!("Retrieving transcription output");
    debug!("Result document URI: {uri}");

    let response = client
        .get(uri)
        .send()
        .await
        .map_err(|e| PipelineError::Fetch(e.to_string()))?;

    if !response.status().is_success() {
        return Err(PipelineError::Fetch(format!(
            "transcript fetch returned {}",
            response.status()
        )));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| PipelineError::Fetch(e.to_string()))?;

    tokio::fs::write(raw_output, &body)
        .await
        .map_err(|e| PipelineError::Fetch(format!(
            "failed to write {}: {e}",
            raw_output.display()
        )))?;
    debug!("Raw result document written to {}", raw_output.display());

    parse_document(&body)
}

/// Parse raw bytes as a transcript result document. A document that does
/// not match the expected shape is a fetch failure, not a merge failure.
pub fn parse_document(bytes: &[u8]) -> Result<TranscriptDocument, PipelineError> {
    serde_json::from_slice(bytes)
        .map_err(|e| PipelineError::Fetch(format!("could not parse result document: {e}")))
}
