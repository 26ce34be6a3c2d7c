use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, info};

use crate::error::PipelineError;

/// Container format the transcription service is given.
pub const CANONICAL_EXTENSION: &str = "wav";

/// Derive the conversion target: same directory and stem, wav extension.
pub fn canonical_path(input: &Path) -> PathBuf {
    input.with_extension(CANONICAL_EXTENSION)
}

/// Whether the input already carries the canonical extension.
pub fn is_canonical(input: &Path) -> bool {
    input
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(CANONICAL_EXTENSION))
}

/// Ensure the input audio is available as a wav file.
///
/// Pass-through when the input is already wav: the returned path equals the
/// input path and no conversion runs. Otherwise ffmpeg writes a sibling file
/// with the same stem. Conversion failure is fatal.
pub async fn normalize_to_wav(input: &Path) -> Result<PathBuf, PipelineError> {
    if is_canonical(input) {
        info!("Input file is already wav format, proceeding directly to transcription");
        return Ok(input.to_path_buf());
    }

    let output = canonical_path(input);
    info!(
        "Converting {} to wav format",
        input.display()
    );
    debug!("Conversion target: {}", output.display());

    let status = Command::new("ffmpeg")
        .arg("-y")
        .arg("-loglevel")
        .arg("error")
        .arg("-i")
        .arg(input)
        .arg(&output)
        .status()
        .await
        .map_err(|e| PipelineError::Conversion {
            path: input.to_path_buf(),
            reason: format!("failed to run ffmpeg: {e}"),
        })?;

    if !status.success() {
        return Err(PipelineError::Conversion {
            path: input.to_path_buf(),
            reason: format!("ffmpeg exited with {status}"),
        });
    }

    Ok(output)
}
