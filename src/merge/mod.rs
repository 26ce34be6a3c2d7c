use crate::error::PipelineError;
use crate::models::{ItemType, RecognitionItem, SpeakerSegment, TranscriptDocument};

/// One speaker-attributed block of transcript text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerBlock {
    pub speaker_label: String,
    pub text: String,
}

/// Explicit cursor over the chronological item sequence.
///
/// A single cursor is shared across all segments: items are partitioned
/// between segments, never re-scanned per segment.
#[derive(Debug)]
pub struct ItemCursor<'a> {
    items: &'a [RecognitionItem],
    position: usize,
}

impl<'a> ItemCursor<'a> {
    pub fn new(items: &'a [RecognitionItem]) -> Self {
        Self { items, position: 0 }
    }

    /// The item the cursor currently points at, without consuming it.
    pub fn peek(&self) -> Option<&'a RecognitionItem> {
        self.items.get(self.position)
    }

    pub fn advance(&mut self) {
        self.position += 1;
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.items.len()
    }
}

/// Reconcile the segment-level speaker timeline with the word-level
/// recognition timeline into speaker-labeled blocks.
///
/// A pronunciation item belongs to the current segment while its end time is
/// within the segment span; the first pronunciation past the boundary is
/// deferred to the next segment without advancing the cursor. Punctuation
/// attaches to whichever segment the cursor is in and never terminates it.
/// Items left over after the final segment's span are appended to the final
/// segment rather than dropped.
pub fn merge_speaker_segments(
    segments: &[SpeakerSegment],
    items: &[RecognitionItem],
) -> Result<Vec<SpeakerBlock>, PipelineError> {
    let mut cursor = ItemCursor::new(items);
    let mut blocks = Vec::with_capacity(segments.len());

    for (index, segment) in segments.iter().enumerate() {
        let is_last = index + 1 == segments.len();
        let mut words: Vec<String> = Vec::new();

        while let Some(item) = cursor.peek() {
            match item.item_type {
                ItemType::Pronunciation => {
                    let end_time = item.end_time.ok_or_else(|| {
                        PipelineError::MalformedTranscript(
                            "pronunciation item missing end_time".to_string(),
                        )
                    })?;
                    if end_time > segment.end_time && !is_last {
                        break;
                    }
                    words.push(item_content(item)?.to_string());
                }
                ItemType::Punctuation => match words.last_mut() {
                    Some(last) => last.push_str(item_content(item)?),
                    None => words.push(item_content(item)?.to_string()),
                },
            }
            cursor.advance();
        }

        blocks.push(SpeakerBlock {
            speaker_label: segment.speaker_label.clone(),
            text: words.join(" "),
        });
    }

    Ok(blocks)
}

/// Render the blocks as the final text stream, one `label: text` line each.
pub fn render_transcript(blocks: &[SpeakerBlock]) -> String {
    let mut output = String::new();
    for block in blocks {
        output.push_str(&block.speaker_label);
        output.push_str(": ");
        output.push_str(&block.text);
        output.push('\n');
    }
    output
}

/// Produce the speaker-attributed transcript from a fetched result document.
pub fn speaker_transcript(document: &TranscriptDocument) -> Result<String, PipelineError> {
    let labels = document.results.speaker_labels.as_ref().ok_or_else(|| {
        PipelineError::MalformedTranscript(
            "speaker labels were requested but are missing from the result document".to_string(),
        )
    })?;

    let blocks = merge_speaker_segments(&labels.segments, &document.results.items)?;
    Ok(render_transcript(&blocks))
}

fn item_content(item: &RecognitionItem) -> Result<&str, PipelineError> {
    item.content().ok_or_else(|| {
        PipelineError::MalformedTranscript("recognition item has no alternatives".to_string())
    })
}
