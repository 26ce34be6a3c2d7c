use serde::{Deserialize, Deserializer};

/// Root of the result document fetched from the signed transcript URI.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptDocument {
    pub results: TranscriptResults,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptResults {
    pub transcripts: Vec<RawTranscript>,
    pub items: Vec<RecognitionItem>,
    /// Only present when speaker labeling was requested at submission.
    #[serde(default)]
    pub speaker_labels: Option<SpeakerLabels>,
}

/// The flat, non-diarized transcript text.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTranscript {
    pub transcript: String,
}

/// One recognized token: a word with timing, or a punctuation mark without.
#[derive(Debug, Clone, Deserialize)]
pub struct RecognitionItem {
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Start timestamp in seconds, present for pronunciation items only.
    #[serde(default, deserialize_with = "de_opt_seconds")]
    pub start_time: Option<f64>,
    /// End timestamp in seconds, present for pronunciation items only.
    #[serde(default, deserialize_with = "de_opt_seconds")]
    pub end_time: Option<f64>,
    /// Candidate readings, best first.
    pub alternatives: Vec<Alternative>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Pronunciation,
    Punctuation,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Alternative {
    pub content: String,
    #[serde(default)]
    pub confidence: Option<String>,
}

impl RecognitionItem {
    /// Text of the best alternative, if the recognizer produced any.
    pub fn content(&self) -> Option<&str> {
        self.alternatives.first().map(|a| a.content.as_str())
    }

    pub fn is_pronunciation(&self) -> bool {
        self.item_type == ItemType::Pronunciation
    }
}

/// Speaker diarization results: the segment timeline.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeakerLabels {
    #[serde(default)]
    pub speakers: Option<u32>,
    pub segments: Vec<SpeakerSegment>,
}

/// A time interval attributed to one speaker.
///
/// Segments are chronological and non-overlapping by construction; the
/// service guarantees this and it is not re-verified here.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeakerSegment {
    pub speaker_label: String,
    #[serde(deserialize_with = "de_seconds")]
    pub start_time: f64,
    #[serde(deserialize_with = "de_seconds")]
    pub end_time: f64,
    /// Per-item attributions within the segment. Carried in the document
    /// but not needed by the merge beyond the segment boundaries.
    #[serde(default)]
    pub items: Vec<SegmentItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SegmentItem {
    pub speaker_label: String,
    #[serde(deserialize_with = "de_seconds")]
    pub start_time: f64,
    #[serde(deserialize_with = "de_seconds")]
    pub end_time: f64,
}

/// Timestamps arrive as decimal strings ("12.34"); some services emit
/// plain numbers instead, so both are accepted.
fn de_seconds<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawSeconds::deserialize(deserializer)? {
        RawSeconds::Number(v) => Ok(v),
        RawSeconds::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

fn de_opt_seconds<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawSeconds>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawSeconds::Number(v)) => Ok(Some(v)),
        Some(RawSeconds::Text(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSeconds {
    Number(f64),
    Text(String),
}
