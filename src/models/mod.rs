pub mod document;

pub use document::{
    Alternative, ItemType, RawTranscript, RecognitionItem, SegmentItem, SpeakerLabels,
    SpeakerSegment, TranscriptDocument, TranscriptResults,
};
