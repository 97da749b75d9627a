// Adapters layer: concrete implementations for external systems (transcript files).

pub mod transcript_reader;

pub use transcript_reader::{CsvTranscriptReader, SpreadsheetTranscriptReader, TranscriptFile};
