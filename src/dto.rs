use serde::{Deserialize, Serialize};

use crate::engine::{Segment, Transcript};

pub const SERVICE_NAME: &str = "whisper-transcription";

#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptionDto {
    pub success: bool,
    pub text: String,
    pub language: String,
    pub segments: Vec<TranscriptionSegment>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TranscriptionSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
    pub service: String,
    pub model: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
}

impl From<Segment> for TranscriptionSegment {
    fn from(seg: Segment) -> Self {
        Self {
            start: seg.start,
            end: seg.end,
            text: seg.text,
        }
    }
}

impl From<Transcript> for TranscriptionDto {
    fn from(transcript: Transcript) -> Self {
        Self {
            success: true,
            text: transcript.text,
            language: transcript.language,
            segments: transcript.segments.into_iter().map(Into::into).collect(),
        }
    }
}

impl HealthDto {
    pub fn healthy(model: &str) -> Self {
        Self {
            status: "healthy".to_string(),
            service: SERVICE_NAME.to_string(),
            model: model.to_string(),
        }
    }
}
