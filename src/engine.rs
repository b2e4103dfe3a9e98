use std::path::Path;

use anyhow::Result;

/// Times are in seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transcript {
    pub text: String,
    pub language: String,
    pub segments: Vec<Segment>,
}

/// `language` is `None` when the engine should detect the spoken language.
pub trait SpeechEngine: Send + Sync {
    fn transcribe(&self, path: &Path, language: Option<&str>) -> Result<Transcript>;
}
