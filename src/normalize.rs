use zhconv::{Variant, zhconv};

use crate::engine::{Segment, Transcript};

/// Rewrites traditional Chinese characters into their simplified (zh-CN) forms.
/// Text in other scripts passes through unchanged.
pub fn to_simplified(text: &str) -> String {
    zhconv(text, Variant::ZhCN)
}

/// Simplifies the full text and every segment text independently.
/// Timestamps, segment order and segment count are left as they are.
pub fn simplify_transcript(transcript: Transcript) -> Transcript {
    let segments = transcript
        .segments
        .into_iter()
        .map(|seg| Segment {
            text: to_simplified(&seg.text),
            ..seg
        })
        .collect();

    Transcript {
        text: to_simplified(&transcript.text),
        language: transcript.language,
        segments,
    }
}
