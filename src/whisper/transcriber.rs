use std::path::Path;

use anyhow::{Result, anyhow};
use log::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters, WhisperState};

use crate::audio::decode_to_mono_16k;
use crate::engine::{Segment, SpeechEngine, Transcript};
use crate::whisper::config::WhisperConfig;
use crate::whisper::resampler::WHISPER_SAMPLE_RATE;

/// whisper.cpp refuses input shorter than one second.
const MIN_SAMPLES: usize = WHISPER_SAMPLE_RATE as usize + WHISPER_SAMPLE_RATE as usize / 10;

/// Language value that makes whisper.cpp run its own detection.
const DETECT_LANGUAGE: &str = "auto";

/// Whisper model loaded once and shared by all requests. Each call gets its
/// own `WhisperState`, so the context itself is never mutated.
pub struct WhisperTranscriber {
    ctx: WhisperContext,
    config: WhisperConfig,
}

impl WhisperTranscriber {
    pub fn new(config: WhisperConfig) -> Result<Self> {
        whisper_rs::install_logging_hooks();

        let model_path = config
            .model_path
            .to_str()
            .ok_or_else(|| anyhow!("Model path is not valid UTF-8: {:?}", config.model_path))?;

        let mut ctx_params = WhisperContextParameters::default();
        ctx_params.use_gpu(config.use_gpu);

        info!("Loading whisper model '{}' from {}", config.model, model_path);
        let ctx = WhisperContext::new_with_params(model_path, ctx_params)
            .map_err(|e| anyhow!("Failed to load model {}: {}", model_path, e))?;

        Ok(Self { ctx, config })
    }

    fn params<'a>(&self, language: &'a str) -> FullParams<'a, 'a> {
        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some(language));
        params.set_translate(false);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_no_speech_thold(self.config.no_speech_threshold);
        params.set_n_threads(self.config.num_threads);
        params
    }

    fn collect_segments(state: &WhisperState) -> Result<(String, Vec<Segment>)> {
        let num_segments = state
            .full_n_segments()
            .map_err(|e| anyhow!("Failed to get segment count: {}", e))?;

        let mut combined = String::new();
        let mut segments = Vec::with_capacity(num_segments.max(0) as usize);

        for i in 0..num_segments {
            let text = state
                .full_get_segment_text_lossy(i)
                .map_err(|e| anyhow!("Failed to get segment text: {}", e))?;
            let start = state
                .full_get_segment_t0(i)
                .map_err(|e| anyhow!("Failed to get segment start: {}", e))?;
            let end = state
                .full_get_segment_t1(i)
                .map_err(|e| anyhow!("Failed to get segment end: {}", e))?;

            combined.push_str(&text);
            segments.push(Segment {
                start: centis_to_secs(start),
                end: centis_to_secs(end),
                text,
            });
        }

        Ok((combined, segments))
    }
}

impl SpeechEngine for WhisperTranscriber {
    fn transcribe(&self, path: &Path, language: Option<&str>) -> Result<Transcript> {
        let mut audio = decode_to_mono_16k(path)?;
        pad_with_silence(&mut audio);

        debug!(
            "Running whisper on {} samples, language={}",
            audio.len(),
            language.unwrap_or(DETECT_LANGUAGE)
        );

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| anyhow!("Failed to create whisper state: {}", e))?;

        state
            .full(self.params(language.unwrap_or(DETECT_LANGUAGE)), &audio)
            .map_err(|e| anyhow!("Failed to run transcription: {}", e))?;

        let (text, segments) = Self::collect_segments(&state)?;

        let detected = state
            .full_lang_id_from_state()
            .ok()
            .and_then(whisper_rs::get_lang_str)
            .map(str::to_string);
        let language = detected
            .or_else(|| language.map(str::to_string))
            .unwrap_or_default();

        Ok(Transcript {
            text,
            language,
            segments,
        })
    }
}

fn centis_to_secs(t: i64) -> f64 {
    t as f64 / 100.0
}

fn pad_with_silence(audio: &mut Vec<f32>) {
    if audio.len() < MIN_SAMPLES {
        audio.resize(MIN_SAMPLES, 0.0);
    }
}
