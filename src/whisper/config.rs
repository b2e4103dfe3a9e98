use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct WhisperConfig {
    /// Model size reported by the health endpoint, e.g. `base`.
    pub model: String,
    pub model_path: PathBuf,
    pub use_gpu: bool,
    pub no_speech_threshold: f32,
    pub num_threads: i32,
}

impl WhisperConfig {
    /// CPU-only, full precision configuration for a `ggml-<model>.bin` file.
    pub fn new(model: &str, model_path: PathBuf, num_threads: i32) -> Self {
        Self {
            model: model.to_string(),
            model_path,
            use_gpu: false,
            no_speech_threshold: 0.6,
            num_threads,
        }
    }
}

/// Conventional whisper.cpp file name for a model size inside `model_dir`.
pub fn default_model_path(model_dir: &Path, model: &str) -> PathBuf {
    model_dir.join(format!("ggml-{model}.bin"))
}
