use crate::cli::ServeArgs;
use crate::whisper::config::{WhisperConfig, default_model_path};

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub default_language: String,
    pub max_upload_bytes: usize,
    pub whisper: WhisperConfig,
}

impl From<ServeArgs> for ServerConfig {
    fn from(args: ServeArgs) -> Self {
        let model_path = args
            .model_path
            .unwrap_or_else(|| default_model_path(&args.model_dir, &args.model));
        Self {
            host: args.host,
            port: args.port,
            default_language: args.default_language,
            max_upload_bytes: args.max_upload_mb.saturating_mul(1024 * 1024),
            whisper: WhisperConfig::new(&args.model, model_path, args.threads),
        }
    }
}

#[derive(Debug)]
pub struct ClientConfig {
    pub server_url: String,
    pub audio_file: String,
    pub language: Option<String>,
}

impl ClientConfig {
    pub fn new(server_url: String, audio_file: String, language: Option<String>) -> Self {
        Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            audio_file,
            language,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn serve_args() -> ServeArgs {
        ServeArgs {
            host: "127.0.0.1".to_string(),
            port: 5000,
            model: "base".to_string(),
            model_dir: PathBuf::from("/opt/models"),
            model_path: None,
            threads: 4,
            default_language: "zh".to_string(),
            max_upload_mb: 2,
        }
    }

    #[test]
    fn model_path_defaults_to_model_dir() {
        let config = ServerConfig::from(serve_args());
        assert_eq!(config.whisper.model_path, PathBuf::from("/opt/models/ggml-base.bin"));
        assert_eq!(config.max_upload_bytes, 2 * 1024 * 1024);
        assert!(!config.whisper.use_gpu);
    }

    #[test]
    fn explicit_model_path_wins() {
        let args = ServeArgs {
            model_path: Some(PathBuf::from("/tmp/custom.bin")),
            ..serve_args()
        };
        let config = ServerConfig::from(args);
        assert_eq!(config.whisper.model_path, PathBuf::from("/tmp/custom.bin"));
        assert_eq!(config.whisper.model, "base");
    }

    #[test]
    fn client_url_loses_trailing_slash() {
        let config = ClientConfig::new("http://host:5000/".into(), "a.wav".into(), None);
        assert_eq!(config.server_url, "http://host:5000");
    }
}
