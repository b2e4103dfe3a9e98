use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "whisper-transcription",
    about = "Whisper transcription service",
    long_about = "An HTTP service that transcribes uploaded audio with a local Whisper model and normalizes Chinese output to simplified characters.",
    after_help = "EXAMPLES:\n    # Start the service on the port from $PORT (default 5000)\n    whisper-transcription\n\n    # Start with a larger model\n    whisper-transcription serve --model small --model-dir ./models\n\n    # Transcribe a file through a running service\n    whisper-transcription file recording.m4a --language auto\n\n    # Check a remote service\n    whisper-transcription health --server-url http://my-server:5000"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(name = "serve")]
    Serve(ServeArgs),
    #[command(name = "file")]
    TranscribeFile {
        audio_file: String,

        #[arg(long, default_value = "http://localhost:5000")]
        server_url: String,

        /// Language code, or `auto` to let the model detect it.
        #[arg(long)]
        language: Option<String>,
    },
    #[command(name = "health")]
    Health {
        #[arg(long, default_value = "http://localhost:5000")]
        server_url: String,
    },
}

#[derive(Args, Clone, Debug)]
pub struct ServeArgs {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value = "5000")]
    pub port: u16,

    /// Whisper model size, e.g. tiny, base, small.
    #[arg(long, env = "WHISPER_MODEL", default_value = "base")]
    pub model: String,

    #[arg(long, env = "WHISPER_MODEL_DIR", default_value = "models")]
    pub model_dir: PathBuf,

    /// Explicit model file; overrides `--model-dir`.
    #[arg(long, env = "WHISPER_MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    #[arg(long, env = "WHISPER_THREADS", default_value = "4", value_parser = clap::value_parser!(i32).range(1..))]
    pub threads: i32,

    #[arg(long, env = "WHISPER_DEFAULT_LANGUAGE", default_value = "zh")]
    pub default_language: String,

    #[arg(long, env = "MAX_UPLOAD_MB", default_value = "100")]
    pub max_upload_mb: usize,
}

impl Cli {
    /// Runs the server when no subcommand is given.
    pub fn into_command(self) -> Commands {
        self.command
            .unwrap_or_else(|| Commands::Serve(ServeArgs::from_env()))
    }
}

impl ServeArgs {
    /// Server settings taken only from the environment and defaults.
    pub fn from_env() -> Self {
        #[derive(Parser)]
        struct EnvOnly {
            #[command(flatten)]
            args: ServeArgs,
        }
        EnvOnly::parse_from(["whisper-transcription"]).args
    }
}
