mod audio;
mod cli;
mod client;
mod config;
mod dto;
mod engine;
mod error;
mod normalize;
mod opus;
mod server;
mod upload;
mod whisper;

use clap::Parser;
use cli::{Cli, Commands};
use config::{ClientConfig, ServerConfig};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().into_command() {
        Commands::Serve(args) => server::run_server(ServerConfig::from(args)).await,
        Commands::TranscribeFile {
            audio_file,
            server_url,
            language,
        } => client::run_client(ClientConfig::new(server_url, audio_file, language)).await,
        Commands::Health { server_url } => client::run_health(&server_url).await,
    }
}
