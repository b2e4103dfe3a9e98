use std::path::Path;

use anyhow::{Result, anyhow};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::upload::{allowed_extensions_list, validate_filename};

pub async fn send_transcription_request(config: &ClientConfig) -> Result<Value> {
    let path = Path::new(&config.audio_file);
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("Invalid audio file path: {}", config.audio_file))?
        .to_string();

    if validate_filename(&filename).is_err() {
        return Err(anyhow!(
            "Unsupported audio format: {}, supported: {}",
            filename,
            allowed_extensions_list()
        ));
    }

    let audio_data = tokio::fs::read(path)
        .await
        .map_err(|e| anyhow!("Failed to read audio file {}: {}", config.audio_file, e))?;

    println!("📁 Audio file: {} ({} bytes)", filename, audio_data.len());

    let mut form = reqwest::multipart::Form::new().part(
        "audio",
        reqwest::multipart::Part::bytes(audio_data).file_name(filename),
    );
    if let Some(language) = &config.language {
        form = form.text("language", language.clone());
        println!("   Language: {language}");
    }

    println!(
        "🚀 Sending transcription request to: {}/api/transcribe",
        config.server_url
    );

    let response = reqwest::Client::new()
        .post(format!("{}/api/transcribe", config.server_url))
        .multipart(form)
        .send()
        .await
        .map_err(|e| anyhow!("Failed to send request: {}", e))?;

    let status = response.status();
    let response_text = response
        .text()
        .await
        .map_err(|e| anyhow!("Failed to read response: {}", e))?;

    if !status.is_success() {
        return Err(anyhow!(
            "Server returned error {}: {}",
            status,
            response_text
        ));
    }

    serde_json::from_str(&response_text).map_err(|e| anyhow!("Failed to parse JSON response: {}", e))
}

pub async fn check_server_health(server_url: &str) -> Result<Value> {
    let server_url = server_url.trim_end_matches('/');
    println!("🔍 Checking server health at: {server_url}/api/health");

    let response = reqwest::Client::new()
        .get(format!("{server_url}/api/health"))
        .send()
        .await
        .map_err(|e| anyhow!("Failed to connect to server: {}", e))?;

    if !response.status().is_success() {
        return Err(anyhow!("Server health check failed: {}", response.status()));
    }

    let body = response
        .text()
        .await
        .map_err(|e| anyhow!("Failed to read response: {}", e))?;
    serde_json::from_str(&body).map_err(|e| anyhow!("Failed to parse JSON response: {}", e))
}

pub async fn run_health(server_url: &str) -> Result<()> {
    let health = check_server_health(server_url).await?;
    println!("✅ Server is healthy");
    println!("{}", serde_json::to_string_pretty(&health)?);
    Ok(())
}

pub async fn run_client(config: ClientConfig) -> Result<()> {
    println!("🎵 Whisper Transcription Client");
    println!("==============================");

    if let Err(e) = check_server_health(&config.server_url).await {
        eprintln!("❌ {e}");
        eprintln!("💡 Make sure the server is running: whisper-transcription serve");
        return Err(e);
    }

    match send_transcription_request(&config).await {
        Ok(result) => {
            println!("\n✅ Transcription completed!");
            println!("📝 Result:");
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Err(e) => {
            eprintln!("❌ Transcription failed: {e}");
            return Err(e);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unsupported_extension_is_rejected_before_upload() {
        let config = ClientConfig::new(
            "http://127.0.0.1:9".to_string(),
            "notes.txt".to_string(),
            None,
        );
        let err = send_transcription_request(&config).await.unwrap_err();
        assert!(err.to_string().contains("mp3, wav, mp4, m4a, ogg, webm"));
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let config = ClientConfig::new(
            "http://127.0.0.1:9".to_string(),
            "/nonexistent/dir/clip.wav".to_string(),
            None,
        );
        let err = send_transcription_request(&config).await.unwrap_err();
        assert!(err.to_string().contains("Failed to read audio file"));
    }
}
