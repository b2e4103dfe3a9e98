use std::sync::Arc;

use actix_cors::Cors;
use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, post, web};
use anyhow::{Context, Result, anyhow};
use futures_util::TryStreamExt;
use log::{debug, error, info};

use crate::config::ServerConfig;
use crate::dto::{HealthDto, TranscriptionDto};
use crate::engine::{SpeechEngine, Transcript};
use crate::error::ApiError;
use crate::normalize::simplify_transcript;
use crate::upload::{AUTO_LANGUAGE, TempUpload, resolve_language, validate_filename};
use crate::whisper::transcriber::WhisperTranscriber;

const TEXT_FIELD_LIMIT: usize = 1024;

pub struct AppState {
    pub engine: Arc<dyn SpeechEngine>,
    pub model: String,
    pub default_language: String,
    pub max_upload_bytes: usize,
}

struct AudioUpload {
    filename: String,
    extension: String,
    data: Vec<u8>,
}

#[derive(Default)]
struct TranscribeForm {
    audio: Option<AudioUpload>,
    language: Option<String>,
}

#[get("/api/health")]
pub async fn health_check(data: web::Data<AppState>) -> impl Responder {
    debug!("Health check endpoint called");
    HttpResponse::Ok().json(HealthDto::healthy(&data.model))
}

#[post("/api/transcribe")]
pub async fn transcribe_upload(
    data: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    debug!("Transcription request received");

    match transcribe(&data, payload).await {
        Ok(dto) => Ok(HttpResponse::Ok().json(dto)),
        Err(e) if e.is_client_error() => {
            info!("Rejected transcription request: {e}");
            Err(e)
        }
        Err(e) => {
            error!("Transcription failed: {e}");
            Err(e)
        }
    }
}

async fn transcribe(state: &AppState, mut payload: Multipart) -> Result<TranscriptionDto, ApiError> {
    let form = read_form(&mut payload, state.max_upload_bytes).await?;
    let audio = form.audio.ok_or(ApiError::MissingFile)?;
    let language = resolve_language(form.language, &state.default_language);

    info!(
        "Transcribing {}: {} bytes, language={}",
        audio.filename,
        audio.data.len(),
        language.as_deref().unwrap_or(AUTO_LANGUAGE)
    );

    let engine = Arc::clone(&state.engine);
    let transcript = web::block(move || -> Result<Transcript, ApiError> {
        let upload = TempUpload::write(&audio.extension, &audio.data)?;
        engine
            .transcribe(upload.path(), language.as_deref())
            .map_err(ApiError::Engine)
    })
    .await
    .map_err(|e| ApiError::Engine(anyhow!("Transcription worker failed: {e}")))??;

    let transcript = simplify_transcript(transcript);
    info!(
        "Transcription completed: {} segments, {} characters, language={}",
        transcript.segments.len(),
        transcript.text.chars().count(),
        transcript.language
    );

    Ok(transcript.into())
}

/// Collects the first `audio` file part and the first `language` value.
/// Parts named `audio` without a filename are form values, not files.
async fn read_form(payload: &mut Multipart, max_upload_bytes: usize) -> Result<TranscribeForm, ApiError> {
    let mut form = TranscribeForm::default();

    while let Some(field) = payload.try_next().await.map_err(form_error)? {
        match field.name() {
            Some("audio") if form.audio.is_none() => {
                let Some(filename) = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .map(str::to_string)
                else {
                    continue;
                };
                let extension = validate_filename(&filename)?;
                let data = read_field_data(field, max_upload_bytes).await?;
                debug!("Audio data received: {} bytes", data.len());
                form.audio = Some(AudioUpload {
                    filename,
                    extension,
                    data,
                });
            }
            Some("language") if form.language.is_none() => {
                let value = read_field_data(field, TEXT_FIELD_LIMIT).await?;
                let value = String::from_utf8(value)
                    .map_err(|_| ApiError::MalformedUpload("language is not valid UTF-8".to_string()))?;
                debug!("Language set to: {value:?}");
                form.language = Some(value);
            }
            _ => continue,
        }
    }

    Ok(form)
}

/// A body that is not multipart at all carries no file part.
fn form_error(e: MultipartError) -> ApiError {
    match e {
        MultipartError::ContentTypeMissing
        | MultipartError::ContentTypeParse
        | MultipartError::ContentTypeIncompatible => ApiError::MissingFile,
        e => ApiError::MalformedUpload(e.to_string()),
    }
}

async fn read_field_data(mut field: Field, limit: usize) -> Result<Vec<u8>, ApiError> {
    let mut data = Vec::new();
    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|e| ApiError::MalformedUpload(e.to_string()))?
    {
        if data.len() + chunk.len() > limit {
            return Err(ApiError::PayloadTooLarge(limit));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check).service(transcribe_upload);
}

pub async fn run_server(config: ServerConfig) -> Result<()> {
    info!("Starting Whisper transcription service");
    info!(
        "Using configuration: model={}, model_path={:?}, use_gpu={}, num_threads={}, default_language={}",
        config.whisper.model,
        config.whisper.model_path,
        config.whisper.use_gpu,
        config.whisper.num_threads,
        config.default_language
    );

    let model = config.whisper.model.clone();
    let transcriber = WhisperTranscriber::new(config.whisper).context("Failed to initialize transcriber")?;
    info!("Whisper transcriber initialized successfully");

    let app_state = web::Data::new(AppState {
        engine: Arc::new(transcriber),
        model,
        default_language: config.default_language,
        max_upload_bytes: config.max_upload_bytes,
    });

    info!("Starting HTTP server on {}:{}", config.host, config.port);
    info!("  GET  http://{}:{}/api/health", config.host, config.port);
    info!("  POST http://{}:{}/api/transcribe", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
