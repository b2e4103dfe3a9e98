use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::dto::ErrorDto;
use crate::upload::allowed_extensions_list;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No audio file provided")]
    MissingFile,

    #[error("Filename is empty")]
    EmptyFilename,

    #[error("Unsupported file format, supported: {}", allowed_extensions_list())]
    UnsupportedFormat,

    #[error("Failed to read upload: {0}")]
    MalformedUpload(String),

    #[error("Upload exceeds the limit of {0} bytes")]
    PayloadTooLarge(usize),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0:#}")]
    Engine(anyhow::Error),
}

impl ApiError {
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingFile
            | ApiError::EmptyFilename
            | ApiError::UnsupportedFormat
            | ApiError::MalformedUpload(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Io(_) | ApiError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorDto {
            error: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_client_errors() {
        assert_eq!(ApiError::MissingFile.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::EmptyFilename.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::UnsupportedFormat.status_code(), StatusCode::BAD_REQUEST);
        assert!(ApiError::PayloadTooLarge(1).is_client_error());
    }

    #[test]
    fn runtime_errors_are_server_errors() {
        let io = ApiError::from(std::io::Error::other("disk full"));
        assert_eq!(io.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(io.to_string(), "disk full");

        let engine = ApiError::Engine(anyhow::anyhow!("model exploded").context("Transcription failed"));
        assert_eq!(engine.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(engine.to_string(), "Transcription failed: model exploded");
    }

    #[test]
    fn unsupported_format_lists_allowed_extensions() {
        assert_eq!(
            ApiError::UnsupportedFormat.to_string(),
            "Unsupported file format, supported: mp3, wav, mp4, m4a, ogg, webm"
        );
    }
}
