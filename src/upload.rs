use std::io::Write;
use std::path::Path;

use log::debug;
use tempfile::NamedTempFile;

use crate::error::ApiError;

// Listed back to clients in this order.
pub const ALLOWED_EXTENSIONS: &[&str] = &["mp3", "wav", "mp4", "m4a", "ogg", "webm"];

pub const AUTO_LANGUAGE: &str = "auto";

pub fn allowed_extensions_list() -> String {
    ALLOWED_EXTENSIONS.join(", ")
}

pub fn file_extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

pub fn validate_filename(filename: &str) -> Result<String, ApiError> {
    if filename.is_empty() {
        return Err(ApiError::EmptyFilename);
    }

    match file_extension(filename) {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => Ok(ext),
        _ => Err(ApiError::UnsupportedFormat),
    }
}

/// `None` means the engine detects the language.
pub fn resolve_language(raw: Option<String>, default_language: &str) -> Option<String> {
    match raw {
        None => Some(default_language.to_string()),
        Some(lang) if lang.is_empty() => Some(default_language.to_string()),
        Some(lang) if lang == AUTO_LANGUAGE => None,
        Some(lang) => Some(lang),
    }
}

/// The file is removed when this value is dropped.
pub struct TempUpload {
    file: NamedTempFile,
}

impl TempUpload {
    pub fn write(extension: &str, data: &[u8]) -> std::io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(&format!(".{extension}"))
            .tempfile()?;
        file.write_all(data)?;
        file.flush()?;
        debug!("Spooled {} bytes to {}", data.len(), file.path().display());
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lower_cased_suffix_after_last_dot() {
        assert_eq!(file_extension("clip.WAV").as_deref(), Some("wav"));
        assert_eq!(file_extension("my.voice.note.m4a").as_deref(), Some("m4a"));
        assert_eq!(file_extension("trailing."), Some(String::new()));
        assert_eq!(file_extension("noext"), None);
    }

    #[test]
    fn accepts_allowed_extensions_case_insensitively() {
        for name in ["a.mp3", "b.WAV", "c.Mp4", "d.m4a", "e.ogg", "f.webm"] {
            assert!(validate_filename(name).is_ok(), "{name} should be accepted");
        }
    }

    #[test]
    fn rejects_empty_and_unknown_names() {
        assert!(matches!(validate_filename(""), Err(ApiError::EmptyFilename)));
        for name in ["clip.txt", "voice.xyz", "noext", "wav", "audio."] {
            assert!(
                matches!(validate_filename(name), Err(ApiError::UnsupportedFormat)),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn language_resolution() {
        assert_eq!(resolve_language(None, "zh").as_deref(), Some("zh"));
        assert_eq!(resolve_language(Some(String::new()), "zh").as_deref(), Some("zh"));
        assert_eq!(resolve_language(Some("auto".into()), "zh"), None);
        assert_eq!(resolve_language(Some("en".into()), "zh").as_deref(), Some("en"));
        assert_eq!(resolve_language(Some("AUTO".into()), "zh").as_deref(), Some("AUTO"));
    }

    #[test]
    fn temp_upload_keeps_suffix_and_is_removed_on_drop() {
        let upload = TempUpload::write("ogg", b"not really audio").unwrap();
        let path = upload.path().to_path_buf();

        assert!(path.exists());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("ogg"));
        assert_eq!(std::fs::read(&path).unwrap(), b"not really audio");

        drop(upload);
        assert!(!path.exists());
    }
}
