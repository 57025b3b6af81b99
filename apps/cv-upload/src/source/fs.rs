use std::io::ErrorKind;
use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::errors::SourceError;
use crate::models::{CandidateFile, ContentHandle};
use crate::source::FileSource;

/// Extension filter offered to the picker dialog.
pub const PICKER_ACCEPT: &str = ".pdf,.doc,.docx,.pptx,.ppt";

/// Fallback when the extension tells us nothing.
const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

const EXTENSION_MEDIA_TYPES: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("ppt", "application/vnd.ms-powerpoint"),
    (
        "pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ),
    ("txt", "text/plain"),
    ("rtf", "application/rtf"),
    ("odt", "application/vnd.oasis.opendocument.text"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("zip", "application/zip"),
];

/// Declared media type for a file name, inferred from its extension the way a
/// browser fills in `File.type`. The content is never inspected.
pub fn media_type_for(name: &str) -> &'static str {
    name.rsplit_once('.')
        .and_then(|(_, ext)| {
            EXTENSION_MEDIA_TYPES
                .iter()
                .find(|(known, _)| known.eq_ignore_ascii_case(ext))
                .map(|(_, media_type)| *media_type)
        })
        .unwrap_or(UNKNOWN_MEDIA_TYPE)
}

/// Files on the local filesystem. Handles are paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSource;

impl LocalFileSource {
    /// Builds a candidate for `path` from its metadata alone.
    pub async fn describe(&self, path: impl AsRef<Path>) -> Result<CandidateFile, SourceError> {
        let path = path.as_ref();
        let shown = path.display().to_string();

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| io_error(&shown, e))?;
        if !metadata.is_file() {
            return Err(SourceError::Io {
                handle: shown,
                reason: "not a regular file".to_string(),
            });
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| shown.clone());
        let media_type = media_type_for(&name);
        debug!("Described {shown} as {media_type} ({} bytes)", metadata.len());

        Ok(CandidateFile::new(
            name,
            media_type,
            metadata.len(),
            ContentHandle::new(shown),
        ))
    }
}

#[async_trait]
impl FileSource for LocalFileSource {
    async fn read(&self, handle: &ContentHandle) -> Result<Bytes, SourceError> {
        tokio::fs::read(handle.as_str())
            .await
            .map(Bytes::from)
            .map_err(|e| io_error(handle.as_str(), e))
    }
}

fn io_error(handle: &str, err: std::io::Error) -> SourceError {
    match err.kind() {
        ErrorKind::NotFound => SourceError::NotFound(handle.to_string()),
        _ => SourceError::Io {
            handle: handle.to_string(),
            reason: err.to_string(),
        },
    }
}
