use std::fmt;

/// Opaque reference to the bytes behind a candidate file.
///
/// The handle is resolved by a [`FileSource`](crate::source::FileSource) only
/// when the file is submitted; nothing upstream of the submission ever holds
/// the contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHandle(String);

impl ContentHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A file the user has chosen, not yet known to be acceptable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub name: String,
    pub declared_media_type: String,
    pub size_bytes: u64,
    pub content_handle: ContentHandle,
}

impl CandidateFile {
    pub fn new(
        name: impl Into<String>,
        declared_media_type: impl Into<String>,
        size_bytes: u64,
        content_handle: ContentHandle,
    ) -> Self {
        Self {
            name: name.into(),
            declared_media_type: declared_media_type.into(),
            size_bytes,
            content_handle,
        }
    }
}
