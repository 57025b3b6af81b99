use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::SourceError;
use crate::models::{CandidateFile, ContentHandle};
use crate::source::FileSource;

/// Payloads already held in memory, e.g. a drop buffer handed over by the host.
#[derive(Debug, Default)]
pub struct MemoryFileSource {
    files: Mutex<HashMap<ContentHandle, Bytes>>,
    next_id: AtomicU64,
}

impl MemoryFileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `bytes` and returns a candidate pointing at them. Every call
    /// gets its own handle, even when the file name repeats.
    pub fn insert(
        &self,
        name: &str,
        declared_media_type: &str,
        bytes: impl Into<Bytes>,
    ) -> CandidateFile {
        let bytes = bytes.into();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let handle = ContentHandle::new(format!("{name}#{id}"));
        let size = bytes.len() as u64;
        self.lock().insert(handle.clone(), bytes);
        CandidateFile::new(name, declared_media_type, size, handle)
    }

    pub fn remove(&self, handle: &ContentHandle) -> bool {
        self.lock().remove(handle).is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ContentHandle, Bytes>> {
        // A poisoned map still holds valid entries.
        self.files.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl FileSource for MemoryFileSource {
    async fn read(&self, handle: &ContentHandle) -> Result<Bytes, SourceError> {
        self.lock()
            .get(handle)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(handle.to_string()))
    }
}
