//! File access capability.
//!
//! Selection and validation only ever see [`CandidateFile`] descriptors; the
//! bytes are pulled through a [`FileSource`] at submission time. Hosts plug in
//! whatever backs their picker (local paths, an in-memory drop payload).

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::SourceError;
use crate::models::ContentHandle;

pub mod fs;
pub mod memory;

pub use fs::{media_type_for, LocalFileSource, PICKER_ACCEPT};
pub use memory::MemoryFileSource;

#[async_trait]
pub trait FileSource: Send + Sync {
    /// Reads the full contents behind `handle`.
    async fn read(&self, handle: &ContentHandle) -> Result<Bytes, SourceError>;
}
