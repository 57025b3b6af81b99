use crate::errors::ValidationError;
use crate::models::CandidateFile;

/// Declared media types the scorer accepts. Compared exactly, case included.
pub const ACCEPTED_MEDIA_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "application/vnd.ms-powerpoint",
];

pub fn is_accepted(media_type: &str) -> bool {
    ACCEPTED_MEDIA_TYPES.contains(&media_type)
}

/// Checks a candidate's declared media type against the allow-list.
///
/// Only the declared type is considered; file contents are never sniffed.
pub fn validate(candidate: Option<CandidateFile>) -> Result<CandidateFile, ValidationError> {
    let candidate = candidate.ok_or(ValidationError::Missing)?;
    if !is_accepted(&candidate.declared_media_type) {
        return Err(ValidationError::UnsupportedType {
            media_type: candidate.declared_media_type,
        });
    }
    Ok(candidate)
}
