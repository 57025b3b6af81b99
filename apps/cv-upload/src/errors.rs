use thiserror::Error;

/// Message shown for any transport-level failure. Deliberately generic: the
/// user can only retry.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Try again.";

/// Why a candidate file was refused before anything left the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please upload a file.")]
    Missing,

    #[error("Only PDF, Word or PowerPoint files allowed.")]
    UnsupportedType { media_type: String },
}

impl ValidationError {
    /// Stable short reason, independent of the user-facing copy.
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::Missing => "no file provided",
            ValidationError::UnsupportedType { .. } => "unsupported file type",
        }
    }
}

/// Failure to reach the bytes behind a content handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Failed to read {handle}: {reason}")]
    Io { handle: String, reason: String },
}

/// Every way a submission can fail. Each variant maps to a user-facing
/// message via [`SubmissionError::user_message`]; the variant itself keeps
/// the detail for logs and for callers that want to show more.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Analysis service error (status {status}): {body}")]
    Service { status: u16, body: String },

    #[error("Malformed analysis response (status {status}): {reason}")]
    MalformedResponse {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("Unreadable file: {0}")]
    Unreadable(#[from] SourceError),

    /// The request could not be built from the file, so nothing was sent.
    #[error("Invalid upload payload: {0}")]
    InvalidPayload(String),
}

impl SubmissionError {
    pub fn user_message(&self) -> String {
        match self {
            SubmissionError::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            SubmissionError::Service { status, .. }
            | SubmissionError::MalformedResponse { status, .. } => {
                format!("The analysis service failed (status {status}). Try again.")
            }
            SubmissionError::Unreadable(_) => {
                "The selected file could not be read. Please choose it again.".to_string()
            }
            SubmissionError::InvalidPayload(_) => {
                "The selected file cannot be sent. Please choose a different file.".to_string()
            }
        }
    }

    /// Service-side failures, including bodies that could not be decoded.
    pub fn is_service_error(&self) -> bool {
        matches!(
            self,
            SubmissionError::Service { .. } | SubmissionError::MalformedResponse { .. }
        )
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            SubmissionError::Service { status, .. }
            | SubmissionError::MalformedResponse { status, .. } => Some(*status),
            _ => None,
        }
    }
}
