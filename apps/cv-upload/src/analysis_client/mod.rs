//! Analysis client: the single point of contact with the remote résumé scorer.
//!
//! No other module talks to the scoring endpoint. Requests go out as
//! `multipart/form-data` with one `file` part; responses come back as opaque
//! JSON reports.
//!
//! There is no retry loop here: every retry is user-initiated.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, warn};

use crate::errors::SubmissionError;
use crate::models::AnalysisReport;

/// Public scoring endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "https://yaraa03-resume-ats-api.hf.space/ats-score";
/// Multipart field name the scorer reads the document from.
pub const FILE_FIELD: &str = "file";

/// Everything the scorer needs from one file.
#[derive(Debug, Clone)]
pub struct UploadPayload {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Bytes,
}

/// A backend able to score an uploaded document. Implement this to swap the
/// HTTP scorer for a stub or another transport without touching callers.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyze(&self, payload: UploadPayload) -> Result<AnalysisReport, SubmissionError>;
}

/// HTTP implementation of [`AnalysisService`].
#[derive(Clone)]
pub struct HttpAnalysisService {
    client: Client,
    endpoint: String,
}

impl HttpAnalysisService {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisService {
    async fn analyze(&self, payload: UploadPayload) -> Result<AnalysisReport, SubmissionError> {
        let length = payload.bytes.len() as u64;
        let part = Part::stream_with_length(payload.bytes, length)
            .file_name(payload.file_name.clone())
            .mime_str(&payload.media_type)
            .map_err(|e| {
                SubmissionError::InvalidPayload(format!(
                    "invalid media type {:?}: {e}",
                    payload.media_type
                ))
            })?;
        let form = Form::new().part(FILE_FIELD, part);

        debug!(
            "Submitting {} ({}, {length} bytes) to {}",
            payload.file_name, payload.media_type, self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SubmissionError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        match response.text().await {
            Ok(body) => classify_response(status, body),
            Err(e) => Err(classify_unreadable_body(status, e.to_string())),
        }
    }
}

/// Turns a received status and body into a report or a tagged failure.
pub fn classify_response(status: u16, body: String) -> Result<AnalysisReport, SubmissionError> {
    if !(200..300).contains(&status) {
        warn!("Analysis service returned {status}: {body}");
        return Err(SubmissionError::Service { status, body });
    }

    debug!("Analysis response: {body}");

    match serde_json::from_str(&body) {
        Ok(value) => Ok(AnalysisReport::new(value)),
        Err(e) => {
            warn!("Analysis service returned {status} with an unparseable body: {e}");
            Err(SubmissionError::MalformedResponse {
                status,
                reason: e.to_string(),
                body,
            })
        }
    }
}

/// A status line arrived but the body did not. The status still decides the
/// category; the body is left empty.
pub fn classify_unreadable_body(status: u16, reason: String) -> SubmissionError {
    if !(200..300).contains(&status) {
        warn!("Analysis service returned {status}; body unreadable: {reason}");
        return SubmissionError::Service {
            status,
            body: String::new(),
        };
    }

    warn!("Analysis service returned {status} but the body could not be read: {reason}");
    SubmissionError::MalformedResponse {
        status,
        reason,
        body: String::new(),
    }
}
