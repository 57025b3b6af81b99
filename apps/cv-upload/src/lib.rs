//! Résumé upload client: file acquisition, validation, submission to the
//! remote scorer and lifecycle tracking of the request.

pub mod analysis_client;
pub mod config;
pub mod errors;
pub mod models;
pub mod source;
pub mod upload;

pub use analysis_client::{AnalysisService, HttpAnalysisService};
pub use errors::{SourceError, SubmissionError, ValidationError};
pub use models::{AnalysisReport, CandidateFile, ContentHandle};
pub use upload::{Phase, UploadSession, UploadSnapshot};
