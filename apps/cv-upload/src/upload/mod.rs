//! Upload flow: file acquisition, validation, submission and lifecycle tracking.
//! Only `machine` mutates lifecycle state; everything else talks to it through
//! `UploadEvent`s, and `session` is the single owner that applies them in order.

pub mod machine;
pub mod orchestrator;
pub mod selection;
pub mod session;
pub mod validator;

pub use machine::{Command, Generation, Phase, UploadEvent, UploadSnapshot, UploadStateMachine};
pub use orchestrator::SubmissionOrchestrator;
pub use selection::{DefaultAction, DropOutcome, SelectionController};
pub use session::UploadSession;
pub use validator::{is_accepted, validate, ACCEPTED_MEDIA_TYPES};
