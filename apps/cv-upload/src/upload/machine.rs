//! Upload lifecycle state machine.
//!
//! The machine is synchronous and owns the [`UploadSnapshot`] outright. It
//! never spawns work itself: transitions that need something to happen
//! outside (a submission, the settling timer, cancelling either) hand back a
//! [`Command`] for the owning session to carry out.
//!
//! Every selection event and every accepted submit bumps the generation.
//! Asynchronous results carry the generation they were started under and are
//! dropped when it no longer matches, so a slow response can never land on a
//! file the user has already replaced.

use std::fmt;

use tracing::{debug, info};

use crate::errors::{SubmissionError, ValidationError};
use crate::models::{AnalysisReport, CandidateFile};

pub type Generation = u64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    #[default]
    Idle,
    Validating,
    Submitting,
    Analyzing,
    Succeeded,
    Failed,
}

impl Phase {
    /// A submission or its settling delay is outstanding.
    pub fn is_in_flight(self) -> bool {
        matches!(self, Phase::Submitting | Phase::Analyzing)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Validating => "validating",
            Phase::Submitting => "submitting",
            Phase::Analyzing => "analyzing",
            Phase::Succeeded => "succeeded",
            Phase::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    /// A selection arrived and is being validated.
    SelectionStarted,
    FileAccepted(CandidateFile),
    FileRejected(ValidationError),
    FileRemoved,
    SubmitRequested,
    SubmissionSucceeded {
        generation: Generation,
        report: AnalysisReport,
    },
    SubmissionFailed {
        generation: Generation,
        error: SubmissionError,
    },
    /// The settling delay for `generation` elapsed.
    AnalysisReady { generation: Generation },
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Abort the outstanding submission and settling timer, if any.
    CancelPending,
    Submit {
        generation: Generation,
        file: CandidateFile,
    },
    ScheduleSettle { generation: Generation },
}

/// What the UI renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadSnapshot {
    pub file: Option<CandidateFile>,
    pub phase: Phase,
    pub error_message: Option<String>,
    /// Structured cause behind `error_message` when a submission failed.
    pub failure: Option<SubmissionError>,
    pub analysis_result: Option<AnalysisReport>,
}

impl UploadSnapshot {
    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        self.file.is_some() && !self.phase.is_in_flight() && self.phase != Phase::Validating
    }

    fn clear_outcome(&mut self) {
        self.error_message = None;
        self.failure = None;
        self.analysis_result = None;
    }
}

#[derive(Debug, Default)]
pub struct UploadStateMachine {
    snapshot: UploadSnapshot,
    generation: Generation,
    // Report held back during the settling delay.
    pending_report: Option<AnalysisReport>,
}

impl UploadStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &UploadSnapshot {
        &self.snapshot
    }

    pub fn phase(&self) -> Phase {
        self.snapshot.phase
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Applies one event and returns the side effect it calls for, if any.
    pub fn apply(&mut self, event: UploadEvent) -> Option<Command> {
        let from = self.snapshot.phase;
        let command = match event {
            UploadEvent::SelectionStarted => {
                let command = self.supersede();
                self.snapshot.clear_outcome();
                self.snapshot.phase = Phase::Validating;
                command
            }
            UploadEvent::FileAccepted(file) => {
                let command = self.supersede();
                info!("Accepted {} ({})", file.name, file.declared_media_type);
                self.snapshot.clear_outcome();
                self.snapshot.file = Some(file);
                self.snapshot.phase = Phase::Idle;
                command
            }
            UploadEvent::FileRejected(reason) => {
                let command = self.supersede();
                info!("Rejected selection: {}", reason.reason());
                self.snapshot.clear_outcome();
                self.snapshot.file = None;
                self.snapshot.error_message = Some(reason.to_string());
                self.snapshot.phase = Phase::Idle;
                command
            }
            UploadEvent::FileRemoved => {
                let command = self.supersede();
                self.snapshot.clear_outcome();
                self.snapshot.file = None;
                self.snapshot.phase = Phase::Idle;
                command
            }
            UploadEvent::SubmitRequested => self.request_submit(),
            UploadEvent::SubmissionSucceeded { generation, report } => {
                if !self.is_current(generation, Phase::Submitting) {
                    debug!("Discarding stale submission result (generation {generation})");
                    return None;
                }
                self.pending_report = Some(report);
                self.snapshot.phase = Phase::Analyzing;
                Some(Command::ScheduleSettle { generation })
            }
            UploadEvent::SubmissionFailed { generation, error } => {
                if !self.is_current(generation, Phase::Submitting) {
                    debug!("Discarding stale submission failure (generation {generation}): {error}");
                    return None;
                }
                self.snapshot.error_message = Some(error.user_message());
                self.snapshot.failure = Some(error);
                self.snapshot.phase = Phase::Failed;
                None
            }
            UploadEvent::AnalysisReady { generation } => {
                if !self.is_current(generation, Phase::Analyzing) {
                    debug!("Discarding stale settle timer (generation {generation})");
                    return None;
                }
                let Some(report) = self.pending_report.take() else {
                    debug!("Settle timer fired with no report held (generation {generation})");
                    return None;
                };
                self.snapshot.analysis_result = Some(report);
                self.snapshot.phase = Phase::Succeeded;
                None
            }
        };

        if from != self.snapshot.phase {
            info!("Upload phase {from} -> {}", self.snapshot.phase);
        }
        command
    }

    fn request_submit(&mut self) -> Option<Command> {
        let phase = self.snapshot.phase;
        if phase.is_in_flight() || phase == Phase::Validating {
            debug!("Ignoring submit while {phase}");
            return None;
        }

        let Some(file) = self.snapshot.file.clone() else {
            self.snapshot.clear_outcome();
            self.snapshot.error_message = Some(ValidationError::Missing.to_string());
            self.snapshot.phase = Phase::Idle;
            return None;
        };

        self.generation += 1;
        self.pending_report = None;
        self.snapshot.clear_outcome();
        self.snapshot.phase = Phase::Submitting;
        Some(Command::Submit {
            generation: self.generation,
            file,
        })
    }

    /// Invalidates whatever is in flight. Returns a cancel command only when
    /// there was something to cancel.
    fn supersede(&mut self) -> Option<Command> {
        self.generation += 1;
        self.pending_report = None;
        self.snapshot
            .phase
            .is_in_flight()
            .then_some(Command::CancelPending)
    }

    fn is_current(&self, generation: Generation, expected: Phase) -> bool {
        generation == self.generation && self.snapshot.phase == expected
    }
}
