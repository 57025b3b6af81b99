//! The mounted upload component.
//!
//! `UploadSession` is the only owner of the state machine. UI callbacks call
//! its methods directly; asynchronous work (the submission and the settling
//! timer) runs on spawned tasks that report back through a channel, and
//! results are applied only when the session pulls them with
//! [`UploadSession::process_next`], [`UploadSession::pump`] or
//! [`UploadSession::run_until_settled`]. Transitions therefore happen one at a
//! time, in the order results resolve.
//!
//! Methods that may start work must be called inside a Tokio runtime.
//! Dropping the session aborts anything still pending.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::models::CandidateFile;
use crate::upload::machine::{Command, UploadEvent, UploadSnapshot, UploadStateMachine};
use crate::upload::orchestrator::SubmissionOrchestrator;
use crate::upload::selection::{DefaultAction, SelectionController};

pub struct UploadSession {
    machine: UploadStateMachine,
    selection: SelectionController,
    orchestrator: SubmissionOrchestrator,
    settle_delay: Duration,
    events_tx: mpsc::UnboundedSender<UploadEvent>,
    events_rx: mpsc::UnboundedReceiver<UploadEvent>,
    submission: Option<JoinHandle<()>>,
    settle_timer: Option<JoinHandle<()>>,
    snapshots: watch::Sender<UploadSnapshot>,
}

impl UploadSession {
    pub fn new(orchestrator: SubmissionOrchestrator, settle_delay: Duration) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (snapshots, _) = watch::channel(UploadSnapshot::default());
        Self {
            machine: UploadStateMachine::new(),
            selection: SelectionController::new(),
            orchestrator,
            settle_delay,
            events_tx,
            events_rx,
            submission: None,
            settle_timer: None,
            snapshots,
        }
    }

    pub fn snapshot(&self) -> &UploadSnapshot {
        self.machine.snapshot()
    }

    /// Receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<UploadSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn drag_hover(&self) -> bool {
        self.selection.drag_hover()
    }

    pub fn drag_enter(&mut self) -> DefaultAction {
        self.selection.drag_enter()
    }

    pub fn drag_over(&mut self) -> DefaultAction {
        self.selection.drag_over()
    }

    pub fn drag_leave(&mut self) -> DefaultAction {
        self.selection.drag_leave()
    }

    pub fn drop_files(&mut self, files: Vec<CandidateFile>) -> DefaultAction {
        let outcome = self.selection.drop(files);
        if let Some(verdict) = outcome.event {
            self.select(verdict);
        }
        outcome.default_action
    }

    /// Picker dialog change.
    pub fn files_offered(&mut self, files: Vec<CandidateFile>) {
        if let Some(verdict) = self.selection.files_offered(files) {
            self.select(verdict);
        }
    }

    pub fn remove_file(&mut self) {
        self.dispatch(UploadEvent::FileRemoved);
    }

    pub fn submit(&mut self) {
        self.dispatch(UploadEvent::SubmitRequested);
    }

    /// Applies every result that has already arrived, without waiting.
    /// Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.dispatch(event);
            applied += 1;
        }
        applied
    }

    /// Waits for the next asynchronous result and applies it. Stale results
    /// are applied too (and ignored by the machine). Only call this while
    /// something is in flight, otherwise it waits forever.
    pub async fn process_next(&mut self) -> &UploadSnapshot {
        if let Some(event) = self.events_rx.recv().await {
            self.dispatch(event);
        }
        self.machine.snapshot()
    }

    /// Applies results until neither a submission nor its settling delay is
    /// outstanding.
    pub async fn run_until_settled(&mut self) -> &UploadSnapshot {
        while self.machine.phase().is_in_flight() {
            // The session holds a sender, so `recv` only returns `None` if it
            // is being torn down.
            let Some(event) = self.events_rx.recv().await else {
                break;
            };
            self.dispatch(event);
        }
        self.machine.snapshot()
    }

    fn select(&mut self, verdict: UploadEvent) {
        self.dispatch(UploadEvent::SelectionStarted);
        self.dispatch(verdict);
    }

    fn dispatch(&mut self, event: UploadEvent) {
        if let Some(command) = self.machine.apply(event) {
            self.execute(command);
        }
        self.snapshots.send_replace(self.machine.snapshot().clone());
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::CancelPending => self.cancel_pending(),
            Command::Submit { generation, file } => {
                self.cancel_pending();
                let orchestrator = self.orchestrator.clone();
                let events = self.events_tx.clone();
                self.submission = Some(tokio::spawn(async move {
                    let event = orchestrator.submit(generation, file).await;
                    if events.send(event).is_err() {
                        debug!("Session gone before submission {generation} resolved");
                    }
                }));
            }
            Command::ScheduleSettle { generation } => {
                let delay = self.settle_delay;
                let events = self.events_tx.clone();
                self.settle_timer = Some(tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    if events.send(UploadEvent::AnalysisReady { generation }).is_err() {
                        debug!("Session gone before settle timer {generation} fired");
                    }
                }));
            }
        }
    }

    fn cancel_pending(&mut self) {
        for handle in [self.submission.take(), self.settle_timer.take()]
            .into_iter()
            .flatten()
        {
            handle.abort();
        }
    }
}

impl Drop for UploadSession {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
