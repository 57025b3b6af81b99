use std::sync::Arc;

use tracing::{debug, info};

use crate::analysis_client::{AnalysisService, UploadPayload};
use crate::errors::SubmissionError;
use crate::models::{AnalysisReport, CandidateFile};
use crate::source::FileSource;
use crate::upload::machine::{Generation, UploadEvent};

/// Runs one submission end to end and reports back as an event.
///
/// `submit` always resolves to `SubmissionSucceeded` or `SubmissionFailed`;
/// failures are values, never panics, so the machine cannot be left waiting.
#[derive(Clone)]
pub struct SubmissionOrchestrator {
    source: Arc<dyn FileSource>,
    service: Arc<dyn AnalysisService>,
}

impl SubmissionOrchestrator {
    pub fn new(source: Arc<dyn FileSource>, service: Arc<dyn AnalysisService>) -> Self {
        Self { source, service }
    }

    pub async fn submit(&self, generation: Generation, file: CandidateFile) -> UploadEvent {
        match self.run(&file).await {
            Ok(report) => {
                info!("Analysis of {} completed (generation {generation})", file.name);
                UploadEvent::SubmissionSucceeded { generation, report }
            }
            Err(error) => {
                debug!("Analysis of {} failed (generation {generation}): {error}", file.name);
                UploadEvent::SubmissionFailed { generation, error }
            }
        }
    }

    async fn run(&self, file: &CandidateFile) -> Result<AnalysisReport, SubmissionError> {
        let bytes = self.source.read(&file.content_handle).await?;
        self.service
            .analyze(UploadPayload {
                file_name: file.name.clone(),
                media_type: file.declared_media_type.clone(),
                bytes,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SourceError;
    use crate::models::ContentHandle;
    use crate::source::MemoryFileSource;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records what it was sent and answers with a fixed outcome.
    struct FixedService {
        outcome: Result<AnalysisReport, SubmissionError>,
        seen: Mutex<Vec<(String, String, usize)>>,
    }

    #[async_trait]
    impl AnalysisService for FixedService {
        async fn analyze(
            &self,
            payload: UploadPayload,
        ) -> Result<AnalysisReport, SubmissionError> {
            self.seen.lock().unwrap().push((
                payload.file_name,
                payload.media_type,
                payload.bytes.len(),
            ));
            self.outcome.clone()
        }
    }

    fn orchestrator(
        outcome: Result<AnalysisReport, SubmissionError>,
    ) -> (SubmissionOrchestrator, Arc<MemoryFileSource>, Arc<FixedService>) {
        let source = Arc::new(MemoryFileSource::new());
        let service = Arc::new(FixedService {
            outcome,
            seen: Mutex::new(Vec::new()),
        });
        (
            SubmissionOrchestrator::new(source.clone(), service.clone()),
            source,
            service,
        )
    }

    #[tokio::test]
    async fn test_success_carries_generation_and_report() {
        let report = AnalysisReport::new(json!({"score": 82}));
        let (orchestrator, source, service) = orchestrator(Ok(report.clone()));
        let file = source.insert("resume.pdf", "application/pdf", &b"%PDF-1.4"[..]);

        let event = orchestrator.submit(7, file).await;
        assert_eq!(
            event,
            UploadEvent::SubmissionSucceeded {
                generation: 7,
                report
            }
        );
        assert_eq!(
            service.seen.lock().unwrap().as_slice(),
            &[("resume.pdf".to_string(), "application/pdf".to_string(), 8)]
        );
    }

    #[tokio::test]
    async fn test_service_failure_becomes_failed_event() {
        let error = SubmissionError::Service {
            status: 500,
            body: "internal".to_string(),
        };
        let (orchestrator, source, _) = orchestrator(Err(error.clone()));
        let file = source.insert("resume.pdf", "application/pdf", &b"x"[..]);

        let event = orchestrator.submit(3, file).await;
        assert_eq!(
            event,
            UploadEvent::SubmissionFailed {
                generation: 3,
                error
            }
        );
    }

    #[tokio::test]
    async fn test_unreadable_file_fails_without_calling_service() {
        let (orchestrator, _, service) = orchestrator(Ok(AnalysisReport::new(json!({}))));
        let file = CandidateFile::new(
            "ghost.pdf",
            "application/pdf",
            10,
            ContentHandle::new("ghost.pdf"),
        );

        let event = orchestrator.submit(1, file).await;
        assert_eq!(
            event,
            UploadEvent::SubmissionFailed {
                generation: 1,
                error: SubmissionError::Unreadable(SourceError::NotFound(
                    "ghost.pdf".to_string()
                )),
            }
        );
        assert!(service.seen.lock().unwrap().is_empty());
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_failure_is_not_logged_again_at_warn() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let error = SubmissionError::Service {
            status: 502,
            body: "bad gateway".to_string(),
        };
        let (orchestrator, source, _) = orchestrator(Err(error));
        let file = source.insert("resume.pdf", "application/pdf", &b"x"[..]);
        let event = orchestrator.submit(4, file).await;

        assert!(matches!(event, UploadEvent::SubmissionFailed { .. }));
        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert!(!output.contains("Analysis of resume.pdf failed"), "{output}");
    }
}
