use tracing::debug;

use crate::models::CandidateFile;
use crate::upload::machine::UploadEvent;
use crate::upload::validator::validate;

/// What the host should do with the browser's default handling of a drag
/// event. For a drop the default is opening the file in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultAction {
    Prevent,
    Allow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropOutcome {
    pub default_action: DefaultAction,
    /// `None` when the drop carried no files.
    pub event: Option<UploadEvent>,
}

/// Merges the picker dialog and drag-and-drop into one selection path.
#[derive(Debug, Default)]
pub struct SelectionController {
    drag_hover: bool,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Presentational only; never feeds into the lifecycle.
    pub fn drag_hover(&self) -> bool {
        self.drag_hover
    }

    pub fn drag_enter(&mut self) -> DefaultAction {
        self.drag_hover = true;
        DefaultAction::Prevent
    }

    pub fn drag_over(&mut self) -> DefaultAction {
        self.drag_hover = true;
        DefaultAction::Prevent
    }

    pub fn drag_leave(&mut self) -> DefaultAction {
        self.drag_hover = false;
        DefaultAction::Allow
    }

    pub fn drop(&mut self, files: impl IntoIterator<Item = CandidateFile>) -> DropOutcome {
        self.drag_hover = false;
        DropOutcome {
            default_action: DefaultAction::Prevent,
            event: self.files_offered(files),
        }
    }

    /// Picker change and drop both land here. Only the first file counts; an
    /// empty offer yields nothing.
    pub fn files_offered(
        &self,
        files: impl IntoIterator<Item = CandidateFile>,
    ) -> Option<UploadEvent> {
        let first = files.into_iter().next()?;
        debug!("Validating {} ({})", first.name, first.declared_media_type);

        Some(match validate(Some(first)) {
            Ok(file) => UploadEvent::FileAccepted(file),
            Err(reason) => UploadEvent::FileRejected(reason),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ValidationError;
    use crate::models::ContentHandle;

    fn file(name: &str, media_type: &str) -> CandidateFile {
        CandidateFile::new(name, media_type, 10, ContentHandle::new(name))
    }

    #[test]
    fn test_drag_hover_tracks_enter_over_leave() {
        let mut selection = SelectionController::new();
        assert!(!selection.drag_hover());
        assert_eq!(selection.drag_enter(), DefaultAction::Prevent);
        assert!(selection.drag_hover());
        assert_eq!(selection.drag_over(), DefaultAction::Prevent);
        assert!(selection.drag_hover());
        assert_eq!(selection.drag_leave(), DefaultAction::Allow);
        assert!(!selection.drag_hover());
    }

    #[test]
    fn test_drop_clears_hover_and_prevents_default() {
        let mut selection = SelectionController::new();
        selection.drag_over();
        let outcome = selection.drop(vec![file("resume.pdf", "application/pdf")]);
        assert!(!selection.drag_hover());
        assert_eq!(outcome.default_action, DefaultAction::Prevent);
        assert_eq!(
            outcome.event,
            Some(UploadEvent::FileAccepted(file("resume.pdf", "application/pdf")))
        );
    }

    #[test]
    fn test_empty_drop_is_a_no_op() {
        let mut selection = SelectionController::new();
        selection.drag_enter();
        let outcome = selection.drop(Vec::new());
        assert_eq!(outcome.default_action, DefaultAction::Prevent);
        assert_eq!(outcome.event, None);
        assert!(!selection.drag_hover());
    }

    #[test]
    fn test_only_first_offered_file_is_used() {
        let selection = SelectionController::new();
        let event = selection.files_offered(vec![
            file("image.png", "image/png"),
            file("resume.pdf", "application/pdf"),
        ]);
        assert_eq!(
            event,
            Some(UploadEvent::FileRejected(ValidationError::UnsupportedType {
                media_type: "image/png".to_string()
            }))
        );
    }

    #[test]
    fn test_empty_picker_change_yields_nothing() {
        assert_eq!(SelectionController::new().files_offered(Vec::new()), None);
    }
}
