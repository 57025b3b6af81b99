pub mod file;
pub mod report;

pub use file::{CandidateFile, ContentHandle};
pub use report::AnalysisReport;
