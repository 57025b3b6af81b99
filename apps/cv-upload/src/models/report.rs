use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result returned by the remote scorer. Stored and forwarded as-is; the
/// client never looks inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisReport(Value);

impl AnalysisReport {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    pub fn into_json(self) -> Value {
        self.0
    }
}

impl From<Value> for AnalysisReport {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
