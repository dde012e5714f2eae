use parrot::Mock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Failed to read snapshot file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One recorded call, with its arguments rendered as debug strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSnapshot {
    pub operation: String,
    /// `null` for null arguments
    pub args: Vec<Option<String>>,
    #[serde(default = "default_stubbed")]
    pub stubbed: bool,
}

fn default_stubbed() -> bool {
    true
}

/// A mock's call history in a form that can be compared against JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub mock: String,
    pub calls: Vec<CallSnapshot>,
}

impl HistorySnapshot {
    pub fn capture(mock: &Mock) -> Self {
        let unstubbed: Vec<usize> = mock
            .unstubbed_calls()
            .iter()
            .map(|call| call.sequence())
            .collect();
        let calls = mock
            .calls()
            .iter()
            .map(|call| CallSnapshot {
                operation: call.operation().to_string(),
                args: call
                    .args()
                    .iter()
                    .map(|arg| arg.as_ref().map(|value| format!("{:?}", value)))
                    .collect(),
                stubbed: !unstubbed.contains(&call.sequence()),
            })
            .collect();
        Self {
            mock: mock.name().to_string(),
            calls,
        }
    }

    pub fn from_json(json: &Value) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_value(json.clone())?)
    }

    pub fn from_file(path: &Path) -> Result<Self, SnapshotError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn to_json(&self) -> Result<Value, SnapshotError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Panic with both histories when they differ.
    pub fn assert_matches(&self, expected: &HistorySnapshot) {
        assert!(
            self == expected,
            "call history mismatch\nexpected: {:?}\nactual:   {:?}",
            expected,
            self
        );
    }
}
