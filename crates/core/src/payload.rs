//! Transferable task payloads.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Errors that can occur while encoding or decoding a task payload.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    /// The task has no serialized form
    #[error("Task {0} cannot be transferred to another process")]
    NotTransferable(String),

    /// No task is registered under this kind
    #[error("Unknown task kind: {0}")]
    UnknownKind(String),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialized task, tagged with the kind used to decode it again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskPayload {
    /// Task kind
    pub kind: String,

    /// Task fields
    pub body: serde_json::Value,
}

impl TaskPayload {
    /// Encode `task` under `kind`.
    pub fn new<T: Serialize>(kind: impl Into<String>, task: &T) -> Result<Self, PayloadError> {
        Ok(Self {
            kind: kind.into(),
            body: serde_json::to_value(task)?,
        })
    }

    /// Decode the body back into a concrete task.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, PayloadError> {
        Ok(serde_json::from_value(self.body.clone())?)
    }

    /// Render as a single-line JSON document.
    pub fn to_json(&self) -> Result<String, PayloadError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a JSON document produced by [`TaskPayload::to_json`].
    pub fn from_json(s: &str) -> Result<Self, PayloadError> {
        Ok(serde_json::from_str(s)?)
    }
}
