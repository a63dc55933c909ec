//! Rebuilds tasks from payloads.

use crate::{AdjustBrightness, SendMessage};
use taskwork_core::{PayloadError, Task, TaskPayload};

/// Decode a payload produced by one of this crate's tasks.
pub fn decode(payload: &TaskPayload) -> Result<Box<dyn Task>, PayloadError> {
    match payload.kind.as_str() {
        SendMessage::KIND => Ok(Box::new(payload.decode::<SendMessage>()?)),
        AdjustBrightness::KIND => Ok(Box::new(payload.decode::<AdjustBrightness>()?)),
        other => Err(PayloadError::UnknownKind(other.to_string())),
    }
}
