//! The unit of work.

use crate::{PayloadError, TaskPayload};
use std::fmt;

/// Index given to the first task a factory produces.
pub const FIRST_TASK_INDEX: usize = 1;

/// Name for the task at `position` (0-based) in a factory batch.
///
/// ```
/// assert_eq!(taskwork_core::task_name("Example", 0), "Example-1");
/// ```
pub fn task_name(prefix: &str, position: usize) -> String {
    format!("{}-{}", prefix, position + FIRST_TASK_INDEX)
}

/// A named unit of work.
///
/// Implementations keep their name fixed after construction. Errors returned
/// from [`Task::run`] are not handled by the task itself; the worker backend
/// running it decides how they surface.
pub trait Task: Send + Sync {
    /// Task name, used for diagnostics.
    fn name(&self) -> &str;

    /// Execute the task.
    fn run(&self) -> anyhow::Result<()>;

    /// Serialized form used to re-create this task inside a worker process.
    ///
    /// Tasks that only make sense in the caller's address space keep the
    /// default, which refuses the transfer.
    fn payload(&self) -> Result<TaskPayload, PayloadError> {
        Err(PayloadError::NotTransferable(self.name().to_string()))
    }
}

impl fmt::Debug for dyn Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Task: {}>", self.name())
    }
}
