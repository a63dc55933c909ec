//! Task factories.

use crate::Task;
use std::path::PathBuf;

/// Errors that can occur while producing a batch of tasks.
#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    /// The data source could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Location being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Produces an ordered batch of tasks from its configuration.
///
/// Tasks are named with [`crate::task_name`], so the `i`-th task of a batch is
/// `"{name_prefix}-{i + 1}"`. The batch is empty, not an error, when there is
/// nothing to do.
pub trait TaskFactory {
    /// Concrete task type produced.
    type Task: Task + 'static;

    /// Create the tasks, in generation order.
    fn create_tasks(&self, name_prefix: &str) -> Result<Vec<Self::Task>, FactoryError>;
}
