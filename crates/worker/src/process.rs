//! Process-backed workers.
//!
//! A process worker re-creates its task in a child process from the task's
//! [`TaskPayload`], which travels as JSON in the [`TASK_ENV`] environment
//! variable. The child program is expected to call [`payload_from_env`],
//! rebuild the task and run it, exiting non-zero on failure.

use crate::{Worker, WorkerBackend, WorkerError};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Child, Command};
use std::sync::Arc;
use taskwork_core::{Task, TaskPayload};
use tracing::debug;

/// Environment variable carrying the serialized task into the child.
pub const TASK_ENV: &str = "TASKWORK_TASK";

/// Argument selecting the worker entrypoint of the `taskwork` binary.
const WORKER_ARG: &str = "worker";

/// Runs each task in its own OS process.
///
/// Children share no memory with the caller: only side effects such as file
/// writes or console output are visible to the parent.
#[derive(Debug, Clone)]
pub struct ProcessBackend {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ProcessBackend {
    /// Launch workers with `program` and no extra arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Launch workers by re-running the current executable's worker entrypoint.
    pub fn current_exe() -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_exe()?).arg(WORKER_ARG))
    }

    /// Append an argument passed to every worker process.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl WorkerBackend for ProcessBackend {
    type Worker = ProcessWorker;

    fn create_worker(&self, task: Arc<dyn Task>) -> ProcessWorker {
        let mut command = Command::new(&self.program);
        command.args(&self.args);

        ProcessWorker {
            name: task.name().to_string(),
            command,
            state: ProcessState::Created(task),
        }
    }
}

#[derive(Debug)]
enum ProcessState {
    Created(Arc<dyn Task>),
    Running(Child),
    /// Launch failed; nothing to wait on.
    Failed,
    Joined,
}

/// Worker handle for one child process.
#[derive(Debug)]
pub struct ProcessWorker {
    name: String,
    command: Command,
    state: ProcessState,
}

impl ProcessWorker {
    fn encode(&self, task: &dyn Task) -> Result<String, WorkerError> {
        task.payload()
            .and_then(|payload| payload.to_json())
            .map_err(|source| WorkerError::Payload {
                name: self.name.clone(),
                source,
            })
    }
}

impl Worker for ProcessWorker {
    fn name(&self) -> &str {
        &self.name
    }

    fn start(&mut self) -> Result<(), WorkerError> {
        let task = match std::mem::replace(&mut self.state, ProcessState::Failed) {
            ProcessState::Created(task) => task,
            other => {
                self.state = other;
                return Err(WorkerError::AlreadyStarted(self.name.clone()));
            }
        };

        let payload = self.encode(task.as_ref())?;
        self.command.env(TASK_ENV, payload);

        let child = self.command.spawn().map_err(|source| WorkerError::Spawn {
            name: self.name.clone(),
            source,
        })?;

        debug!("Started process {} for {}", child.id(), self.name);
        self.state = ProcessState::Running(child);
        Ok(())
    }

    fn join(&mut self) -> Result<(), WorkerError> {
        let mut child = match std::mem::replace(&mut self.state, ProcessState::Joined) {
            ProcessState::Running(child) => child,
            ProcessState::Joined => return Err(WorkerError::AlreadyJoined(self.name.clone())),
            other => {
                self.state = other;
                return Err(WorkerError::NotStarted(self.name.clone()));
            }
        };

        let status = child.wait().map_err(|source| WorkerError::Wait {
            name: self.name.clone(),
            source,
        })?;

        if status.success() {
            debug!("Joined process for {}", self.name);
            Ok(())
        } else {
            Err(WorkerError::Exited {
                name: self.name.clone(),
                status,
            })
        }
    }
}

/// Read the task payload handed to this process by a [`ProcessBackend`].
pub fn payload_from_env() -> Result<TaskPayload, WorkerError> {
    let raw = std::env::var(TASK_ENV).map_err(WorkerError::MissingPayload)?;

    TaskPayload::from_json(&raw).map_err(|source| WorkerError::Payload {
        name: TASK_ENV.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskwork_core::PayloadError;

    struct Local;

    impl Task for Local {
        fn name(&self) -> &str {
            "local"
        }

        fn run(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    struct Shipped;

    impl Task for Shipped {
        fn name(&self) -> &str {
            "shipped"
        }

        fn run(&self) -> anyhow::Result<()> {
            Ok(())
        }

        fn payload(&self) -> Result<TaskPayload, PayloadError> {
            TaskPayload::new("shipped", &"shipped")
        }
    }

    #[test]
    fn test_current_exe_targets_worker_entrypoint() {
        let backend = ProcessBackend::current_exe().unwrap();
        assert_eq!(backend.args, vec![OsString::from(WORKER_ARG)]);
    }

    #[test]
    fn test_task_without_payload_fails_to_start() {
        let mut worker = ProcessBackend::new("true").create_worker(Arc::new(Local));

        assert!(matches!(
            worker.start(),
            Err(WorkerError::Payload {
                source: PayloadError::NotTransferable(_),
                ..
            })
        ));
        assert!(matches!(worker.join(), Err(WorkerError::NotStarted(_))));
    }

    #[test]
    fn test_missing_program_fails_to_start() {
        let mut worker =
            ProcessBackend::new("/nonexistent/taskwork-worker").create_worker(Arc::new(Shipped));

        assert!(matches!(worker.start(), Err(WorkerError::Spawn { .. })));
        assert!(matches!(worker.join(), Err(WorkerError::NotStarted(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_status_is_reported_at_join() {
        let mut ok = ProcessBackend::new("true").create_worker(Arc::new(Shipped));
        ok.start().unwrap();
        ok.join().unwrap();

        let mut failed = ProcessBackend::new("false").create_worker(Arc::new(Shipped));
        failed.start().unwrap();
        assert!(matches!(failed.join(), Err(WorkerError::Exited { .. })));
        assert!(matches!(failed.join(), Err(WorkerError::AlreadyJoined(_))));
    }
}
