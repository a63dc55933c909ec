//! Worker abstraction.

use crate::{ProcessBackend, ProcessWorker, ThreadBackend, ThreadWorker};
use std::sync::Arc;
use taskwork_core::{PayloadError, Task};

/// Errors reported by a single worker handle.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// The backend could not launch the worker
    #[error("Failed to spawn worker {name}: {source}")]
    Spawn {
        /// Worker name
        name: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The task could not be shipped to the worker
    #[error("Failed to prepare worker {name}: {source}")]
    Payload {
        /// Worker name
        name: String,
        /// Underlying error
        #[source]
        source: PayloadError,
    },

    /// No payload was handed to this worker process
    #[error("No task payload in the environment: {0}")]
    MissingPayload(#[source] std::env::VarError),

    /// Waiting on the worker failed
    #[error("Failed to wait on worker {name}: {source}")]
    Wait {
        /// Worker name
        name: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The worker thread panicked
    #[error("Worker {name} panicked: {message}")]
    Panicked {
        /// Worker name
        name: String,
        /// Panic message
        message: String,
    },

    /// The task returned an error
    #[error("Task {name} failed: {message}")]
    TaskFailed {
        /// Worker name
        name: String,
        /// Error chain of the task
        message: String,
    },

    /// The worker process exited unsuccessfully
    #[error("Worker {name} exited with {status}")]
    Exited {
        /// Worker name
        name: String,
        /// Exit status
        status: std::process::ExitStatus,
    },

    /// Start called on a handle that was already started
    #[error("Worker {0} was already started")]
    AlreadyStarted(String),

    /// Join called on a handle that never started
    #[error("Worker {0} was never started")]
    NotStarted(String),

    /// Join called on a handle that was already joined
    #[error("Worker {0} was already joined")]
    AlreadyJoined(String),
}

/// A handle on one concurrent execution unit bound to one task.
///
/// A handle moves through created, started and joined exactly once.
pub trait Worker: Send {
    /// Name of the task this worker runs.
    fn name(&self) -> &str;

    /// Launch the worker without waiting for it.
    fn start(&mut self) -> Result<(), WorkerError>;

    /// Block until the worker has finished.
    fn join(&mut self) -> Result<(), WorkerError>;
}

/// Turns a task into a worker handle bound to a concurrency primitive.
pub trait WorkerBackend {
    /// Handle type produced by this backend.
    type Worker: Worker;

    /// Allocate a worker for `task`. The worker is not started.
    fn create_worker(&self, task: Arc<dyn Task>) -> Self::Worker;
}

/// Backends available at runtime.
#[derive(Debug, Clone)]
pub enum Backend {
    /// One OS thread per task
    Thread(ThreadBackend),
    /// One OS process per task
    Process(ProcessBackend),
}

impl Backend {
    /// Short backend name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Thread(_) => "thread",
            Backend::Process(_) => "process",
        }
    }
}

impl From<ThreadBackend> for Backend {
    fn from(backend: ThreadBackend) -> Self {
        Self::Thread(backend)
    }
}

impl From<ProcessBackend> for Backend {
    fn from(backend: ProcessBackend) -> Self {
        Self::Process(backend)
    }
}

/// Worker produced by [`Backend`].
#[derive(Debug)]
pub enum AnyWorker {
    /// Thread-backed worker
    Thread(ThreadWorker),
    /// Process-backed worker
    Process(ProcessWorker),
}

impl Worker for AnyWorker {
    fn name(&self) -> &str {
        match self {
            Self::Thread(w) => w.name(),
            Self::Process(w) => w.name(),
        }
    }

    fn start(&mut self) -> Result<(), WorkerError> {
        match self {
            Self::Thread(w) => w.start(),
            Self::Process(w) => w.start(),
        }
    }

    fn join(&mut self) -> Result<(), WorkerError> {
        match self {
            Self::Thread(w) => w.join(),
            Self::Process(w) => w.join(),
        }
    }
}

impl WorkerBackend for Backend {
    type Worker = AnyWorker;

    fn create_worker(&self, task: Arc<dyn Task>) -> AnyWorker {
        match self {
            Self::Thread(b) => AnyWorker::Thread(b.create_worker(task)),
            Self::Process(b) => AnyWorker::Process(b.create_worker(task)),
        }
    }
}
