//! The worker manager - starts every worker, then waits for every worker.

use crate::{ProcessBackend, ThreadBackend, Worker, WorkerBackend};
use std::sync::Arc;
use taskwork_core::Task;
use tracing::{debug, error, info};

/// Misuse of the manager lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ManagerError {
    /// Workers were already launched
    #[error("Workers were already started")]
    AlreadyStarted,

    /// Workers were already waited on
    #[error("Workers were already waited on")]
    AlreadyFinished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Started,
    Finished,
}

/// Owns one worker per added task and drives them through start and join.
///
/// Failures of individual workers are logged and skipped: one worker failing
/// to start or to join never keeps the others from being started or joined.
/// A manager runs its batch once.
pub struct WorkerManager<B: WorkerBackend> {
    backend: B,
    workers: Vec<B::Worker>,
    phase: Phase,
}

/// Manager running each task on an OS thread.
pub type ThreadManager = WorkerManager<ThreadBackend>;

/// Manager running each task in an OS process.
pub type ProcessManager = WorkerManager<ProcessBackend>;

impl<B: WorkerBackend> WorkerManager<B> {
    /// Create an empty manager.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            workers: Vec::new(),
            phase: Phase::Idle,
        }
    }

    /// Bind a task to a new worker. The worker is not started.
    pub fn add_task(&mut self, task: Arc<dyn Task>) -> Result<(), ManagerError> {
        self.ensure_idle()?;
        debug!("Adding worker for {:?}", task);
        self.workers.push(self.backend.create_worker(task));
        Ok(())
    }

    /// Add every task of a batch, in order.
    pub fn add_tasks<T, I>(&mut self, tasks: I) -> Result<(), ManagerError>
    where
        T: Task + 'static,
        I: IntoIterator<Item = T>,
    {
        for task in tasks {
            self.add_task(Arc::new(task))?;
        }
        Ok(())
    }

    /// Number of workers.
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Whether no task was added.
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Start every worker in insertion order without waiting for any.
    pub fn start_all(&mut self) -> Result<(), ManagerError> {
        self.ensure_idle()?;
        self.phase = Phase::Started;

        info!("Starting {} workers", self.workers.len());
        for worker in &mut self.workers {
            if let Err(e) = worker.start() {
                error!("Error starting worker {}: {}", worker.name(), e);
            }
        }

        Ok(())
    }

    /// Wait for every worker in insertion order.
    pub fn wait_all(&mut self) -> Result<(), ManagerError> {
        if self.phase == Phase::Finished {
            return Err(ManagerError::AlreadyFinished);
        }
        self.phase = Phase::Finished;

        for worker in &mut self.workers {
            if let Err(e) = worker.join() {
                error!("Error joining worker {}: {}", worker.name(), e);
            }
        }

        info!("All {} workers finished", self.workers.len());
        Ok(())
    }

    /// Start all workers, then wait for all of them.
    pub fn run(&mut self) -> Result<(), ManagerError> {
        self.start_all()?;
        self.wait_all()
    }

    fn ensure_idle(&self) -> Result<(), ManagerError> {
        match self.phase {
            Phase::Idle => Ok(()),
            Phase::Started => Err(ManagerError::AlreadyStarted),
            Phase::Finished => Err(ManagerError::AlreadyFinished),
        }
    }
}

impl Default for ThreadManager {
    fn default() -> Self {
        Self::new(ThreadBackend::default())
    }
}
