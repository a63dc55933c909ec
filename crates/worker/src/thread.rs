//! Thread-backed workers.

use crate::{Worker, WorkerBackend, WorkerError};
use std::any::Any;
use std::sync::Arc;
use std::thread::{Builder, JoinHandle};
use taskwork_core::Task;
use tracing::debug;

/// Runs each task on its own OS thread, sharing the caller's address space.
///
/// No synchronization is provided beyond start and join; tasks sharing state
/// bring their own locking.
#[derive(Debug, Clone, Default)]
pub struct ThreadBackend {
    stack_size: Option<usize>,
}

impl ThreadBackend {
    /// Create a backend using the platform's default stack size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stack size of spawned threads, in bytes.
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }
}

impl WorkerBackend for ThreadBackend {
    type Worker = ThreadWorker;

    fn create_worker(&self, task: Arc<dyn Task>) -> ThreadWorker {
        ThreadWorker {
            name: task.name().to_string(),
            stack_size: self.stack_size,
            state: ThreadState::Created(task),
        }
    }
}

#[derive(Debug)]
enum ThreadState {
    Created(Arc<dyn Task>),
    Running(JoinHandle<anyhow::Result<()>>),
    /// Spawn failed; nothing to join.
    Failed,
    Joined,
}

/// Worker handle for one thread.
#[derive(Debug)]
pub struct ThreadWorker {
    name: String,
    stack_size: Option<usize>,
    state: ThreadState,
}

impl Worker for ThreadWorker {
    fn name(&self) -> &str {
        &self.name
    }

    fn start(&mut self) -> Result<(), WorkerError> {
        let task = match std::mem::replace(&mut self.state, ThreadState::Failed) {
            ThreadState::Created(task) => task,
            other => {
                self.state = other;
                return Err(WorkerError::AlreadyStarted(self.name.clone()));
            }
        };

        // Thread names cannot hold NUL bytes; the task keeps its full name.
        let mut builder = Builder::new().name(self.name.replace('\0', ""));
        if let Some(bytes) = self.stack_size {
            builder = builder.stack_size(bytes);
        }

        let handle = builder
            .spawn(move || task.run())
            .map_err(|source| WorkerError::Spawn {
                name: self.name.clone(),
                source,
            })?;

        debug!("Started thread for {}", self.name);
        self.state = ThreadState::Running(handle);
        Ok(())
    }

    fn join(&mut self) -> Result<(), WorkerError> {
        let handle = match std::mem::replace(&mut self.state, ThreadState::Joined) {
            ThreadState::Running(handle) => handle,
            ThreadState::Joined => return Err(WorkerError::AlreadyJoined(self.name.clone())),
            other => {
                self.state = other;
                return Err(WorkerError::NotStarted(self.name.clone()));
            }
        };

        match handle.join() {
            Ok(Ok(())) => {
                debug!("Joined thread for {}", self.name);
                Ok(())
            }
            Ok(Err(e)) => Err(WorkerError::TaskFailed {
                name: self.name.clone(),
                message: format!("{:#}", e),
            }),
            Err(panic) => Err(WorkerError::Panicked {
                name: self.name.clone(),
                message: panic_message(panic.as_ref()),
            }),
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
