//! Worker management.
//!
//! Runs tasks concurrently, one OS thread or OS process per task, and waits
//! for all of them to finish.

#![warn(missing_docs)]

pub mod backend;
pub mod manager;
pub mod process;
pub mod thread;

pub use backend::{AnyWorker, Backend, Worker, WorkerBackend, WorkerError};
pub use manager::{ManagerError, ProcessManager, ThreadManager, WorkerManager};
pub use process::{payload_from_env, ProcessBackend, ProcessWorker, TASK_ENV};
pub use thread::{ThreadBackend, ThreadWorker};
