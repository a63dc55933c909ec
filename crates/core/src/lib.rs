//! Taskwork core contracts.
//!
//! This crate defines what a unit of work is ([`Task`]), how batches of work
//! are produced ([`TaskFactory`]), and the serialized form a task takes when it
//! has to cross a process boundary ([`TaskPayload`]).

#![warn(missing_docs)]

mod factory;
mod payload;
mod task;

pub use factory::{FactoryError, TaskFactory};
pub use payload::{PayloadError, TaskPayload};
pub use task::{task_name, Task, FIRST_TASK_INDEX};
