//! Message tasks.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use taskwork_core::{task_name, FactoryError, PayloadError, Task, TaskFactory, TaskPayload};

/// Delay between the start and completion lines of a message task.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

/// Prints a start line, waits, then prints a completion line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMessage {
    name: String,
    message: String,
    delay: Duration,
    /// Append lines here instead of stdout
    log: Option<PathBuf>,
}

impl SendMessage {
    /// Payload kind.
    pub const KIND: &'static str = "message";

    /// Create a task with the default delay.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            delay: DEFAULT_DELAY,
            log: None,
        }
    }

    /// Set the delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Append output lines to a file.
    pub fn with_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.log = Some(path.into());
        self
    }

    /// Message text.
    pub fn message(&self) -> &str {
        &self.message
    }

    fn emit(&self, stage: &str) -> std::io::Result<()> {
        let line = format!(
            "[{}] {} - {}: {}\n",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.6f"),
            self.name,
            stage,
            self.message
        );

        // One write per line so concurrent workers never interleave within a line.
        match &self.log {
            Some(path) => std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?
                .write_all(line.as_bytes()),
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(line.as_bytes())?;
                stdout.flush()
            }
        }
    }
}

impl Task for SendMessage {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self) -> anyhow::Result<()> {
        self.emit("Starting")?;
        std::thread::sleep(self.delay);
        self.emit("Complete")?;
        Ok(())
    }

    fn payload(&self) -> Result<TaskPayload, PayloadError> {
        TaskPayload::new(Self::KIND, self)
    }
}

/// One [`SendMessage`] per configured message, in order.
#[derive(Debug, Clone)]
pub struct MessageTaskFactory {
    messages: Vec<String>,
    delay: Duration,
    log: Option<PathBuf>,
}

impl MessageTaskFactory {
    /// Create a factory over `messages`.
    pub fn new<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            messages: messages.into_iter().map(Into::into).collect(),
            delay: DEFAULT_DELAY,
            log: None,
        }
    }

    /// Set the delay of every produced task.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Make every produced task append to `path`.
    pub fn with_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.log = Some(path.into());
        self
    }
}

impl TaskFactory for MessageTaskFactory {
    type Task = SendMessage;

    fn create_tasks(&self, name_prefix: &str) -> Result<Vec<SendMessage>, FactoryError> {
        Ok(self
            .messages
            .iter()
            .enumerate()
            .map(|(i, message)| SendMessage {
                name: task_name(name_prefix, i),
                message: message.clone(),
                delay: self.delay,
                log: self.log.clone(),
            })
            .collect())
    }
}
