//! Job files.

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// One OS thread per task
    Thread,
    /// One OS process per task
    Process,
}

/// A batch of work described in JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobConfig {
    /// Backend running the tasks
    #[serde(default = "default_backend")]
    pub backend: BackendKind,

    /// Prefix of task names
    #[serde(default = "default_prefix")]
    pub name_prefix: String,

    /// Where tasks come from
    pub source: JobSource,
}

/// Task source of a job.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JobSource {
    /// One message task per entry
    Messages {
        /// Messages to print
        messages: Vec<String>,
        /// Delay between start and completion lines
        #[serde(default = "default_delay_ms")]
        delay_ms: u64,
        /// File receiving the output lines instead of stdout
        #[serde(default)]
        log: Option<PathBuf>,
    },
    /// One brightness task per image in a directory
    Images {
        /// Directory scanned for images
        source_dir: PathBuf,
        /// Directory receiving the results
        destination_dir: PathBuf,
        /// Accepted file name suffixes
        #[serde(default = "default_extensions")]
        extensions: Vec<String>,
        /// Brightness factor
        #[serde(default = "default_brightness")]
        brightness: f32,
    },
}

fn default_backend() -> BackendKind {
    BackendKind::Thread
}

fn default_prefix() -> String {
    "Task".to_string()
}

fn default_delay_ms() -> u64 {
    taskwork_tasks::message::DEFAULT_DELAY.as_millis() as u64
}

fn default_extensions() -> Vec<String> {
    taskwork_tasks::image::DEFAULT_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_brightness() -> f32 {
    taskwork_tasks::image::DEFAULT_BRIGHTNESS
}

impl JobConfig {
    /// Load a job file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse a job document.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}
