//! Taskwork CLI - run batches of tasks on threads or processes.

mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::{BackendKind, JobConfig, JobSource};
use std::path::PathBuf;
use std::time::Duration;
use taskwork_core::TaskFactory;
use taskwork_tasks::{ImageTaskFactory, MessageTaskFactory};
use taskwork_worker::{Backend, ProcessBackend, ThreadBackend, WorkerManager};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "taskwork")]
#[command(about = "Run batches of tasks on OS threads or OS processes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print timestamped messages, one task per message
    Messages {
        /// Messages to print
        #[arg(required = true)]
        messages: Vec<String>,
        /// Backend running the tasks
        #[arg(long, value_enum, default_value = "thread")]
        backend: BackendKind,
        /// Prefix of task names
        #[arg(long, default_value = "Example")]
        prefix: String,
        /// Delay between start and completion lines, in milliseconds
        #[arg(long, default_value = "2000")]
        delay_ms: u64,
        /// Append output lines to this file instead of stdout
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Adjust the brightness of every image in a directory
    Images {
        /// Directory scanned for images
        #[arg(long)]
        source: PathBuf,
        /// Directory receiving the results
        #[arg(long)]
        destination: PathBuf,
        /// Accepted file name suffixes
        #[arg(long = "ext", default_values = taskwork_tasks::image::DEFAULT_EXTENSIONS)]
        extensions: Vec<String>,
        /// Brightness factor
        #[arg(long, default_value = "0.5")]
        brightness: f32,
        /// Backend running the tasks
        #[arg(long, value_enum, default_value = "process")]
        backend: BackendKind,
        /// Prefix of task names
        #[arg(long, default_value = "Task")]
        prefix: String,
    },
    /// Run a JSON job file
    Run {
        /// Job file
        #[arg(long)]
        config: PathBuf,
    },
    /// Run the task handed over by a parent process
    #[command(hide = true)]
    Worker,
}

fn init_logging() {
    // Task output goes to stdout; keep logs out of its way.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Messages {
            messages,
            backend,
            prefix,
            delay_ms,
            log,
        } => {
            let mut factory =
                MessageTaskFactory::new(messages).with_delay(Duration::from_millis(delay_ms));
            if let Some(path) = log {
                factory = factory.with_log(path);
            }
            execute(&factory, &prefix, backend)?;
        }
        Commands::Images {
            source,
            destination,
            extensions,
            brightness,
            backend,
            prefix,
        } => {
            let factory = ImageTaskFactory::new(source, destination, extensions)
                .with_brightness(brightness);
            execute(&factory, &prefix, backend)?;
        }
        Commands::Run { config } => {
            let job = JobConfig::load(&config)?;
            info!("Loaded job from {}", config.display());
            run_job(job)?;
        }
        Commands::Worker => {
            let payload = taskwork_worker::payload_from_env()?;
            let task = taskwork_tasks::decode(&payload)?;
            info!("Worker process {} running {:?}", std::process::id(), task);
            task.run()?;
        }
    }

    Ok(())
}

fn run_job(job: JobConfig) -> Result<()> {
    match job.source {
        JobSource::Messages {
            messages,
            delay_ms,
            log,
        } => {
            let mut factory =
                MessageTaskFactory::new(messages).with_delay(Duration::from_millis(delay_ms));
            if let Some(path) = log {
                factory = factory.with_log(path);
            }
            execute(&factory, &job.name_prefix, job.backend)
        }
        JobSource::Images {
            source_dir,
            destination_dir,
            extensions,
            brightness,
        } => {
            let factory = ImageTaskFactory::new(source_dir, destination_dir, extensions)
                .with_brightness(brightness);
            execute(&factory, &job.name_prefix, job.backend)
        }
    }
}

fn build_backend(kind: BackendKind) -> Result<Backend> {
    Ok(match kind {
        BackendKind::Thread => ThreadBackend::new().into(),
        BackendKind::Process => ProcessBackend::current_exe()?.into(),
    })
}

/// Create the factory's tasks and run them all to completion.
fn execute<F: TaskFactory>(factory: &F, prefix: &str, kind: BackendKind) -> Result<()> {
    let tasks = factory.create_tasks(prefix)?;
    if tasks.is_empty() {
        info!("No tasks to run");
        return Ok(());
    }

    let backend = build_backend(kind)?;
    info!("Running {} tasks on the {} backend", tasks.len(), backend.as_str());

    let mut manager = WorkerManager::new(backend);
    manager.add_tasks(tasks)?;
    manager.run()?;

    Ok(())
}
