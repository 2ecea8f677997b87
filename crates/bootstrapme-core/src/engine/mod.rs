//! Asynchronous bootstrapping engine.
//!
//! A run creates the project directory, writes the preset's files with
//! placeholders substituted, then runs the post-install commands one after
//! another. Progress is reported through a [`LogStream`]; the last event is
//! always [`RunEvent::Finished`] carrying the run's [`Outcome`].
//!
//! ```no_run
//! use bootstrapme_core::engine::{BootstrapJob, Bootstrapper, CancelToken, RunEvent};
//! use bootstrapme_core::presets::Preset;
//!
//! # async fn example(preset: Preset) {
//! let job = BootstrapJob::new("demo", preset).unwrap();
//! let mut stream = Bootstrapper::default().start(job, CancelToken::new());
//!
//! while let Some(event) = stream.next().await {
//!     match event {
//!         RunEvent::Log(line) => println!("{}", line),
//!         RunEvent::Finished(outcome) => println!("done: {:?}", outcome),
//!     }
//! }
//! # }
//! ```

pub mod cancel;
pub mod executor;
pub mod log;
pub mod paths;

pub use cancel::CancelToken;
pub use executor::CommandExecutor;
pub use log::{
    FailedStep, LogLine, LogSink, LogSource, LogStream, Outcome, Polled, RunEvent, RunReport,
    STDERR_MARKER,
};

use crate::error::{Error, Result};
use crate::presets::Preset;
use crate::substitute::substitute;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Variable injected with the project directory's name
pub const PROJECT_NAME_VAR: &str = "project_name";

/// Variable injected with the username collected for the run
pub const USERNAME_VAR: &str = "username";

/// Default capacity of the log channel
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Shell interpreter used for post-install commands
    pub shell: String,
    /// Flag passing the command line to the shell
    pub shell_flag: String,
    /// Capacity of the bounded log channel
    pub channel_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            shell: executor::DEFAULT_SHELL.to_string(),
            shell_flag: executor::DEFAULT_SHELL_FLAG.to_string(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// State of one bootstrap run
#[derive(Debug, Clone)]
pub struct BootstrapJob {
    project_root: PathBuf,
    requested: PathBuf,
    preset: Preset,
}

impl BootstrapJob {
    /// Prepare a run of `preset` into `project`
    ///
    /// Relative project paths are resolved against the current directory.
    /// `project_name` is set to the last component of the path.
    pub fn new(project: impl AsRef<Path>, preset: Preset) -> Result<Self> {
        let project_root = std::path::absolute(project.as_ref())?;
        let project_name = project_root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| project.as_ref().display().to_string());

        let mut preset = preset;
        preset
            .variables
            .insert(PROJECT_NAME_VAR.to_string(), project_name);

        Ok(Self {
            project_root,
            requested: project.as_ref().to_path_buf(),
            preset,
        })
    }

    /// Inject the `username` variable
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.preset
            .variables
            .insert(USERNAME_VAR.to_string(), username.into());
        self
    }

    /// Absolute path of the project directory
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Project path as it was given, used in log lines
    pub fn requested_path(&self) -> &Path {
        &self.requested
    }

    /// Preset with the resolved variable map
    pub fn preset(&self) -> &Preset {
        &self.preset
    }

    pub fn variables(&self) -> &BTreeMap<String, String> {
        &self.preset.variables
    }
}

/// Bootstrap engine
#[derive(Debug, Clone, Default)]
pub struct Bootstrapper {
    config: EngineConfig,
}

impl Bootstrapper {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Start a run on its own task and return its log stream
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, job: BootstrapJob, cancel: CancelToken) -> LogStream {
        let (tx, rx) = mpsc::channel(self.config.channel_capacity.max(1));
        let sink = LogSink::new(tx);
        let executor = CommandExecutor::new(&self.config.shell, &self.config.shell_flag);

        let task = tokio::spawn(async move {
            let outcome = run_job(&job, &executor, &sink, &cancel).await;
            info!(
                "Bootstrap of {} finished: {:?}",
                job.project_root.display(),
                outcome
            );
            sink.finish(outcome).await;
        });

        LogStream::new(rx, task)
    }

    /// Run to completion and collect every line
    pub async fn run(&self, job: BootstrapJob, cancel: CancelToken) -> RunReport {
        self.start(job, cancel).collect().await
    }
}

/// Drive one job through its steps, stopping at the first failure
async fn run_job(
    job: &BootstrapJob,
    executor: &CommandExecutor,
    sink: &LogSink,
    cancel: &CancelToken,
) -> Outcome {
    let root = job.project_root();
    let preset = job.preset();
    let vars = job.variables();

    sink.info("Starting bootstrapping...").await;
    let requested = job.requested_path().display().to_string();
    sink.info(format!("Creating project directory: {}", requested))
        .await;
    debug!("Project root resolved to {}", root.display());
    if let Err(e) = create_dir_all(root).await {
        let err = Error::CreateProjectDir {
            path: requested,
            source: e,
        };
        sink.info(err.to_string()).await;
        return Outcome::failed(FailedStep::CreateProjectDir, err.to_string());
    }

    if !preset.files.is_empty() {
        sink.info("Writing project files...").await;
    }
    for (index, file) in preset.files.iter().enumerate() {
        if is_abandoned(sink, cancel) {
            return cancelled(sink).await;
        }

        if let Err(err) = write_file(root, &file.path, &file.content, vars).await {
            sink.info(err.to_string()).await;
            let step = FailedStep::WriteFile {
                index,
                path: file.path.clone(),
            };
            return Outcome::failed(step, err.to_string());
        }
        sink.info(format!("Created file: {}", file.path)).await;
    }

    if !preset.post_install_commands.is_empty() {
        sink.info("Running post-install commands...").await;
    }
    for (index, command) in preset.post_install_commands.iter().enumerate() {
        if is_abandoned(sink, cancel) {
            return cancelled(sink).await;
        }

        let command_line = substitute(command, vars);
        match executor.execute(&command_line, root, sink, cancel).await {
            Ok(()) if is_abandoned(sink, cancel) => return cancelled(sink).await,
            Ok(()) => {}
            Err(err) if err.is_cancelled() => return cancelled(sink).await,
            Err(err) => {
                let step = FailedStep::RunCommand {
                    index,
                    command: command_line,
                };
                return Outcome::failed(step, err.to_string());
            }
        }
    }

    debug!("All steps completed for {}", root.display());
    Outcome::Succeeded
}

fn is_abandoned(sink: &LogSink, cancel: &CancelToken) -> bool {
    cancel.is_cancelled() || sink.is_closed()
}

async fn cancelled(sink: &LogSink) -> Outcome {
    sink.info("Bootstrapping cancelled").await;
    Outcome::Cancelled
}

/// Write one template file below `root` with its placeholders substituted
async fn write_file(
    root: &Path,
    rel_path: &str,
    content: &str,
    vars: &BTreeMap<String, String>,
) -> Result<()> {
    let target = paths::resolve_within_root(root, rel_path)?;

    if let Some(parent) = target.parent() {
        create_dir_all(parent)
            .await
            .map_err(|source| Error::CreateParentDirs {
                path: rel_path.to_string(),
                source,
            })?;
    }

    let rendered = substitute(content, vars);
    write_new_file(&target, rendered.as_bytes())
        .await
        .map_err(|source| Error::WriteFile {
            path: rel_path.to_string(),
            source,
        })
}

async fn create_dir_all(path: &Path) -> std::io::Result<()> {
    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o755);
    builder.create(path).await
}

async fn write_new_file(path: &Path, data: &[u8]) -> std::io::Result<()> {
    use tokio::io::AsyncWriteExt;

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o644);

    let mut file = options.open(path).await?;
    file.write_all(data).await?;
    file.flush().await
}
