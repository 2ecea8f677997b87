//! Log stream types shared by the engine, the executor and consumers.

use std::fmt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Marker prefixed to standard-error lines in their display form
pub const STDERR_MARKER: &str = "ERR: ";

/// Where a log line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogSource {
    /// Progress reported by the engine or executor
    Info,
    /// Standard output of the running command
    Stdout,
    /// Standard error of the running command
    Stderr,
}

/// One line of progress output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub text: String,
    pub source: LogSource,
}

impl LogLine {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: LogSource::Info,
        }
    }

    pub fn stdout(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: LogSource::Stdout,
        }
    }

    pub fn stderr(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: LogSource::Stderr,
        }
    }

    pub fn is_stderr(&self) -> bool {
        self.source == LogSource::Stderr
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            LogSource::Stderr => write!(f, "{}{}", STDERR_MARKER, self.text),
            LogSource::Info | LogSource::Stdout => f.write_str(&self.text),
        }
    }
}

/// The step a failed run stopped at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailedStep {
    CreateProjectDir,
    WriteFile { index: usize, path: String },
    RunCommand { index: usize, command: String },
}

impl fmt::Display for FailedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateProjectDir => f.write_str("creating project directory"),
            Self::WriteFile { path, .. } => write!(f, "writing {}", path),
            Self::RunCommand { command, .. } => write!(f, "running `{}`", command),
        }
    }
}

/// How a bootstrap run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed {
        step: Option<FailedStep>,
        message: String,
    },
    Cancelled,
}

impl Outcome {
    pub fn failed(step: FailedStep, message: impl Into<String>) -> Self {
        Self::Failed {
            step: Some(step),
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Item carried by the log stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    Log(LogLine),
    /// Always the last event before the stream closes
    Finished(Outcome),
}

/// Producer side of the log stream
///
/// Cheap to clone; the executor hands one clone to each output reader.
#[derive(Debug, Clone)]
pub struct LogSink {
    tx: mpsc::Sender<RunEvent>,
}

impl LogSink {
    pub(crate) fn new(tx: mpsc::Sender<RunEvent>) -> Self {
        Self { tx }
    }

    /// Send a line; a consumer that went away is not an error here
    pub async fn send(&self, line: LogLine) {
        tracing::debug!("{}", line);
        let _ = self.tx.send(RunEvent::Log(line)).await;
    }

    pub async fn info(&self, text: impl Into<String>) {
        self.send(LogLine::info(text)).await;
    }

    pub(crate) async fn finish(&self, outcome: Outcome) {
        let _ = self.tx.send(RunEvent::Finished(outcome)).await;
    }

    /// Whether the consumer dropped its end of the stream
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Resolves once the consumer drops its end of the stream
    pub async fn closed(&self) {
        self.tx.closed().await;
    }
}

/// Lines and outcome of a finished run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub lines: Vec<LogLine>,
    pub outcome: Outcome,
}

impl RunReport {
    /// Display form of every line, stderr lines carrying the `ERR: ` marker
    pub fn texts(&self) -> Vec<String> {
        self.lines.iter().map(ToString::to_string).collect()
    }
}

/// Result of a non-blocking poll of the log stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Polled {
    Event(RunEvent),
    /// Nothing buffered yet
    Empty,
    /// The run is over and every event has been read
    Closed,
}

/// Consumer side of the log stream
#[derive(Debug)]
pub struct LogStream {
    rx: mpsc::Receiver<RunEvent>,
    task: Option<JoinHandle<()>>,
}

impl LogStream {
    pub(crate) fn new(rx: mpsc::Receiver<RunEvent>, task: JoinHandle<()>) -> Self {
        Self {
            rx,
            task: Some(task),
        }
    }

    /// Wait for the next event; `None` once the run is over
    pub async fn next(&mut self) -> Option<RunEvent> {
        self.rx.recv().await
    }

    /// Non-blocking poll for a front end that redraws on a timer
    pub fn try_next(&mut self) -> Polled {
        match self.rx.try_recv() {
            Ok(event) => Polled::Event(event),
            Err(mpsc::error::TryRecvError::Empty) => Polled::Empty,
            Err(mpsc::error::TryRecvError::Disconnected) => Polled::Closed,
        }
    }

    /// Stop consuming and hand back the engine task
    ///
    /// The engine treats the closed stream as a cancellation, so the task
    /// winds down on its own; awaiting it waits for the kill to finish.
    pub fn detach(self) -> Option<JoinHandle<()>> {
        let Self { rx, task } = self;
        drop(rx);
        task
    }

    /// Drain the stream to completion
    pub async fn collect(mut self) -> RunReport {
        let mut lines = Vec::new();
        let mut outcome = None;

        while let Some(event) = self.rx.recv().await {
            match event {
                RunEvent::Log(line) => lines.push(line),
                RunEvent::Finished(o) => outcome = Some(o),
            }
        }

        let task_error = match self.task.take() {
            Some(task) => task.await.err().map(|e| e.to_string()),
            None => None,
        };

        let outcome = outcome.unwrap_or_else(|| Outcome::Failed {
            step: None,
            message: task_error.unwrap_or_else(|| "log stream closed unexpectedly".to_string()),
        });

        RunReport { lines, outcome }
    }
}
