//! Post-install command executor
//!
//! Runs one command line through a shell, streaming stdout and stderr into
//! the log stream line by line while the process runs.

use super::cancel::CancelToken;
use super::log::{LogLine, LogSink, LogSource};
use crate::error::{Error, Result};
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default shell interpreter
pub const DEFAULT_SHELL: &str = "sh";

/// Flag telling the shell to run its next argument as a command line
pub const DEFAULT_SHELL_FLAG: &str = "-c";

/// Shell command executor
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    shell: String,
    shell_flag: String,
}

impl CommandExecutor {
    /// Create an executor using `shell flag <command line>`
    pub fn new(shell: impl Into<String>, shell_flag: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
            shell_flag: shell_flag.into(),
        }
    }

    /// Run `command_line` in `working_dir`
    ///
    /// Returns once the process has exited and both output readers have
    /// drained their pipes. Fails on spawn errors, non-zero exit, or
    /// cancellation (the child is killed in that case).
    pub async fn execute(
        &self,
        command_line: &str,
        working_dir: &Path,
        sink: &LogSink,
        cancel: &CancelToken,
    ) -> Result<()> {
        sink.info(format!("Running: {}", command_line)).await;

        let mut cmd = Command::new(&self.shell);
        cmd.arg(&self.shell_flag)
            .arg(command_line)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(source) => {
                let err = Error::SpawnFailed { source };
                sink.info(err.to_string()).await;
                return Err(err);
            }
        };
        debug!("Spawned `{}` (pid {:?})", command_line, child.id());

        let mut stdout_reader = child
            .stdout
            .take()
            .map(|out| tokio::spawn(read_lines(out, sink.clone(), LogSource::Stdout)));
        let mut stderr_reader = child
            .stderr
            .take()
            .map(|err| tokio::spawn(read_lines(err, sink.clone(), LogSource::Stderr)));

        let waited = tokio::select! {
            status = child.wait() => Some(status),
            _ = cancel.cancelled() => None,
            _ = sink.closed() => None,
        };

        let status = match waited {
            Some(Ok(status)) => status,
            Some(Err(e)) => {
                abort_reader(stdout_reader);
                abort_reader(stderr_reader);
                sink.info(format!("Command failed: {}", e)).await;
                return Err(Error::Io(e));
            }
            None => {
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill `{}`: {}", command_line, e);
                }
                return Err(abandon(command_line, stdout_reader, stderr_reader, sink).await);
            }
        };

        // Process exit alone is not enough: wait until both pipes hit EOF.
        // Background jobs of the shell may hold them open, so keep watching
        // for cancellation while draining.
        let drained = tokio::select! {
            output = drain(&mut stdout_reader, &mut stderr_reader) => Some(output),
            _ = cancel.cancelled() => None,
            _ = sink.closed() => None,
        };
        let Some(output) = drained else {
            debug!("`{}` exited but its output is still open", command_line);
            return Err(abandon(command_line, stdout_reader, stderr_reader, sink).await);
        };

        if status.success() {
            sink.info(format!("Command completed: {}", command_line)).await;
            if !output.is_empty() {
                sink.info(format!("Command output:\n{}", output)).await;
            }
            Ok(())
        } else {
            let err = Error::command_failed(command_line, describe_status(status));
            sink.info(err.to_string()).await;
            if !output.is_empty() {
                sink.info(format!("Output:\n{}", output)).await;
            }
            Err(err)
        }
    }
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL, DEFAULT_SHELL_FLAG)
    }
}

/// Forward every line of `stream` to the sink, returning the lines it saw
/// in display form for the combined output summary.
async fn read_lines<R>(stream: R, sink: LogSink, source: LogSource) -> Vec<String>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    let mut seen = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                while matches!(buf.last(), Some(b'\n' | b'\r')) {
                    buf.pop();
                }
                let line = LogLine {
                    text: String::from_utf8_lossy(&buf).into_owned(),
                    source,
                };
                seen.push(line.to_string());
                sink.send(line).await;
            }
            Err(e) => {
                warn!("Error reading {:?} stream: {}", source, e);
                break;
            }
        }
    }

    seen
}

/// Join both readers and combine their lines, stdout first
async fn drain(
    stdout: &mut Option<JoinHandle<Vec<String>>>,
    stderr: &mut Option<JoinHandle<Vec<String>>>,
) -> String {
    let mut output = join_reader(stdout).await;
    output.extend(join_reader(stderr).await);
    output.join("\n")
}

async fn join_reader(reader: &mut Option<JoinHandle<Vec<String>>>) -> Vec<String> {
    match reader {
        Some(handle) => match handle.await {
            Ok(lines) => lines,
            Err(e) => {
                warn!("Output reader task failed: {}", e);
                Vec::new()
            }
        },
        None => Vec::new(),
    }
}

fn abort_reader(reader: Option<JoinHandle<Vec<String>>>) {
    if let Some(handle) = reader {
        handle.abort();
    }
}

/// Stop reading a cancelled command's output and report the cancellation
async fn abandon(
    command_line: &str,
    stdout_reader: Option<JoinHandle<Vec<String>>>,
    stderr_reader: Option<JoinHandle<Vec<String>>>,
    sink: &LogSink,
) -> Error {
    abort_reader(stdout_reader);
    abort_reader(stderr_reader);
    let err = Error::cancelled(command_line);
    sink.info(err.to_string()).await;
    err
}

/// Human-readable exit status, e.g. `exit code 1`
fn describe_status(status: ExitStatus) -> String {
    if let Some(code) = status.code() {
        return format!("exit code {}", code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return format!("signal {}", signal);
        }
    }

    status.to_string()
}
