//! Subprocess execution.
//!
//! Commands are spawned directly from an argv list rather than through a
//! shell, so package specs such as tarball URLs reach the package manager as
//! a single argument.

use crate::error::{AutodepError, Result};
use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// How often a timed command is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// A program plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable name or path.
    pub program: String,
    /// Arguments passed verbatim.
    pub args: Vec<String>,
}

impl Invocation {
    /// Create an invocation from a program and its arguments.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output (empty unless captured).
    pub stdout: String,

    /// Standard error (empty unless captured).
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    fn from_status(status: ExitStatus, stdout: String, stderr: String, start: Instant) -> Self {
        let duration = start.elapsed();
        if status.success() {
            Self::success(stdout, stderr, duration)
        } else {
            Self::failure(status.code(), stdout, stderr, duration)
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables layered over the inherited process environment.
    pub env: HashMap<String, String>,

    /// Inherited variables to drop before `env` is applied.
    pub env_remove: Vec<String>,

    /// Capture stdout (if false, inherits from parent).
    pub capture_stdout: bool,

    /// Capture stderr (if false, inherits from parent).
    pub capture_stderr: bool,

    /// Timeout in seconds (None = no timeout).
    pub timeout: Option<u64>,
}

/// Execute a command, blocking until it exits.
///
/// Uncaptured streams are forwarded live to the parent's console. With a
/// timeout set, the child is killed once the limit passes and
/// [`AutodepError::CommandTimedOut`] is returned.
pub fn execute(invocation: &Invocation, options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();
    let mut cmd = build_command(invocation, options);

    let mut child = cmd.spawn().map_err(|e| AutodepError::CommandFailed {
        command: invocation.to_string(),
        message: e.to_string(),
    })?;

    let stdout_handle = child.stdout.take().map(|s| thread::spawn(move || read_all(s)));
    let stderr_handle = child.stderr.take().map(|s| thread::spawn(move || read_all(s)));

    let status = match options.timeout {
        Some(seconds) => match wait_with_timeout(&mut child, Duration::from_secs(seconds))? {
            Some(status) => status,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(AutodepError::CommandTimedOut {
                    command: invocation.to_string(),
                    seconds,
                });
            }
        },
        None => child.wait().map_err(|e| AutodepError::CommandFailed {
            command: invocation.to_string(),
            message: e.to_string(),
        })?,
    };

    let stdout = stdout_handle
        .map(|h| h.join().unwrap_or_default())
        .unwrap_or_default();
    let stderr = stderr_handle
        .map(|h| h.join().unwrap_or_default())
        .unwrap_or_default();

    Ok(CommandResult::from_status(status, stdout, stderr, start))
}

/// Execute a command and collect its output without echoing it.
pub fn execute_quiet(invocation: &Invocation, options: &CommandOptions) -> Result<CommandResult> {
    let options = CommandOptions {
        capture_stdout: true,
        capture_stderr: true,
        ..options.clone()
    };
    execute(invocation, &options)
}

fn build_command(invocation: &Invocation, options: &CommandOptions) -> Command {
    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for key in &options.env_remove {
        cmd.env_remove(key);
    }
    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    if options.capture_stdout {
        cmd.stdout(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit());
    }

    if options.capture_stderr {
        cmd.stderr(Stdio::piped());
    } else {
        cmd.stderr(Stdio::inherit());
    }

    cmd
}

fn wait_with_timeout(child: &mut Child, limit: Duration) -> Result<Option<ExitStatus>> {
    let deadline = Instant::now() + limit;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn read_all(mut stream: impl Read) -> String {
    let mut buf = Vec::new();
    let _ = stream.read_to_end(&mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}
