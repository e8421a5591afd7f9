//! Toolchain abstraction.
//!
//! Running the cross compiler is the only side-effecting step of a compile
//! request. It sits behind the [`Toolchain`] trait so the rest of the engine
//! can be exercised with a mock.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::util::process::{resolve_program, ProcessBuilder, ProcessError};

/// A command to execute, with program, arguments, and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// The program to run (e.g., "propeller-elf-gcc")
    pub program: PathBuf,
    /// Command arguments
    pub args: Vec<String>,
    /// Working directory
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    /// Create a new command spec.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Add an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(|a| a.into()));
        self
    }

    /// Run in the given directory.
    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Render as a shell-like string for logs.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Streams and status captured from a toolchain run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolchainOutput {
    /// Exit code; `None` when terminated by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolchainOutput {
    /// A run counts as successful only with exit status 0 and nothing on stderr.
    pub fn succeeded(&self) -> bool {
        self.status == Some(0) && self.stderr.is_empty()
    }
}

/// Error starting or waiting for the toolchain.
#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error("Compiler not found")]
    NotFound { program: PathBuf },

    #[error("Compiler timed out after {seconds}s")]
    Timeout { program: PathBuf, seconds: u64 },

    #[error("failed to run `{}`: {message}", program.display())]
    Io { program: PathBuf, message: String },
}

impl From<ProcessError> for ToolchainError {
    fn from(err: ProcessError) -> Self {
        match err {
            ProcessError::Spawn { program, .. } => ToolchainError::NotFound { program },
            ProcessError::TimedOut { program, timeout } => ToolchainError::Timeout {
                program,
                seconds: timeout.as_secs(),
            },
            ProcessError::Wait { program, source } => ToolchainError::Io {
                program,
                message: source.to_string(),
            },
        }
    }
}

/// Capability to run a compiler command.
pub trait Toolchain {
    /// Run `command` to completion and capture its output.
    fn invoke(&self, command: &CommandSpec) -> Result<ToolchainOutput, ToolchainError>;
}

/// Runs commands as real subprocesses.
#[derive(Debug, Clone, Default)]
pub struct ProcessToolchain {
    timeout: Option<Duration>,
}

impl ProcessToolchain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the wait for each command; `None` waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Toolchain for ProcessToolchain {
    fn invoke(&self, command: &CommandSpec) -> Result<ToolchainOutput, ToolchainError> {
        let program = resolve_program(&command.program);

        let mut process = ProcessBuilder::new(&program)
            .args(&command.args)
            .timeout(self.timeout);
        if let Some(ref cwd) = command.cwd {
            process = process.cwd(cwd);
        }

        tracing::debug!("running: {}", process.display_command());
        let output = process.exec()?;

        Ok(ToolchainOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
