//! Test utilities and mocks for propcc unit tests.
//!
//! Provides a mock [`Toolchain`] that records the commands it receives and
//! replays a canned result, plus fixtures for building library repositories
//! on disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use propcc::test_support::{MockToolchain, RepoFixture};
//!
//! #[test]
//! fn test_example() {
//!     let repo = RepoFixture::new();
//!     repo.library("libservo", "servo", "", None);
//!
//!     let toolchain = MockToolchain::success().writes_artifact(b"\x7fELF");
//!     // Run a compile against `repo.root()` with `toolchain`...
//! }
//! ```

pub mod fixtures;

use std::path::PathBuf;
use std::sync::Mutex;

pub use fixtures::*;

use crate::builder::toolchain::{CommandSpec, Toolchain, ToolchainError, ToolchainOutput};

/// What a [`MockToolchain`] does when invoked.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return the given output.
    Output(ToolchainOutput),
    /// Fail as if the executable did not exist.
    NotFound,
    /// Fail as if the wait bound expired.
    Timeout,
}

/// Mock toolchain for testing compile orchestration without a compiler.
#[derive(Debug)]
pub struct MockToolchain {
    behavior: MockBehavior,
    artifact: Option<Vec<u8>>,
    remove_artifact: bool,
    calls: Mutex<Vec<MockCall>>,
}

/// One recorded invocation.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub command: CommandSpec,
    /// Files present in the working directory at invocation time
    pub workdir_files: Vec<String>,
}

impl MockToolchain {
    fn with_behavior(behavior: MockBehavior) -> Self {
        MockToolchain {
            behavior,
            artifact: None,
            remove_artifact: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Exit status 0 with empty streams.
    pub fn success() -> Self {
        Self::with_output(0, "", "")
    }

    /// Return a specific status and streams.
    pub fn with_output(status: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::with_behavior(MockBehavior::Output(ToolchainOutput {
            status: Some(status),
            stdout: stdout.into(),
            stderr: stderr.into(),
        }))
    }

    pub fn not_found() -> Self {
        Self::with_behavior(MockBehavior::NotFound)
    }

    pub fn timeout() -> Self {
        Self::with_behavior(MockBehavior::Timeout)
    }

    /// Write `bytes` to the `-o` path on every invocation.
    pub fn writes_artifact(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.artifact = Some(bytes.into());
        self
    }

    /// Delete the `-o` path on every invocation, as a compiler that
    /// reports success but leaves no output would.
    pub fn removes_artifact(mut self) -> Self {
        self.remove_artifact = true;
        self
    }

    /// All recorded invocations.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }
}

impl Toolchain for MockToolchain {
    fn invoke(&self, command: &CommandSpec) -> Result<ToolchainOutput, ToolchainError> {
        let workdir_files = command
            .cwd
            .as_ref()
            .and_then(|dir| std::fs::read_dir(dir).ok())
            .map(|entries| {
                let mut names: Vec<String> = entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect();
                names.sort();
                names
            })
            .unwrap_or_default();

        if let Ok(mut calls) = self.calls.lock() {
            calls.push(MockCall {
                command: command.clone(),
                workdir_files,
            });
        }

        match &self.behavior {
            MockBehavior::Output(output) => {
                if let Some(path) = output_path(command) {
                    if let Some(ref bytes) = self.artifact {
                        std::fs::write(&path, bytes).expect("mock artifact write");
                    }
                    if self.remove_artifact {
                        std::fs::remove_file(&path).expect("mock artifact removal");
                    }
                }
                Ok(output.clone())
            }
            MockBehavior::NotFound => Err(ToolchainError::NotFound {
                program: command.program.clone(),
            }),
            MockBehavior::Timeout => Err(ToolchainError::Timeout {
                program: command.program.clone(),
                seconds: 1,
            }),
        }
    }
}

/// The argument following `-o`.
pub fn output_path(command: &CommandSpec) -> Option<PathBuf> {
    command
        .args
        .iter()
        .position(|a| a == "-o")
        .and_then(|i| command.args.get(i + 1))
        .map(PathBuf::from)
}
