//! Implementation of `propcc compile`.

use std::collections::BTreeMap;

use anyhow::Context;
use serde::Serialize;
use thiserror::Error;

use crate::builder::artifact::{allocate_output, read_encoded};
use crate::builder::invocation::Invocation;
use crate::builder::toolchain::{Toolchain, ToolchainError};
use crate::core::action::CompileAction;
use crate::core::source::{Project, SourceError};
use crate::ops::resolve::resolve;
use crate::resolver::{ResolutionResult, ResolveError};
use crate::util::config::Config;

/// A single compile request.
#[derive(Debug, Clone)]
pub struct CompileRequest {
    pub action: CompileAction,
    /// Filename -> raw file content
    pub sources: BTreeMap<String, Vec<u8>>,
    /// Implementation file whose includes seed resolution
    pub entry: String,
}

impl CompileRequest {
    pub fn new(
        action: CompileAction,
        sources: BTreeMap<String, Vec<u8>>,
        entry: impl Into<String>,
    ) -> Self {
        CompileRequest {
            action,
            sources,
            entry: entry.into(),
        }
    }
}

/// Outcome of a compile request.
#[derive(Debug, Clone, Serialize)]
pub struct CompileResult {
    pub success: bool,
    /// Base-32 encoded binary, for actions that return one
    pub artifact: Option<String>,
    /// Progress lines and compiler stdout
    pub log: String,
    /// Terse failure reason; compiler stderr for failed compiles
    pub error: Option<String>,
    pub failure: Option<FailureKind>,
}

/// Machine-readable classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    MissingImplementationFile,
    EntryNotFound,
    InvalidFilename,
    CyclicDependency,
    LibraryNotFound,
    RepositoryError,
    ToolchainNotFound,
    ToolchainTimeout,
    CompileFailed,
    Io,
}

/// Error while servicing a compile request.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Toolchain(#[from] ToolchainError),

    #[error("{}", failure_message(*status, stderr))]
    Failed { status: Option<i32>, stderr: String },

    #[error("{0:#}")]
    Io(#[from] anyhow::Error),
}

impl CompileError {
    pub fn kind(&self) -> FailureKind {
        match self {
            CompileError::Resolve(err) => match err {
                ResolveError::Source(SourceError::MissingImplementationFile { .. }) => {
                    FailureKind::MissingImplementationFile
                }
                ResolveError::Source(SourceError::InvalidFilename { .. }) => {
                    FailureKind::InvalidFilename
                }
                ResolveError::EntryNotFound { .. } => FailureKind::EntryNotFound,
                ResolveError::CyclicDependency { .. } => FailureKind::CyclicDependency,
                ResolveError::LibraryNotFound { .. } => FailureKind::LibraryNotFound,
                ResolveError::Repository { .. } => FailureKind::RepositoryError,
            },
            CompileError::Toolchain(err) => match err {
                ToolchainError::NotFound { .. } => FailureKind::ToolchainNotFound,
                ToolchainError::Timeout { .. } => FailureKind::ToolchainTimeout,
                ToolchainError::Io { .. } => FailureKind::Io,
            },
            CompileError::Failed { .. } => FailureKind::CompileFailed,
            CompileError::Io(_) => FailureKind::Io,
        }
    }
}

fn failure_message(status: Option<i32>, stderr: &str) -> String {
    if !stderr.is_empty() {
        return stderr.trim_end().to_string();
    }
    match status {
        Some(code) => format!("compiler exited with status {}", code),
        None => "compiler terminated by signal".to_string(),
    }
}

/// Resolve, materialize and compile a project.
///
/// Never fails: every error is folded into an unsuccessful [`CompileResult`].
/// Resolution errors are reported before the toolchain is touched, and the
/// working directory and artifact file are removed on every path.
pub fn compile(config: &Config, toolchain: &dyn Toolchain, request: CompileRequest) -> CompileResult {
    let mut log = Vec::new();

    match run(config, toolchain, &request, &mut log) {
        Ok(artifact) => CompileResult {
            success: true,
            artifact,
            log: join_log(&log),
            error: None,
            failure: None,
        },
        Err(err) => {
            tracing::debug!("compile of `{}` failed: {:?}", request.entry, err);
            CompileResult {
                success: false,
                artifact: None,
                log: join_log(&log),
                error: Some(err.to_string()),
                failure: Some(err.kind()),
            }
        }
    }
}

fn run(
    config: &Config,
    toolchain: &dyn Toolchain,
    request: &CompileRequest,
    log: &mut Vec<String>,
) -> Result<Option<String>, CompileError> {
    let project = Project::load(request.sources.clone()).map_err(ResolveError::from)?;
    let resolution = resolve(config, &project, &request.entry)?;
    narrate(&resolution, log);

    let workdir = tempfile::Builder::new()
        .prefix("propcc-")
        .tempdir()
        .context("failed to create working directory")?;
    project.write_to(workdir.path())?;

    let output = allocate_output(request.action)?;

    let local_sources = resolution
        .local_order
        .iter()
        .map(|name| workdir.path().join(format!("{}.c", name)));

    let command = Invocation::new(
        config.toolchain.compiler(),
        workdir.path().join(&request.entry),
        output.path(),
    )
    .memory_model(config.toolchain.memory_model())
    .libraries(resolution.external.descriptors().iter().cloned())
    .include_dir(workdir.path())
    .cflags(config.toolchain.cflags.iter().cloned())
    .local_sources(local_sources)
    .to_command()
    .cwd(workdir.path());

    tracing::info!("{}", command.display());

    let result = toolchain.invoke(&command)?;

    if !result.stdout.is_empty() {
        log.push(result.stdout.trim_end().to_string());
    }
    if !result.succeeded() {
        return Err(CompileError::Failed {
            status: result.status,
            stderr: result.stderr,
        });
    }

    let artifact = if request.action.returns_binary() {
        Some(read_encoded(output.path())?)
    } else {
        None
    };

    log.push("Compile successful".to_string());
    Ok(artifact)
}

/// Progress lines describing what will be built.
pub fn narrate(resolution: &ResolutionResult, log: &mut Vec<String>) {
    if resolution.external_libraries.is_empty() {
        log.push("Required libraries: None".to_string());
    } else {
        log.push(format!(
            "Required libraries: {}",
            resolution.external_libraries.join(", ")
        ));
    }

    if resolution.local_order.is_empty() {
        log.push("Library compile order: None needed".to_string());
    } else {
        log.push(format!(
            "Library compile order: {}",
            resolution.local_order.join(", ")
        ));
    }

    for library in &resolution.local_order {
        log.push(format!("Compiling: {}", library));
    }
}

fn join_log(lines: &[String]) -> String {
    let mut out = lines.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}
