//! propcc - A dependency-resolving compile driver for Propeller C
//!
//! This crate provides the core library functionality for propcc:
//! include scanning, local and external dependency resolution, compiler
//! invocation construction and toolchain execution.

pub mod builder;
pub mod core;
pub mod ops;
pub mod resolver;
pub mod util;

/// Test utilities and mocks for propcc unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a mock toolchain and on-disk library
/// repository fixtures.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{CompileAction, LibraryDescriptor, MemoryModel, Project};
pub use ops::{compile, CompileRequest, CompileResult, FailureKind};
pub use resolver::{LibraryRepository, ResolutionResult, ResolveError};
pub use util::context::GlobalContext;
