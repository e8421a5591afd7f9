//! High-level operations.
//!
//! This module contains the implementation of propcc commands.

pub mod compile;
pub mod resolve;

pub use compile::{compile, narrate, CompileError, CompileRequest, CompileResult, FailureKind};
pub use resolve::resolve;
