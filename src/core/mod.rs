//! Core data structures for propcc.
//!
//! This module contains the foundational types used throughout propcc:
//! - Submitted source files and the project they form
//! - Compile actions and memory models
//! - External library descriptors

pub mod action;
pub mod library;
pub mod source;

pub use action::{CompileAction, MemoryModel};
pub use library::LibraryDescriptor;
pub use source::{Project, SourceError, SourceKind, SourceUnit};
