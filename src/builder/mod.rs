//! Compiler driver.
//!
//! Turns a resolved project into a toolchain invocation and runs it.

pub mod artifact;
pub mod invocation;
pub mod toolchain;

pub use invocation::{link_passes, Invocation};
pub use toolchain::{
    CommandSpec, ProcessToolchain, Toolchain, ToolchainError, ToolchainOutput,
};
