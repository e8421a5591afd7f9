//! Resolution operations.
//!
//! Provides the resolve-only entry point used by `propcc deps` and by
//! [`compile`](crate::ops::compile).

use crate::core::source::Project;
use crate::resolver::{self, LibraryRepository, ResolutionResult, ResolveError};
use crate::util::config::Config;

/// Resolve `project` from `entry` against the configured library repository.
///
/// Touches no toolchain and writes nothing.
pub fn resolve(
    config: &Config,
    project: &Project,
    entry: &str,
) -> Result<ResolutionResult, ResolveError> {
    let repository = LibraryRepository::from_settings(&config.repository);

    tracing::debug!(
        "resolving `{}` against {}",
        entry,
        repository.root().display()
    );

    resolver::resolve(&repository, project, entry)
}
