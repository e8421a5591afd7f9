//! Dependency resolution.
//!
//! Resolution runs in two stages. The local stage walks the project's own
//! header/implementation pairs to find a build order and the names that are
//! not part of the project. The external stage expands those names against
//! the library repository into a transitive closure.
//!
//! Both stages are pure functions of their inputs; the only I/O is reading
//! the read-only library repository.

pub mod closure;
pub mod errors;
pub mod graph;
pub mod repository;
pub mod scan;

pub use closure::{build_closure, ExternalClosure};
pub use errors::ResolveError;
pub use graph::{resolve_local, LocalGraph, LocalResolution};
pub use repository::{LibraryRepository, Lookup};
pub use scan::{parse_includes, IncludeSet};

use serde::Serialize;

use crate::core::source::{Project, SourceKind};

/// Everything needed to build one program.
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionResult {
    /// Local libraries in build order
    pub local_order: Vec<String>,
    /// External names referenced directly by project files, first-seen order
    pub external_libraries: Vec<String>,
    /// Transitive closure of the external libraries
    pub external: ExternalClosure,
}

/// Resolve a project's dependencies starting from `entry`.
pub fn resolve(
    repository: &LibraryRepository,
    project: &Project,
    entry: &str,
) -> Result<ResolutionResult, ResolveError> {
    let entry_unit = project
        .get(entry)
        .filter(|u| u.kind == SourceKind::Implementation)
        .ok_or_else(|| ResolveError::EntryNotFound {
            entry: entry.to_string(),
        })?;

    let graph = LocalGraph::from_project(project, entry);
    let local = resolve_local(&parse_includes(&entry_unit.text()), &graph)?;

    tracing::debug!(
        "local order: {:?}, external: {:?}",
        local.order,
        local.external
    );

    let external = build_closure(repository, &local.external)?;

    Ok(ResolutionResult {
        local_order: local.order,
        external_libraries: local.external,
        external,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sources, RepoFixture};

    #[test]
    fn test_resolve_project_end_to_end() {
        let repo = RepoFixture::new();
        repo.library("libsimpletools", "simpletools", "", Some("#include \"simpletext.h\"\n"));
        repo.library("libsimpletext", "simpletext", "", None);

        let project = Project::load(sources(&[
            ("main.c", "#include \"simpletools.h\"\n#include \"blink.h\"\n"),
            ("blink.h", ""),
            ("blink.c", "#include \"blink.h\"\n#include \"simpletools.h\"\n"),
        ]))
        .unwrap();

        let res = resolve(&LibraryRepository::new(repo.root()), &project, "main.c").unwrap();

        assert_eq!(res.local_order, vec!["blink"]);
        assert_eq!(res.external_libraries, vec!["simpletools"]);
        assert_eq!(
            res.external.names().collect::<Vec<_>>(),
            vec!["simpletools", "simpletext"]
        );
    }

    #[test]
    fn test_entry_must_be_an_implementation_file() {
        let repo = RepoFixture::new();
        let project =
            Project::load(sources(&[("main.c", ""), ("util.h", ""), ("util.c", "")])).unwrap();
        let index = LibraryRepository::new(repo.root());

        assert!(matches!(
            resolve(&index, &project, "missing.c"),
            Err(ResolveError::EntryNotFound { .. })
        ));
        assert!(matches!(
            resolve(&index, &project, "util.h"),
            Err(ResolveError::EntryNotFound { .. })
        ));
    }

    #[test]
    fn test_no_externals_does_not_touch_repository() {
        let project = Project::load(sources(&[("main.c", "#include <stdio.h>\n")])).unwrap();
        let index = LibraryRepository::new("/nonexistent/repository");

        let res = resolve(&index, &project, "main.c").unwrap();
        assert!(res.local_order.is_empty());
        assert!(res.external.is_empty());
    }
}
