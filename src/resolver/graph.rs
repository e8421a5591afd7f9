//! Local dependency graph resolution.
//!
//! Determines which project libraries (header/implementation pairs) must be
//! compiled before the entry file, and which included names are not part of
//! the project at all. The walk is depth-first and post-order, so every
//! library appears after the libraries it includes.

use std::collections::{BTreeMap, HashSet};

use crate::core::source::{stem_of, Project};
use crate::resolver::errors::ResolveError;
use crate::resolver::scan::{parse_includes, IncludeSet};

/// Project libraries and what their implementation files include.
#[derive(Debug, Clone, Default)]
pub struct LocalGraph {
    /// Header stem -> includes of the paired implementation file
    libraries: BTreeMap<String, IncludeSet>,
    /// Stem of the entry file, which is neither local library nor external
    entry_stem: Option<String>,
}

impl LocalGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for a project compiled from `entry`.
    ///
    /// A header sharing the entry file's stem belongs to the entry itself and
    /// is not treated as a separate library.
    pub fn from_project(project: &Project, entry: &str) -> Self {
        let entry_stem = stem_of(entry).to_string();
        let mut graph = LocalGraph::new();

        for header in project.headers() {
            let stem = header.stem();
            if stem == entry_stem {
                continue;
            }
            if let Some(implementation) = project.implementation_for(stem) {
                graph.add_library(stem, parse_includes(&implementation.text()));
            }
        }

        graph.entry_stem = Some(entry_stem);
        graph
    }

    /// Register a local library.
    ///
    /// An implementation file including its own header is not a dependency.
    pub fn add_library(&mut self, stem: impl Into<String>, mut includes: IncludeSet) {
        let stem = stem.into();
        includes.remove(&stem);
        self.libraries.insert(stem, includes);
    }

    /// Includes of a local library, or `None` if `name` is not local.
    pub fn includes_of(&self, name: &str) -> Option<&IncludeSet> {
        self.libraries.get(name)
    }

    fn is_entry(&self, name: &str) -> bool {
        self.entry_stem.as_deref() == Some(name)
    }
}

/// Result of the local walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalResolution {
    /// Local libraries in build order (dependencies first)
    pub order: Vec<String>,
    /// Non-local names in first-seen order
    pub external: Vec<String>,
}

/// Resolve the entry file's includes against the local graph.
pub fn resolve_local(
    entry_includes: &IncludeSet,
    graph: &LocalGraph,
) -> Result<LocalResolution, ResolveError> {
    let mut walk = Walk {
        graph,
        placed: HashSet::new(),
        external_seen: HashSet::new(),
        stack: Vec::new(),
        result: LocalResolution::default(),
    };

    for name in entry_includes {
        walk.visit(name)?;
    }

    Ok(walk.result)
}

struct Walk<'a> {
    graph: &'a LocalGraph,
    placed: HashSet<String>,
    external_seen: HashSet<String>,
    /// Libraries currently being resolved, outermost first
    stack: Vec<String>,
    result: LocalResolution,
}

impl Walk<'_> {
    fn visit(&mut self, name: &str) -> Result<(), ResolveError> {
        if self.placed.contains(name) || self.graph.is_entry(name) {
            return Ok(());
        }

        let Some(includes) = self.graph.includes_of(name) else {
            if self.external_seen.insert(name.to_string()) {
                tracing::debug!("external library referenced: {}", name);
                self.result.external.push(name.to_string());
            }
            return Ok(());
        };

        if let Some(pos) = self.stack.iter().position(|n| n == name) {
            let mut cycle = self.stack[pos..].to_vec();
            cycle.push(name.to_string());
            return Err(ResolveError::CyclicDependency { cycle });
        }

        self.stack.push(name.to_string());
        for include in includes {
            self.visit(include)?;
        }
        self.stack.pop();

        self.placed.insert(name.to_string());
        self.result.order.push(name.to_string());
        tracing::debug!("local library placed: {}", name);
        Ok(())
    }
}
