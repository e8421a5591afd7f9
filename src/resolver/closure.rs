//! Transitive closure of external libraries.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::core::library::LibraryDescriptor;
use crate::resolver::errors::ResolveError;
use crate::resolver::repository::{LibraryRepository, Lookup};

/// External libraries needed by a program, in discovery order.
///
/// Discovery is depth-first pre-order: a library precedes the libraries it
/// depends on, which is the order a single-pass linker wants to see them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExternalClosure {
    libraries: Vec<LibraryDescriptor>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    /// Names satisfied without a descriptor (system or foreign headers)
    satisfied: Vec<String>,
}

impl ExternalClosure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor unless one with the same name exists.
    pub fn insert(&mut self, descriptor: LibraryDescriptor) -> bool {
        if self.index.contains_key(&descriptor.name) {
            return false;
        }
        self.index
            .insert(descriptor.name.clone(), self.libraries.len());
        self.libraries.push(descriptor);
        true
    }

    /// Descriptors in discovery order.
    pub fn descriptors(&self) -> &[LibraryDescriptor] {
        &self.libraries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.libraries.iter().map(|l| l.name.as_str())
    }

    /// Names that needed no descriptor.
    pub fn satisfied(&self) -> &[String] {
        &self.satisfied
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    fn mark_satisfied(&mut self, name: &str) {
        if !self.satisfied.iter().any(|n| n == name) {
            self.satisfied.push(name.to_string());
        }
    }
}

/// Expand external library names into their full transitive closure.
///
/// Fails with `LibraryNotFound` on the first name the repository cannot
/// locate; no partial closure is returned.
pub fn build_closure(
    repository: &LibraryRepository,
    names: &[String],
) -> Result<ExternalClosure, ResolveError> {
    let mut builder = ClosureBuilder {
        repository,
        visited: HashSet::new(),
        closure: ExternalClosure::new(),
    };

    for name in names {
        builder.resolve(name)?;
    }

    Ok(builder.closure)
}

struct ClosureBuilder<'a> {
    repository: &'a LibraryRepository,
    visited: HashSet<String>,
    closure: ExternalClosure,
}

impl ClosureBuilder<'_> {
    fn resolve(&mut self, name: &str) -> Result<(), ResolveError> {
        if !self.visited.insert(name.to_string()) {
            return Ok(());
        }

        match self.repository.find(name)? {
            Lookup::Found(descriptor) => {
                let dependencies: Vec<String> = descriptor.includes.iter().cloned().collect();
                self.closure.insert(descriptor);
                for dependency in &dependencies {
                    self.resolve(dependency)?;
                }
                Ok(())
            }
            Lookup::System | Lookup::Foreign { .. } => {
                self.closure.mark_satisfied(name);
                Ok(())
            }
            Lookup::NotFound { suggestions } => Err(ResolveError::LibraryNotFound {
                name: name.to_string(),
                suggestions,
            }),
        }
    }
}
