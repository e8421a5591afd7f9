//! Library repository index.
//!
//! The repository is a read-only directory tree where each library lives in
//! a directory whose name contains the library name and which holds
//! `<name>.h`, optionally `<name>.c`, and per-memory-model archive
//! directories:
//!
//! ```text
//! propeller-c-lib/
//!   Utility/
//!     libsimpletools/
//!       simpletools.h
//!       simpletools.c
//!       cmm/libsimpletools.a
//! ```
//!
//! Directories are visited in file-name order so lookups are deterministic.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use walkdir::WalkDir;

use crate::core::library::LibraryDescriptor;
use crate::resolver::errors::ResolveError;
use crate::resolver::scan::parse_includes;
use crate::util::config::RepositorySettings;

/// Outcome of looking up one library name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// A directory named after the library holds its header.
    Found(LibraryDescriptor),
    /// Listed as a system library; needs no descriptor.
    System,
    /// Only a directory not named after the library holds the header.
    Foreign { dir: PathBuf },
    /// No directory holds the header.
    NotFound { suggestions: Vec<String> },
}

/// Read-through index over a library repository root.
#[derive(Debug)]
pub struct LibraryRepository {
    root: PathBuf,
    system_libraries: BTreeSet<String>,
    allow_foreign_headers: bool,
    cache: Mutex<HashMap<String, Lookup>>,
}

impl LibraryRepository {
    /// Index the repository at `root` with default settings.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LibraryRepository {
            root: root.into(),
            system_libraries: BTreeSet::new(),
            allow_foreign_headers: true,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Index the repository described by configuration.
    pub fn from_settings(settings: &RepositorySettings) -> Self {
        LibraryRepository::new(settings.root())
            .with_system_libraries(settings.system_libraries.iter().cloned())
            .allow_foreign_headers(settings.allow_foreign_headers())
    }

    /// Libraries satisfied without a descriptor.
    pub fn with_system_libraries(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.system_libraries.extend(names);
        self
    }

    /// Whether a header found outside a name-matching directory satisfies a lookup.
    pub fn allow_foreign_headers(mut self, allow: bool) -> Self {
        self.allow_foreign_headers = allow;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Look up a library by name.
    pub fn find(&self, name: &str) -> Result<Lookup, ResolveError> {
        if let Some(hit) = self.cache().get(name) {
            return Ok(hit.clone());
        }

        let lookup = self.search(name)?;
        self.cache().insert(name.to_string(), lookup.clone());
        Ok(lookup)
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, HashMap<String, Lookup>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn search(&self, name: &str) -> Result<Lookup, ResolveError> {
        if self.system_libraries.contains(name) {
            tracing::debug!("`{}` is a system library", name);
            return Ok(Lookup::System);
        }

        if !self.root.is_dir() {
            return Err(ResolveError::Repository {
                path: self.root.clone(),
                message: "directory does not exist".to_string(),
            });
        }

        let header = format!("{}.h", name);
        let mut foreign = None;
        let mut suggestions = Vec::new();

        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|e| ResolveError::Repository {
                path: e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.root.clone()),
                message: e.to_string(),
            })?;

            if !entry.file_type().is_dir() {
                continue;
            }

            let dir = entry.path();
            let named_after = entry.file_name().to_string_lossy().contains(name);

            if dir.join(&header).is_file() {
                if named_after {
                    return self.describe(name, dir).map(Lookup::Found);
                }
                if foreign.is_none() {
                    foreign = Some(dir.to_path_buf());
                }
            } else if named_after && entry.depth() > 0 {
                suggestions.push(self.display_relative(dir));
            }
        }

        match foreign {
            Some(dir) if self.allow_foreign_headers => {
                tracing::warn!(
                    "`{}` found only in `{}`; treating it as a global library",
                    header,
                    dir.display()
                );
                Ok(Lookup::Foreign { dir })
            }
            _ => Ok(Lookup::NotFound { suggestions }),
        }
    }

    /// Build the descriptor for a library located in `dir`.
    ///
    /// The implementation file's includes are the library's dependencies when
    /// it exists; otherwise the header's are.
    fn describe(&self, name: &str, dir: &Path) -> Result<LibraryDescriptor, ResolveError> {
        let source = dir.join(format!("{}.c", name));
        let scanned = if source.is_file() {
            source
        } else {
            dir.join(format!("{}.h", name))
        };

        let bytes = std::fs::read(&scanned).map_err(|e| ResolveError::Repository {
            path: scanned.clone(),
            message: e.to_string(),
        })?;

        let mut includes = parse_includes(&String::from_utf8_lossy(&bytes));
        includes.remove(name);

        tracing::debug!("library `{}` at {}", name, dir.display());
        Ok(LibraryDescriptor::new(name, dir, includes))
    }

    fn display_relative(&self, dir: &Path) -> String {
        dir.strip_prefix(&self.root)
            .unwrap_or(dir)
            .display()
            .to_string()
    }
}
