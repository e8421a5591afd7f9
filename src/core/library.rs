//! External library descriptors.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::action::MemoryModel;

/// A library found in the library repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryDescriptor {
    /// Canonical library name (header stem)
    pub name: String,
    /// Directory holding `<name>.h`
    pub path: PathBuf,
    /// Names this library includes
    pub includes: BTreeSet<String>,
}

impl LibraryDescriptor {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, includes: BTreeSet<String>) -> Self {
        LibraryDescriptor {
            name: name.into(),
            path: path.into(),
            includes,
        }
    }

    /// Directory used as the include path.
    pub fn include_dir(&self) -> &Path {
        &self.path
    }

    /// Directory holding the prebuilt archive for a memory model.
    pub fn lib_dir(&self, model: MemoryModel) -> PathBuf {
        self.path.join(model.lib_dir_name())
    }

    /// Linker flag for this library.
    pub fn link_flag(&self) -> String {
        format!("-l{}", self.name)
    }
}
