//! Project source files.
//!
//! A project is the set of C headers and implementation files submitted with
//! a compile request. Loading a project validates that every header has a
//! same-stem implementation file.
//!
//! Include scanning lives in the resolver; this module only holds the files.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// A submitted file set that cannot form a project.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Missing c file {implementation} for header {header}")]
    MissingImplementationFile {
        header: String,
        implementation: String,
    },

    #[error("invalid source filename `{filename}`")]
    InvalidFilename { filename: String },
}

impl SourceError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            SourceError::MissingImplementationFile {
                header,
                implementation,
            } => Diagnostic::error(format!("header `{}` has no implementation file", header))
                .note(format!("expected `{}` next to it", implementation))
                .hint(format!("Add `{}` to the submitted files", implementation)),

            SourceError::InvalidFilename { filename } => {
                Diagnostic::error(format!("invalid source filename `{}`", filename))
                    .note("filenames must not contain directory components")
            }
        }
    }
}

/// Kind of a project source file, derived from its suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// `.h` file
    Header,
    /// `.c` file
    Implementation,
}

impl SourceKind {
    /// Classify a filename, returning `None` for unrecognized suffixes.
    pub fn from_filename(filename: &str) -> Option<Self> {
        match Path::new(filename).extension().and_then(|e| e.to_str()) {
            Some("h") => Some(SourceKind::Header),
            Some("c") => Some(SourceKind::Implementation),
            _ => None,
        }
    }

    /// File suffix (without the dot).
    pub fn extension(&self) -> &'static str {
        match self {
            SourceKind::Header => "h",
            SourceKind::Implementation => "c",
        }
    }

    /// The paired kind (header <-> implementation).
    pub fn counterpart(&self) -> SourceKind {
        match self {
            SourceKind::Header => SourceKind::Implementation,
            SourceKind::Implementation => SourceKind::Header,
        }
    }
}

/// A single in-memory source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub filename: String,
    pub content: Vec<u8>,
    pub kind: SourceKind,
}

impl SourceUnit {
    /// Create a source unit, or `None` if the filename is not a `.h`/`.c` file.
    pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Option<Self> {
        let filename = filename.into();
        let kind = SourceKind::from_filename(&filename)?;
        Some(SourceUnit {
            filename,
            content: content.into(),
            kind,
        })
    }

    /// Filename without its suffix.
    pub fn stem(&self) -> &str {
        stem_of(&self.filename)
    }

    /// Content decoded as text. Invalid UTF-8 is replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }

    /// Filename of the same-stem counterpart file.
    pub fn counterpart_filename(&self) -> String {
        format!("{}.{}", self.stem(), self.kind.counterpart().extension())
    }
}

/// Strip the last suffix from a filename.
pub fn stem_of(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(idx) => &filename[..idx],
        None => filename,
    }
}

/// The set of files making up one compile request.
#[derive(Debug, Clone, Default)]
pub struct Project {
    units: BTreeMap<String, SourceUnit>,
}

impl Project {
    /// Load a project from a filename -> content mapping.
    ///
    /// Files that are neither headers nor implementation files are skipped.
    /// Fails if any header lacks its implementation file.
    pub fn load(sources: BTreeMap<String, Vec<u8>>) -> Result<Self, SourceError> {
        let mut units = BTreeMap::new();

        for (filename, content) in sources {
            if !is_plain_filename(&filename) {
                return Err(SourceError::InvalidFilename { filename });
            }
            match SourceUnit::new(filename.clone(), content) {
                Some(unit) => {
                    units.insert(filename, unit);
                }
                None => tracing::warn!("ignoring `{}`: not a .h or .c file", filename),
            }
        }

        let project = Project { units };
        project.check_pairs()?;
        Ok(project)
    }

    fn check_pairs(&self) -> Result<(), SourceError> {
        for unit in self.headers() {
            let implementation = unit.counterpart_filename();
            if !self.units.contains_key(&implementation) {
                return Err(SourceError::MissingImplementationFile {
                    header: unit.filename.clone(),
                    implementation,
                });
            }
        }
        Ok(())
    }

    /// Look up a file by name.
    pub fn get(&self, filename: &str) -> Option<&SourceUnit> {
        self.units.get(filename)
    }

    /// All header files.
    pub fn headers(&self) -> impl Iterator<Item = &SourceUnit> {
        self.units
            .values()
            .filter(|u| u.kind == SourceKind::Header)
    }

    /// The implementation file paired with `<stem>.h`.
    pub fn implementation_for(&self, stem: &str) -> Option<&SourceUnit> {
        self.units.get(&format!("{}.c", stem))
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Write every file into `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        for unit in self.units.values() {
            let path = dir.join(&unit.filename);
            std::fs::write(&path, &unit.content)
                .with_context(|| format!("failed to write source file: {}", path.display()))?;
        }
        Ok(())
    }
}

/// A filename with no directory components.
fn is_plain_filename(filename: &str) -> bool {
    !filename.is_empty()
        && filename != "."
        && filename != ".."
        && !filename.contains('/')
        && !filename.contains('\\')
}
