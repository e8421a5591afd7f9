//! Test fixtures for common test scenarios.
//!
//! Library repositories are built in a temporary directory laid out like a
//! real Propeller library tree.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::core::action::MemoryModel;

/// Build a filename -> content mapping from string pairs.
pub fn sources(files: &[(&str, &str)]) -> BTreeMap<String, Vec<u8>> {
    files
        .iter()
        .map(|(name, content)| (name.to_string(), content.as_bytes().to_vec()))
        .collect()
}

/// A library repository on disk, removed when dropped.
#[derive(Debug)]
pub struct RepoFixture {
    _tmp: TempDir,
    root: PathBuf,
}

impl RepoFixture {
    /// Create an empty repository rooted at `<tmp>/propeller-c-lib`.
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let root = tmp.path().join("propeller-c-lib");
        std::fs::create_dir_all(&root).expect("create repository root");
        RepoFixture { _tmp: tmp, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create an empty directory relative to the root.
    pub fn dir(&self, rel: &str) -> PathBuf {
        let dir = self.root.join(rel);
        std::fs::create_dir_all(&dir).expect("create fixture dir");
        dir
    }

    /// Add a library in directory `rel` with `<name>.h`, an optional
    /// `<name>.c`, and an empty `cmm/lib<name>.a` archive.
    pub fn library(&self, rel: &str, name: &str, header: &str, source: Option<&str>) -> PathBuf {
        let dir = self.dir(rel);
        std::fs::write(dir.join(format!("{}.h", name)), header).expect("write header");
        if let Some(source) = source {
            std::fs::write(dir.join(format!("{}.c", name)), source).expect("write source");
        }

        let archive_dir = dir.join(MemoryModel::Cmm.lib_dir_name());
        std::fs::create_dir_all(&archive_dir).expect("create archive dir");
        std::fs::write(archive_dir.join(format!("lib{}.a", name)), b"!<arch>\n")
            .expect("write archive");

        dir
    }
}

impl Default for RepoFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_fixture_layout() {
        let repo = RepoFixture::new();
        let dir = repo.library("Utility/libservo", "servo", "int servo(void);", Some(""));

        assert!(dir.join("servo.h").is_file());
        assert!(dir.join("servo.c").is_file());
        assert!(dir.join("cmm/libservo.a").is_file());
        assert!(dir.starts_with(repo.root()));
    }

    #[test]
    fn test_sources_helper() {
        let map = sources(&[("main.c", "int main;")]);
        assert_eq!(map["main.c"], b"int main;".to_vec());
    }
}
