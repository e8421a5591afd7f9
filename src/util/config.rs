//! Configuration file support for propcc.
//!
//! propcc reads two configuration file locations:
//! - Global: `~/.propcc/config.toml` - User-wide defaults
//! - Project: `.propcc/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Command-line flags
//! override both.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::action::MemoryModel;

/// Compiler used when none is configured.
pub const DEFAULT_COMPILER: &str = "/opt/parallax/bin/propeller-elf-gcc";

/// Library repository used when none is configured, relative to the working directory.
pub const DEFAULT_REPOSITORY: &str = "propeller-c-lib";

/// Toolchain wait bound used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// propcc configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Compiler settings
    pub toolchain: ToolchainSettings,

    /// Library repository settings
    pub repository: RepositorySettings,
}

/// Compiler settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ToolchainSettings {
    /// Path or PATH-relative name of the cross compiler
    pub compiler: Option<PathBuf>,

    /// Memory model to compile and link for
    pub memory_model: Option<MemoryModel>,

    /// Seconds to wait for the compiler; 0 waits indefinitely
    pub timeout_secs: Option<u64>,

    /// Additional compiler flags
    pub cflags: Vec<String>,
}

/// Library repository settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RepositorySettings {
    /// Root directory of the library repository
    pub root: Option<PathBuf>,

    /// Libraries provided by the toolchain itself; never looked up
    pub system_libraries: Vec<String>,

    /// Accept a header found in a directory not named after the library
    pub allow_foreign_headers: Option<bool>,
}

impl ToolchainSettings {
    pub fn compiler(&self) -> PathBuf {
        self.compiler
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_COMPILER))
    }

    pub fn memory_model(&self) -> MemoryModel {
        self.memory_model.unwrap_or_default()
    }

    /// Wait bound for the compiler, `None` for no limit.
    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

impl RepositorySettings {
    pub fn root(&self) -> PathBuf {
        self.root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPOSITORY))
    }

    pub fn allow_foreign_headers(&self) -> bool {
        self.allow_foreign_headers.unwrap_or(true)
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        // Toolchain settings
        if other.toolchain.compiler.is_some() {
            self.toolchain.compiler = other.toolchain.compiler;
        }
        if other.toolchain.memory_model.is_some() {
            self.toolchain.memory_model = other.toolchain.memory_model;
        }
        if other.toolchain.timeout_secs.is_some() {
            self.toolchain.timeout_secs = other.toolchain.timeout_secs;
        }
        if !other.toolchain.cflags.is_empty() {
            self.toolchain.cflags = other.toolchain.cflags;
        }

        // Repository settings
        if other.repository.root.is_some() {
            self.repository.root = other.repository.root;
        }
        if !other.repository.system_libraries.is_empty() {
            self.repository.system_libraries = other.repository.system_libraries;
        }
        if other.repository.allow_foreign_headers.is_some() {
            self.repository.allow_foreign_headers = other.repository.allow_foreign_headers;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.propcc/config.toml)
/// 2. Global config (~/.propcc/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    // Load global config first
    if global_path.exists() {
        let global = Config::load_or_default(global_path);
        config.merge(global);
    }

    // Project config overrides global
    if project_path.exists() {
        let project = Config::load_or_default(project_path);
        config.merge(project);
    }

    config
}

/// Get the global propcc config directory (~/.propcc).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".propcc"))
}

/// Get the project config path (.propcc/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".propcc").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.toolchain.compiler(), PathBuf::from(DEFAULT_COMPILER));
        assert_eq!(config.toolchain.memory_model(), MemoryModel::Cmm);
        assert_eq!(
            config.toolchain.timeout(),
            Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        );
        assert_eq!(config.repository.root(), PathBuf::from(DEFAULT_REPOSITORY));
        assert!(config.repository.allow_foreign_headers());
        assert!(config.repository.system_libraries.is_empty());
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[toolchain]
compiler = "propeller-elf-gcc"
memory-model = "lmm"
timeout-secs = 0
cflags = ["-Wall"]

[repository]
root = "/srv/propeller-c-lib"
system-libraries = ["propeller"]
allow-foreign-headers = false
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.toolchain.compiler(), PathBuf::from("propeller-elf-gcc"));
        assert_eq!(config.toolchain.memory_model(), MemoryModel::Lmm);
        assert_eq!(config.toolchain.timeout(), None);
        assert_eq!(config.toolchain.cflags, vec!["-Wall"]);
        assert_eq!(config.repository.root(), PathBuf::from("/srv/propeller-c-lib"));
        assert_eq!(config.repository.system_libraries, vec!["propeller"]);
        assert!(!config.repository.allow_foreign_headers());
    }

    #[test]
    fn test_config_load_rejects_bad_model() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(&config_path, "[toolchain]\nmemory-model = \"huge\"\n").unwrap();

        assert!(Config::load(&config_path).is_err());
        assert_eq!(
            Config::load_or_default(&config_path).toolchain.memory_model(),
            MemoryModel::Cmm
        );
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config::default();
        base.toolchain.compiler = Some(PathBuf::from("/usr/bin/propeller-elf-gcc"));
        base.toolchain.timeout_secs = Some(30);

        let mut override_cfg = Config::default();
        override_cfg.toolchain.compiler = Some(PathBuf::from("/opt/bin/propeller-elf-gcc"));
        override_cfg.repository.allow_foreign_headers = Some(false);

        base.merge(override_cfg);

        assert_eq!(
            base.toolchain.compiler(),
            PathBuf::from("/opt/bin/propeller-elf-gcc")
        );
        assert_eq!(base.toolchain.timeout(), Some(Duration::from_secs(30))); // Not overridden
        assert!(!base.repository.allow_foreign_headers());
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = tmp.path().join("project.toml");

        std::fs::write(
            &global_path,
            r#"
[toolchain]
compiler = "/usr/bin/propeller-elf-gcc"
memory-model = "xmmc"

[repository]
root = "/global/libs"
"#,
        )
        .unwrap();

        std::fs::write(
            &project_path,
            r#"
[repository]
root = "/project/libs"
"#,
        )
        .unwrap();

        let config = load_config(&global_path, &project_path);

        assert_eq!(config.repository.root(), PathBuf::from("/project/libs"));
        assert_eq!(
            config.toolchain.compiler(),
            PathBuf::from("/usr/bin/propeller-elf-gcc")
        );
        assert_eq!(config.toolchain.memory_model(), MemoryModel::Xmmc);
    }

    #[test]
    fn test_project_config_path() {
        assert_eq!(
            project_config_path(Path::new("/work")),
            PathBuf::from("/work/.propcc/config.toml")
        );
    }
}
