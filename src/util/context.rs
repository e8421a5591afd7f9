//! Global context for propcc operations.
//!
//! Provides centralized access to the working directory, configuration
//! locations and the effective configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::config::{global_config_dir, load_config, project_config_path, Config};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global propcc data (~/.propcc/)
    home: PathBuf,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext rooted at the process working directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        let home = global_config_dir().unwrap_or_else(|| PathBuf::from(".propcc"));

        GlobalContext {
            cwd,
            home,
            color: true,
        }
    }

    /// Set color output.
    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Get the project configuration file path.
    pub fn project_config_path(&self) -> PathBuf {
        project_config_path(&self.cwd)
    }

    /// Check if color output is enabled.
    pub fn color(&self) -> bool {
        self.color
    }

    /// Load global and project configuration, then an explicit file if given.
    ///
    /// A relative repository root and a relative compiler path are anchored
    /// at the working directory.
    pub fn load_config(&self, explicit: Option<&Path>) -> Result<Config> {
        let mut config = load_config(&self.config_path(), &self.project_config_path());

        if let Some(path) = explicit {
            config.merge(Config::load(path)?);
        }

        let root = config.repository.root();
        if root.is_relative() {
            config.repository.root = Some(self.cwd.join(root));
        }
        if let Some(ref compiler) = config.toolchain.compiler {
            config.toolchain.compiler = Some(self.anchor_program(compiler));
        }

        Ok(config)
    }

    /// Anchor a relative program path such as `bin/propeller-elf-gcc` at the
    /// working directory. Bare names are left for a PATH lookup.
    pub fn anchor_program(&self, program: &Path) -> PathBuf {
        if program.is_relative() && program.components().count() > 1 {
            self.cwd.join(program)
        } else {
            program.to_path_buf()
        }
    }
}
