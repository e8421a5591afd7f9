//! Command implementations

pub mod compile;
pub mod completions;
pub mod deps;

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::cli::GlobalArgs;
use propcc::util::{Config, GlobalContext};

/// Build the context and effective configuration, applying command-line overrides.
pub fn load_context(global: &GlobalArgs) -> Result<(GlobalContext, Config)> {
    let mut ctx = GlobalContext::new().context("failed to create global context")?;
    ctx.set_color(!global.no_color);

    let mut config = ctx.load_config(global.config.as_deref())?;

    if let Some(ref dir) = global.repository {
        config.repository.root = Some(ctx.cwd().join(dir));
    }
    if let Some(ref compiler) = global.compiler {
        config.toolchain.compiler = Some(ctx.anchor_program(compiler));
    }
    if let Some(model) = global.memory_model {
        config.toolchain.memory_model = Some(model);
    }

    Ok((ctx, config))
}

/// Read source files keyed by their file name.
pub fn read_sources(files: &[PathBuf]) -> Result<BTreeMap<String, Vec<u8>>> {
    let mut sources = BTreeMap::new();

    for path in files {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("invalid source path: {}", path.display()))?
            .to_string();

        let content = std::fs::read(path)
            .with_context(|| format!("failed to read source file: {}", path.display()))?;

        if sources.insert(name.clone(), content).is_some() {
            bail!("duplicate source filename `{}`", name);
        }
    }

    Ok(sources)
}
