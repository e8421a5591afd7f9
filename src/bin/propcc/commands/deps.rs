//! `propcc deps` command

use anyhow::Result;

use crate::cli::{DepsArgs, GlobalArgs};
use crate::commands::{load_context, read_sources};
use propcc::core::Project;
use propcc::ops::{narrate, resolve};
use propcc::resolver::ResolveError;
use propcc::util::diagnostic::{emit, Diagnostic};

pub fn execute(global: &GlobalArgs, args: DepsArgs) -> Result<()> {
    let (ctx, config) = load_context(global)?;
    let sources = read_sources(&args.files)?;

    let outcome = Project::load(sources)
        .map_err(ResolveError::from)
        .and_then(|project| resolve(&config, &project, &args.entry));
    let resolution = match outcome {
        Ok(resolution) => resolution,
        Err(e) => {
            emit(&e.to_diagnostic(), ctx.color());
            std::process::exit(1);
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
        return Ok(());
    }

    let mut lines = Vec::new();
    narrate(&resolution, &mut lines);
    for line in lines {
        println!("{}", line);
    }

    if !resolution.external.is_empty() {
        println!();
        println!("External libraries (link order):");
        for library in resolution.external.descriptors() {
            println!("  {} ({})", library.name, library.path.display());
        }
    }

    for name in resolution.external.satisfied() {
        emit(
            &Diagnostic::warning(format!("`{}` has no library directory", name))
                .note("assuming the toolchain provides it"),
            ctx.color(),
        );
    }

    Ok(())
}
