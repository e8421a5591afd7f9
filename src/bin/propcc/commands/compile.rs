//! `propcc compile` command

use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::{CompileArgs, GlobalArgs};
use crate::commands::{load_context, read_sources};
use propcc::builder::artifact::decode;
use propcc::builder::ProcessToolchain;
use propcc::ops::{compile, CompileRequest, CompileResult, FailureKind};
use propcc::util::diagnostic::{emit, Diagnostic};

pub fn execute(global: &GlobalArgs, args: CompileArgs) -> Result<()> {
    let (ctx, config) = load_context(global)?;
    let sources = read_sources(&args.files)?;

    let toolchain = ProcessToolchain::new().with_timeout(config.toolchain.timeout());
    let request = CompileRequest::new(args.action, sources, args.entry.clone());

    let spinner = if global.verbose || args.json {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
        pb.set_message(format!("Compiling {}", args.entry));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    };

    let result = compile(&config, &toolchain, request);

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        eprint!("{}", result.log);
    }

    if !result.success {
        if !args.json {
            emit(&failure_diagnostic(&result), ctx.color());
        }
        std::process::exit(1);
    }

    if let Some(ref out) = args.out {
        match result.artifact {
            Some(ref artifact) => {
                let bytes = decode(artifact)?;
                std::fs::write(out, bytes)
                    .with_context(|| format!("failed to write artifact: {}", out.display()))?;
                if !args.json {
                    eprintln!("     Wrote {}", out.display());
                }
            }
            None => tracing::warn!(
                "action `{}` produces no binary; nothing written to {}",
                args.action,
                out.display()
            ),
        }
    }

    Ok(())
}

fn failure_diagnostic(result: &CompileResult) -> Diagnostic {
    let message = result.error.clone().unwrap_or_else(|| "compile failed".to_string());
    let diag = Diagnostic::error(message);

    match result.failure {
        Some(FailureKind::ToolchainNotFound) => {
            diag.hint("Set `toolchain.compiler` or pass `--compiler <path>`")
        }
        Some(FailureKind::ToolchainTimeout) => {
            diag.hint("Raise `toolchain.timeout-secs`, or set it to 0 to wait indefinitely")
        }
        Some(FailureKind::LibraryNotFound) => diag
            .hint("Check `repository.root` or pass `--repository <dir>`")
            .hint("Run `propcc deps` to inspect the resolved libraries"),
        Some(FailureKind::MissingImplementationFile) => {
            diag.hint("Submit the .c file for every local .h file")
        }
        _ => diag,
    }
}
