//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use propcc::core::{CompileAction, MemoryModel};

/// propcc - Resolve and compile Propeller C projects
#[derive(Parser)]
#[command(name = "propcc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Additional configuration file, applied after global and project config
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Library repository root
    #[arg(long, global = true, value_name = "DIR", env = "PROPCC_REPOSITORY")]
    pub repository: Option<PathBuf>,

    /// Cross compiler executable
    #[arg(long, global = true, value_name = "PATH", env = "PROPCC_COMPILER")]
    pub compiler: Option<PathBuf>,

    /// Memory model (lmm, cmm, xmmc, xmm-single, xmm-split)
    #[arg(long, global = true, value_name = "MODEL")]
    pub memory_model: Option<MemoryModel>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve dependencies and compile a program
    Compile(CompileArgs),

    /// Show the local build order and external library closure
    Deps(DepsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct CompileArgs {
    /// What to produce (compile, bin, eeprom)
    #[arg(short, long, default_value = "compile")]
    pub action: CompileAction,

    /// Implementation file containing main()
    #[arg(short, long)]
    pub entry: String,

    /// Write the produced binary to this path
    #[arg(short, long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Print the result as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Project source files (.c and .h)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Args)]
pub struct DepsArgs {
    /// Implementation file containing main()
    #[arg(short, long)]
    pub entry: String,

    /// Print the resolution as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Project source files (.c and .h)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
