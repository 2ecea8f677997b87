//! CLI argument parsing with clap

use bootstrapme_core::presets::CONFIG_DIR_ENV;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// BootstrapMe - scaffold projects from language and framework presets
///
/// Run without a subcommand to pick a preset interactively.
#[derive(Parser, Debug)]
#[command(name = "bootstrapme")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options shared by every command
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Directory holding `<language>/<preset>.yaml` files
    /// [default: ~/.config/bootstrapme]
    #[arg(long, global = true, env = CONFIG_DIR_ENV)]
    pub presets_dir: Option<PathBuf>,

    /// Shell used to run post-install commands
    #[arg(long, global = true, default_value = "sh")]
    pub shell: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a project from a preset without prompts
    New(NewArgs),

    /// List available languages and presets
    List(ListArgs),
}

#[derive(Args, Debug)]
pub struct NewArgs {
    /// Preset language (directory name under the presets directory)
    #[arg(short, long)]
    pub language: String,

    /// Preset name
    #[arg(short, long)]
    pub preset: String,

    /// Project directory to create
    #[arg(short, long)]
    pub name: PathBuf,

    /// Username for presets that need one
    #[arg(short, long)]
    pub username: Option<String>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only list presets for this language
    #[arg(short, long)]
    pub language: Option<String>,
}
