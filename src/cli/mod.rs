// src/cli/mod.rs
//! CLI definitions for sedot
//!
//! The default action downloads every post URL given on the command line:
//!
//! ```text
//! sedot [OPTIONS] <URL>...
//! ```
//!
//! Maintenance commands:
//! - `formula` - Lint, verify, hash and render package formulas
//! - `completions` - Shell completion scripts

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

mod formula;

pub use formula::FormulaCommands;

#[derive(Parser)]
#[command(name = "sedot")]
#[command(author = "Sedot Contributors")]
#[command(version = concat!("v", env!("CARGO_PKG_VERSION")))]
#[command(about = "Download videos from Instagram posts/reels and Threads", long_about = None)]
#[command(args_conflicts_with_subcommands = true, arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub download: DownloadArgs,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options of the default download action
#[derive(Args, Debug, Default)]
pub struct DownloadArgs {
    /// Instagram or Threads post URLs
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,

    /// Directory to save videos into [default: downloads]
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Replace files that already exist
    #[arg(long)]
    pub overwrite: bool,

    /// Fetch metadata only, do not download
    #[arg(long)]
    pub dry_run: bool,

    /// Print the metadata table before downloading
    #[arg(long)]
    pub show_metadata: bool,
}

/// Options shared by every command
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Enable debug logging on stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress progress bars and informational output
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file (default: $SEDOT_CONFIG, then the user config dir)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lint, verify and render package formulas
    #[command(subcommand)]
    Formula(FormulaCommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
