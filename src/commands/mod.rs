// src/commands/mod.rs
//! Command handlers for the sedot CLI

mod download;
mod formula;
mod output;
pub mod progress;

pub use download::{cmd_download, DownloadOptions};
pub use formula::{cmd_formula_digest, cmd_formula_lint, cmd_formula_render, cmd_formula_verify};

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::Shell;

/// Write a completion script for `shell` to stdout
pub fn cmd_completions(shell: Shell) -> Result<()> {
    let mut cmd = crate::cli::Cli::command();
    clap_complete::generate(shell, &mut cmd, "sedot", &mut std::io::stdout());
    Ok(())
}
