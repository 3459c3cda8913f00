// src/cli/formula.rs
//! Package formula commands

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum FormulaCommands {
    /// Validate formula files without touching the network
    Lint {
        /// Formula files (.rb or .toml)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Download the source archive and check its digest
    Verify {
        /// Formula file (.rb or .toml)
        file: PathBuf,

        /// Directory for downloaded archives
        #[arg(long, default_value = "formula-cache")]
        cache: PathBuf,
    },

    /// Print the SHA-256 of a local archive or URL
    Digest {
        /// Path or http(s) URL
        source: String,
    },

    /// Render a formula as Homebrew Ruby, optionally bumped to a new release
    Render {
        /// Formula file (.rb or .toml)
        file: PathBuf,

        /// New release version
        #[arg(long, requires = "sha256")]
        version: Option<String>,

        /// SHA-256 of the new release archive
        #[arg(long, requires = "version")]
        sha256: Option<String>,

        /// Emit TOML instead of Ruby
        #[arg(long)]
        toml: bool,
    },
}
