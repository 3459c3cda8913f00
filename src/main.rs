// src/main.rs

mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, FormulaCommands};
use sedot::config::SedotConfig;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise warnings only, or debug with -v
    let default_level = if cli.global.verbose { "sedot=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = SedotConfig::discover(cli.global.config.as_deref())
        .context("Failed to load configuration")?;

    match cli.command {
        Some(Commands::Formula(FormulaCommands::Lint { files })) => {
            let failed = commands::cmd_formula_lint(&files)?;
            if failed > 0 {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Commands::Formula(FormulaCommands::Verify { file, cache })) => {
            commands::cmd_formula_verify(&file, &cache, &config)
        }
        Some(Commands::Formula(FormulaCommands::Digest { source })) => {
            commands::cmd_formula_digest(&source, &config)
        }
        Some(Commands::Formula(FormulaCommands::Render {
            file,
            version,
            sha256,
            toml,
        })) => commands::cmd_formula_render(&file, version.as_deref(), sha256.as_deref(), toml),
        Some(Commands::Completions { shell }) => commands::cmd_completions(shell),
        None => {
            let args = cli.download;
            if args.urls.is_empty() {
                anyhow::bail!("No URL given. Pass one or more Instagram or Threads post URLs.");
            }
            let options = commands::DownloadOptions {
                output_dir: args.output.unwrap_or_else(|| config.download.output_dir.clone()),
                overwrite: args.overwrite || config.download.overwrite,
                dry_run: args.dry_run,
                show_metadata: args.show_metadata,
                quiet: cli.global.quiet,
            };
            let failed = commands::cmd_download(&args.urls, &options, &config)?;
            if failed > 0 {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
