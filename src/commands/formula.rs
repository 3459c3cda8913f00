// src/commands/formula.rs

//! Formula commands - lint, verify, digest and render package formulas

use anyhow::{Context, Result};
use sedot::client::HttpClient;
use sedot::config::SedotConfig;
use sedot::formula::{compute_digest, parse_formula_file, validate_formula, verify_source};
use std::path::Path;
use tracing::info;

/// Validate formula files offline
///
/// Every file is checked even after a failure. Returns the number of files
/// that failed validation.
pub fn cmd_formula_lint(files: &[impl AsRef<Path>]) -> Result<usize> {
    let mut failed = 0;

    for file in files {
        let path = file.as_ref();
        println!("Linting {}", path.display());

        let result = parse_formula_file(path).and_then(|formula| {
            let warnings = validate_formula(&formula)?;
            Ok((formula, warnings))
        });

        match result {
            Ok((formula, warnings)) => {
                for warning in &warnings {
                    println!("  Warning: {}", warning);
                }
                let version = formula.version().unwrap_or_else(|| "unknown".to_string());
                if warnings.is_empty() {
                    println!("  [OK] {} {}", formula.name, version);
                } else {
                    println!("  [OK] {} {} ({} warning(s))", formula.name, version, warnings.len());
                }
            }
            Err(e) => {
                println!("  [FAILED] {}", e);
                failed += 1;
            }
        }
    }

    if failed == 0 {
        println!("\n[COMPLETE] {} formula(s) passed", files.len());
    } else {
        println!("\n{} of {} formula(s) failed", failed, files.len());
    }
    Ok(failed)
}

/// Download a formula's source archive and check its digest
pub fn cmd_formula_verify(file: &Path, cache: &Path, config: &SedotConfig) -> Result<()> {
    let formula = parse_formula_file(file)
        .with_context(|| format!("Failed to parse formula: {}", file.display()))?;
    println!("Formula: {} {}", formula.name, formula.version().unwrap_or_default());

    let client = HttpClient::new(&config.http).context("Failed to create HTTP client")?;
    let archive = verify_source(&formula, &client, cache)
        .with_context(|| format!("Source verification failed for {}", formula.name))?;

    println!("[OK] {} matches sha256 {}", archive.display(), formula.sha256);
    Ok(())
}

/// Print the SHA-256 of a local file or remote archive
pub fn cmd_formula_digest(source: &str, config: &SedotConfig) -> Result<()> {
    info!("Computing digest of {}", source);
    let client = HttpClient::new(&config.http).context("Failed to create HTTP client")?;
    let digest = compute_digest(source, &client)
        .with_context(|| format!("Failed to compute digest of {}", source))?;
    println!("{}  {}", digest, source);
    Ok(())
}

/// Render a formula as Ruby or TOML, optionally bumped to a new release
pub fn cmd_formula_render(
    file: &Path,
    version: Option<&str>,
    sha256: Option<&str>,
    as_toml: bool,
) -> Result<()> {
    let mut formula = parse_formula_file(file)
        .with_context(|| format!("Failed to parse formula: {}", file.display()))?;

    if let (Some(version), Some(sha256)) = (version, sha256) {
        formula = formula
            .bump(version, sha256)
            .with_context(|| format!("Failed to bump {} to {}", formula.name, version))?;
        info!("Bumped {} to {}", formula.name, version);
    }

    if as_toml {
        let rendered = toml::to_string_pretty(&formula).context("Failed to serialize formula")?;
        print!("{}", rendered);
    } else {
        print!("{}", formula.to_ruby());
    }
    Ok(())
}
