// src/formula/parser.rs

//! Formula file parsing and validation

use crate::error::{Error, Result};
use crate::formula::format::{class_name_for, Formula, InstallMethod};
use crate::formula::ruby::parse_ruby_formula;
use crate::hash::{Hash, HashAlgorithm};
use std::path::Path;
use url::Url;

/// Parse a formula from a TOML string
pub fn parse_formula_toml(content: &str) -> Result<Formula> {
    let mut formula: Formula =
        toml::from_str(content).map_err(|e| Error::ParseError(format!("Invalid formula: {}", e)))?;
    if formula.test.program.is_empty() {
        formula.test.program = formula.name.clone();
    }
    Ok(formula)
}

/// Parse a formula file, Ruby for `.rb` and TOML otherwise
///
/// A Ruby formula takes its name from the file (`python@3.9.rb`) when the
/// file name maps to the declared class.
pub fn parse_formula_file(path: &Path) -> Result<Formula> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::IoError(format!("Failed to read formula file {}: {}", path.display(), e)))?;

    let is_ruby = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("rb"));
    if !is_ruby {
        return parse_formula_toml(&content);
    }

    let mut formula = parse_ruby_formula(&content)?;
    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
        if stem != formula.name && class_name_for(stem) == formula.class_name() {
            formula.name = stem.to_string();
        }
    }
    Ok(formula)
}

/// Check a formula before anything is fetched
///
/// Structural problems are errors; missing metadata only produces warnings.
pub fn validate_formula(formula: &Formula) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    if formula.name.trim().is_empty() {
        return Err(Error::ParseError("Formula name cannot be empty".to_string()));
    }

    let url = Url::parse(&formula.url)
        .map_err(|e| Error::ParseError(format!("Invalid source url '{}': {}", formula.url, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::ParseError(format!(
            "Source url must use http or https: {}",
            formula.url
        )));
    }
    if !formula.has_archive_url() {
        return Err(Error::ParseError(format!(
            "Source url does not point to an archive: {}",
            formula.url
        )));
    }

    Hash::new(HashAlgorithm::Sha256, formula.sha256.as_str()).map_err(|e| Error::InvalidDigest {
        value: formula.sha256.clone(),
        reason: e.to_string(),
    })?;

    if url.scheme() == "http" {
        warnings.push("Source url is not https".to_string());
    }
    if formula.desc.as_deref().is_none_or(|d| d.trim().is_empty()) {
        warnings.push("Missing formula description".to_string());
    }
    if formula.license.is_none() {
        warnings.push("Missing formula license".to_string());
    }
    match formula.homepage.as_deref() {
        None => warnings.push("Missing formula homepage".to_string()),
        Some(homepage) if !homepage.starts_with("https://") => {
            warnings.push(format!("Homepage is not https: {}", homepage));
        }
        Some(_) => {}
    }

    if formula.install == InstallMethod::VirtualenvWithResources {
        let has_python = formula
            .depends_on
            .iter()
            .any(|d| d.runtime_version().0 == "python");
        if !has_python {
            warnings.push("Virtualenv install without a python dependency".to_string());
        }
    }
    if let InstallMethod::Custom(body) = &formula.install {
        if body.trim().is_empty() {
            warnings.push("Install block is empty".to_string());
        }
    }

    if formula.test.args.is_empty() {
        warnings.push(format!("Smoke test runs {} without arguments", formula.test.program));
    }

    Ok(warnings)
}
