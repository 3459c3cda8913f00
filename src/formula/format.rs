// src/formula/format.rs

//! Formula record definitions
//!
//! A formula describes one release of a tool: where its source archive
//! lives, the digest that archive must hash to, what it needs at build
//! time, how it installs and how to smoke-test the result. The TOML form
//! mirrors the fields one to one:
//!
//! ```toml
//! name = "sedot"
//! desc = "CLI video scraper for Instagram posts/reels and Threads"
//! homepage = "https://github.com/foozio/homebrew-sedot-cli"
//! url = "https://github.com/foozio/homebrew-sedot-cli/archive/refs/tags/v0.1.1.tar.gz"
//! sha256 = "3259a4974d44c5c636af8811814bca507de5ec8d4157dc5d544997e1c827fef4"
//! license = "MIT"
//! includes = ["Language::Python::Virtualenv"]
//! install = "virtualenv_install_with_resources"
//!
//! [[depends_on]]
//! name = "python@3.9"
//!
//! [test]
//! program = "sedot"
//! args = ["--help"]
//! ```

use crate::error::{Error, Result};
use crate::hash::{Hash, HashAlgorithm};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Archive suffixes recognised in source URLs, longest first
pub const ARCHIVE_EXTENSIONS: &[&str] = &[
    ".tar.gz", ".tar.bz2", ".tar.xz", ".tar.zst", ".tgz", ".tbz2", ".txz", ".zip",
];

/// Install body that delegates to the virtualenv installer
pub const VIRTUALENV_INSTALL: &str = "virtualenv_install_with_resources";

/// A package formula
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formula {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,

    /// Versioned source archive
    pub url: String,

    /// Expected SHA-256 of the archive at `url`
    pub sha256: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    /// Ruby modules mixed into the formula class
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<String>,

    #[serde(default)]
    pub install: InstallMethod,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<Dependency>,

    #[serde(default)]
    pub test: SmokeTest,
}

/// A `depends_on` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Formula name, optionally pinned as `name@version`
    pub name: String,

    /// Needed only while building
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub build_only: bool,
}

impl Dependency {
    pub fn runtime(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            build_only: false,
        }
    }

    pub fn build(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            build_only: true,
        }
    }

    /// Split `python@3.9` into `("python", Some("3.9"))`
    pub fn runtime_version(&self) -> (&str, Option<&str>) {
        match self.name.split_once('@') {
            Some((name, version)) if !version.is_empty() => (name, Some(version)),
            Some((name, _)) => (name, None),
            None => (self.name.as_str(), None),
        }
    }
}

/// How the formula installs itself
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InstallMethod {
    /// Build a virtualenv with the package and its declared resources
    #[default]
    VirtualenvWithResources,
    /// Verbatim body of `def install`
    Custom(String),
}

impl From<String> for InstallMethod {
    fn from(body: String) -> Self {
        let trimmed = body.trim();
        if trimmed == VIRTUALENV_INSTALL {
            Self::VirtualenvWithResources
        } else {
            Self::Custom(trimmed.to_string())
        }
    }
}

impl From<InstallMethod> for String {
    fn from(method: InstallMethod) -> Self {
        match method {
            InstallMethod::VirtualenvWithResources => VIRTUALENV_INSTALL.to_string(),
            InstallMethod::Custom(body) => body,
        }
    }
}

/// Post-install check: run the program and require exit status 0
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmokeTest {
    /// Installed binary name, resolved under the formula's `bin`
    #[serde(default)]
    pub program: String,

    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for SmokeTest {
    fn default() -> Self {
        Self {
            program: String::new(),
            args: vec!["--help".to_string()],
        }
    }
}

impl SmokeTest {
    /// `#{bin}/<name> --help`
    pub fn help_for(name: &str) -> Self {
        Self {
            program: name.to_string(),
            ..Self::default()
        }
    }
}

impl Formula {
    /// Ruby class name, e.g. `sedot-cli` becomes `SedotCli`
    ///
    /// The mapping drops separators, so it cannot be reversed exactly:
    /// `python@3.9` becomes `PythonAT39`. The formula file name keeps the
    /// real name.
    pub fn class_name(&self) -> String {
        class_name_for(&self.name)
    }

    /// Last path segment of the source url
    pub fn archive_filename(&self) -> String {
        self.url
            .split(['?', '#'])
            .next()
            .unwrap_or(&self.url)
            .split('/')
            .filter(|s| !s.is_empty())
            .next_back()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}.tar.gz", self.name))
    }

    /// Version encoded in the source url
    ///
    /// Recognises a `v1.2.3` tag archive and a `name-1.2.3` stem.
    pub fn version(&self) -> Option<String> {
        let filename = self.archive_filename();
        let stem = strip_archive_extension(&filename)?;

        if let Some(rest) = stem.strip_prefix('v').filter(|r| starts_with_digit(r)) {
            return Some(rest.to_string());
        }
        if starts_with_digit(stem) {
            return Some(stem.to_string());
        }
        stem.rsplit_once('-')
            .map(|(_, version)| version.strip_prefix('v').unwrap_or(version))
            .filter(|v| starts_with_digit(v))
            .map(str::to_string)
    }

    /// Whether the source url ends in a known archive extension
    pub fn has_archive_url(&self) -> bool {
        strip_archive_extension(&self.archive_filename()).is_some()
    }

    /// New record for another release
    ///
    /// The current version is replaced in the archive filename and in any
    /// version path segment, and the digest swapped. The receiver is left
    /// untouched.
    pub fn bump(&self, version: &str, sha256: &str) -> Result<Formula> {
        let digest = Hash::new(HashAlgorithm::Sha256, sha256).map_err(|e| Error::InvalidDigest {
            value: sha256.to_string(),
            reason: e.to_string(),
        })?;

        let version = version.trim().trim_start_matches('v');
        if version.is_empty() || version.contains(['/', ' ']) {
            return Err(Error::ParseError(format!("Invalid version: '{}'", version)));
        }

        let current = self.version().ok_or_else(|| {
            Error::ParseError(format!("Cannot determine the version of {}", self.url))
        })?;

        let url = replace_url_version(&self.url, &current, version).ok_or_else(|| {
            Error::ParseError(format!("Cannot locate version {} in {}", current, self.url))
        })?;

        let mut bumped = self.clone();
        bumped.url = url;
        bumped.sha256 = digest.value;
        Ok(bumped)
    }

    /// Render as a Homebrew Ruby formula
    pub fn to_ruby(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "class {} < Formula", self.class_name());
        for module in &self.includes {
            let _ = writeln!(out, "  include {}", module);
        }
        if !self.includes.is_empty() {
            out.push('\n');
        }

        if let Some(desc) = &self.desc {
            let _ = writeln!(out, "  desc \"{}\"", ruby_escape(desc));
        }
        if let Some(homepage) = &self.homepage {
            let _ = writeln!(out, "  homepage \"{}\"", ruby_escape(homepage));
        }
        let _ = writeln!(out, "  url \"{}\"", ruby_escape(&self.url));
        let _ = writeln!(out, "  sha256 \"{}\"", ruby_escape(&self.sha256));
        if let Some(license) = &self.license {
            let _ = writeln!(out, "  license \"{}\"", ruby_escape(license));
        }

        if !self.depends_on.is_empty() {
            out.push('\n');
            for dep in &self.depends_on {
                if dep.build_only {
                    let _ = writeln!(out, "  depends_on \"{}\" => :build", ruby_escape(&dep.name));
                } else {
                    let _ = writeln!(out, "  depends_on \"{}\"", ruby_escape(&dep.name));
                }
            }
        }

        out.push_str("\n  def install\n");
        let body = String::from(self.install.clone());
        for line in body.lines() {
            if line.trim().is_empty() {
                out.push('\n');
            } else {
                let _ = writeln!(out, "    {}", line.trim());
            }
        }
        out.push_str("  end\n");

        out.push_str("\n  test do\n");
        let program = if self.test.program.is_empty() {
            self.name.as_str()
        } else {
            self.test.program.as_str()
        };
        let mut call = format!("    system \"{}\"", ruby_program_path(program));
        for arg in &self.test.args {
            let _ = write!(call, ", \"{}\"", ruby_escape(arg));
        }
        out.push_str(&call);
        out.push_str("\n  end\nend\n");
        out
    }
}

/// Homebrew class name for a formula name
pub fn class_name_for(name: &str) -> String {
    let mut class = String::with_capacity(name.len());
    let mut upper_next = true;
    for c in name.chars() {
        match c {
            '-' | '_' | '.' | ' ' => upper_next = true,
            '@' => {
                class.push_str("AT");
                upper_next = true;
            }
            '+' => class.push('x'),
            c if upper_next => {
                class.extend(c.to_uppercase());
                upper_next = false;
            }
            c => class.push(c),
        }
    }
    class
}

/// Archive stem with its extension removed, or `None` for non-archives
pub fn strip_archive_extension(filename: &str) -> Option<&str> {
    let lower = filename.to_ascii_lowercase();
    ARCHIVE_EXTENSIONS
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map(|ext| &filename[..filename.len() - ext.len()])
}

fn starts_with_digit(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// Swap `current` for `new` in a source url
///
/// Only the archive filename and whole `<ver>` or `v<ver>` path segments
/// change. Host, query and fragment are kept as they are.
fn replace_url_version(url: &str, current: &str, new: &str) -> Option<String> {
    let (path, suffix) = url.split_at(url.find(['?', '#']).unwrap_or(url.len()));
    let path_start = match path.find("://") {
        Some(i) => path[i + 3..].find('/').map_or(path.len(), |j| i + 3 + j),
        None => 0,
    };
    let (authority, path) = path.split_at(path_start);
    let trimmed = path.trim_end_matches('/');
    let trailing = &path[trimmed.len()..];

    let (dir, filename) = trimmed.rsplit_once('/')?;
    let stem = strip_archive_extension(filename)?;
    let prefix = stem.strip_suffix(current)?;
    let extension = &filename[stem.len()..];

    let tagged = format!("v{current}");
    let dir = dir
        .split('/')
        .map(|segment| {
            if segment == current {
                new.to_string()
            } else if segment == tagged {
                format!("v{new}")
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/");

    Some(format!("{authority}{dir}/{prefix}{new}{extension}{trailing}{suffix}"))
}

/// Quote-safe Ruby string contents, with interpolation disabled
fn ruby_escape(value: &str) -> String {
    ruby_escape_quotes(value).replace("#{", "\\#{")
}

fn ruby_escape_quotes(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn ruby_program_path(program: &str) -> String {
    if program.contains("#{") {
        ruby_escape_quotes(program)
    } else if program.contains('/') {
        ruby_escape(program)
    } else {
        format!("#{{bin}}/{}", ruby_escape(program))
    }
}
