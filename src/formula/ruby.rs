// src/formula/ruby.rs

//! Homebrew Ruby formula reader
//!
//! Reads the declarative subset of the Homebrew DSL that simple formulas
//! use:
//!
//! ```ruby
//! class Sedot < Formula
//!   include Language::Python::Virtualenv
//!
//!   desc "CLI video scraper for Instagram posts/reels and Threads"
//!   homepage "https://github.com/foozio/homebrew-sedot-cli"
//!   url "https://github.com/foozio/homebrew-sedot-cli/archive/refs/tags/v0.1.1.tar.gz"
//!   sha256 "3259a4974d44c5c636af8811814bca507de5ec8d4157dc5d544997e1c827fef4"
//!   license "MIT"
//!
//!   depends_on "python@3.9"
//!
//!   def install
//!     virtualenv_install_with_resources
//!   end
//!
//!   test do
//!     system "#{bin}/sedot", "--help"
//!   end
//! end
//! ```
//!
//! # Limitations
//!
//! - Stanzas must be string literals on a single line
//! - `resource` blocks, `on_macos`/`on_linux` and bottles are ignored
//! - Only the first `system` call of the test block is kept

use crate::error::Error;
use crate::formula::format::{Dependency, Formula, InstallMethod, SmokeTest};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

macro_rules! regex {
    ($name:ident, $re:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($re).expect("Invalid regex"));
    };
}

regex!(CLASS_RE, r"(?m)^\s*class\s+([A-Z][A-Za-z0-9_]*)\s*<\s*Formula\b");
regex!(INCLUDE_RE, r"(?m)^\s*include\s+([A-Za-z0-9_:]+)\s*$");
regex!(
    STANZA_RE,
    r#"(?m)^\s*(desc|homepage|url|sha256|license)\s+"((?:[^"\\]|\\.)*)"\s*(?:#.*)?$"#
);
regex!(DEPENDS_RE, r#"(?m)^\s*depends_on\s+"([^"]+)"(\s*=>\s*:build)?"#);
regex!(INSTALL_RE, r"(?m)^\s*def\s+install\s*$");
regex!(TEST_RE, r"(?m)^\s*test\s+do\s*$");
regex!(SYSTEM_RE, r"^\s*system\s+(.+)$");
regex!(QUOTED_RE, r#""((?:[^"\\]|\\.)*)""#);

#[derive(Error, Debug)]
pub enum RubyFormulaError {
    #[error("Missing required stanza: {0}")]
    MissingStanza(String),

    #[error("Invalid formula: {0}")]
    Invalid(String),

    #[error("Unterminated block: {0}")]
    UnterminatedBlock(String),
}

impl From<RubyFormulaError> for Error {
    fn from(err: RubyFormulaError) -> Self {
        Error::ParseError(err.to_string())
    }
}

/// Parse a Homebrew Ruby formula
pub fn parse_ruby_formula(content: &str) -> Result<Formula, RubyFormulaError> {
    let class = CLASS_RE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| RubyFormulaError::Invalid("missing `class <Name> < Formula` declaration".to_string()))?;
    let name = name_from_class(&class);

    let mut desc = None;
    let mut homepage = None;
    let mut url = None;
    let mut sha256 = None;
    let mut license = None;

    for caps in STANZA_RE.captures_iter(content) {
        let value = unescape(&caps[2]);
        let slot = match &caps[1] {
            "desc" => &mut desc,
            "homepage" => &mut homepage,
            "url" => &mut url,
            "sha256" => &mut sha256,
            _ => &mut license,
        };
        // first occurrence wins; later ones belong to resource blocks
        if slot.is_none() {
            *slot = Some(value);
        }
    }

    let url = url.ok_or_else(|| RubyFormulaError::MissingStanza("url".to_string()))?;
    let sha256 = sha256.ok_or_else(|| RubyFormulaError::MissingStanza("sha256".to_string()))?;

    let includes = INCLUDE_RE
        .captures_iter(content)
        .map(|caps| caps[1].to_string())
        .collect();

    let depends_on = DEPENDS_RE
        .captures_iter(content)
        .map(|caps| Dependency {
            name: caps[1].to_string(),
            build_only: caps.get(2).is_some(),
        })
        .collect();

    let install = match extract_block(content, &INSTALL_RE, "def install")? {
        Some(body) => InstallMethod::from(body),
        None => InstallMethod::Custom(String::new()),
    };

    let test = match extract_block(content, &TEST_RE, "test do")? {
        Some(body) => parse_test_block(&body)?,
        None => SmokeTest::help_for(&name),
    };

    Ok(Formula {
        name,
        desc,
        homepage,
        url,
        sha256,
        license,
        includes,
        install,
        depends_on,
        test,
    })
}

/// `SedotCli` becomes `sedot-cli`, `PythonAT39` becomes `python@39`
///
/// Dots in version pins are lost in the class name, so the result is only a
/// fallback for formulas read without a file name.
fn name_from_class(class: &str) -> String {
    let mut name = String::with_capacity(class.len() + 4);
    let chars: Vec<char> = class.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == 'A' && chars.get(i + 1) == Some(&'T') && chars.get(i + 2).is_some_and(|n| n.is_ascii_digit()) {
            name.push('@');
            i += 2;
            continue;
        }
        if c.is_ascii_uppercase() {
            if i > 0 && !name.ends_with('@') {
                name.push('-');
            }
            name.push(c.to_ascii_lowercase());
        } else {
            name.push(c);
        }
        i += 1;
    }
    name
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn opens_block(line: &str) -> bool {
    const OPENERS: &[&str] = &[
        "if ", "unless ", "while ", "until ", "case ", "def ", "class ", "module ", "begin",
    ];
    OPENERS.iter().any(|kw| line.starts_with(kw))
        || line.ends_with(" do")
        || line.contains(" do |")
}

fn closes_block(line: &str) -> bool {
    line == "end" || line.starts_with("end ") || line.starts_with("end.")
}

/// Body of the `do`/`def` block whose header matches `header`
///
/// Nesting is tracked by keyword so bodies may contain their own blocks.
fn extract_block(content: &str, header: &Regex, label: &str) -> Result<Option<String>, RubyFormulaError> {
    let Some(m) = header.find(content) else {
        return Ok(None);
    };

    let rest = &content[m.end()..];
    let mut depth = 1;
    let mut body = Vec::new();
    for line in rest.lines() {
        let trimmed = line.trim();
        if closes_block(trimmed) {
            depth -= 1;
            if depth == 0 {
                let text = body.join("\n");
                return Ok(Some(dedent(&text)));
            }
        } else if opens_block(trimmed) {
            depth += 1;
        }
        body.push(line);
    }

    Err(RubyFormulaError::UnterminatedBlock(label.to_string()))
}

fn dedent(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn parse_test_block(body: &str) -> Result<SmokeTest, RubyFormulaError> {
    let call = body
        .lines()
        .find_map(|line| SYSTEM_RE.captures(line))
        .ok_or_else(|| RubyFormulaError::Invalid("test block has no `system` call".to_string()))?;

    let mut words = QUOTED_RE
        .captures_iter(&call[1])
        .map(|caps| unescape(&caps[1]));
    let program = words
        .next()
        .ok_or_else(|| RubyFormulaError::Invalid("`system` call has no program".to_string()))?;
    let program = program
        .strip_prefix("#{bin}/")
        .map(str::to_string)
        .unwrap_or(program);

    Ok(SmokeTest {
        program,
        args: words.collect(),
    })
}
