// src/formula/mod.rs

//! Package formulas for distributing sedot
//!
//! A formula is the declarative record a package manager reads to install
//! a release:
//! - Identity: name, description, homepage, license
//! - Source: a versioned archive URL and its SHA-256
//! - Dependencies, optionally pinned (`python@3.9`) or build-only
//! - Install method and a post-install smoke test
//!
//! Formulas are read from TOML or from the Homebrew Ruby DSL, validated
//! without touching the network, and rendered back to Ruby. A release bump
//! produces a new record; existing records are never mutated.
//!
//! # Lifecycle
//!
//! ```text
//! parse -> validate -> verify_source (fetch + digest check) -> bump -> to_ruby
//! ```

mod format;
pub mod parser;
mod ruby;
mod source;

pub use format::{
    strip_archive_extension, Dependency, Formula, InstallMethod, SmokeTest, ARCHIVE_EXTENSIONS,
    VIRTUALENV_INSTALL,
};
pub use parser::{parse_formula_file, parse_formula_toml, validate_formula};
pub use ruby::{parse_ruby_formula, RubyFormulaError};
pub use source::{compute_digest, verify_source};
