// src/error.rs

//! Error types shared by the library
//!
//! Most variants carry a preformatted message; callers build the message at
//! the point of failure where the context (URL, path) is known.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem failure
    #[error("I/O error: {0}")]
    IoError(String),

    /// Malformed input (formula, config, HTML payload)
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Transfer failed after the server answered
    #[error("Download error: {0}")]
    DownloadError(String),

    /// HTTP client could not be constructed
    #[error("Initialization error: {0}")]
    InitError(String),

    /// Downloaded bytes do not match the declared digest
    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    /// Digest string is not a well-formed hash
    #[error("Invalid digest '{value}': {reason}")]
    InvalidDigest { value: String, reason: String },

    /// Video metadata could not be retrieved from a page
    #[error("{0}")]
    Scrape(String),

    /// No scraper accepts the URL's domain
    #[error("sedot does not support the domain in '{0}'. Pass a full Instagram or Threads post URL.")]
    UnsupportedUrl(String),

    /// Target file exists and overwriting was not requested
    #[error("{} already exists. Use --overwrite to replace it.", .0.display())]
    FileExists(PathBuf),

    /// Server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    /// Connection-level failure (DNS, TLS, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Configuration file is unreadable or invalid
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err.to_string())
    }
}
