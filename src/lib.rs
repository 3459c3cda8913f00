// src/lib.rs

//! sedot
//!
//! Downloads videos from public Instagram posts/reels and Threads posts,
//! and maintains the package formula used to distribute the tool.
//!
//! # Architecture
//!
//! - Scrapers: one per platform, selected by the URL's domain
//! - Transport: GET-only HTTP seam so scraping and downloads run offline in tests
//! - Downloads: streamed to a `.part` file and renamed into place
//! - Formulas: typed package records, validated before any network fetch

pub mod client;
pub mod config;
pub mod download;
mod error;
pub mod filename;
pub mod formula;
pub mod hash;
pub mod progress;
pub mod scrape;

pub use client::{HttpClient, RemoteBody, Transport};
pub use config::SedotConfig;
pub use download::{normalize_url, DownloadResult, VideoDownloader};
pub use error::{Error, Result};
pub use formula::{parse_formula_file, validate_formula, Formula};
pub use hash::{Hash, HashAlgorithm, Hasher};
pub use progress::{LogProgress, ProgressTracker, SilentProgress};
pub use scrape::{Platform, Scraper, VideoMetadata};
