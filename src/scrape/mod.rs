// src/scrape/mod.rs

//! Video metadata scrapers
//!
//! A [`Scraper`] claims URLs by domain and turns a post page into
//! [`VideoMetadata`]. Instagram and Threads pages share the same Open Graph
//! layout, so one [`PlatformScraper`] serves both.

mod html;

pub use html::{extract_page_metadata, meta_content, walk_json_for_video, PageMetadata};

use crate::client::Transport;
use crate::error::{Error, Result};
use crate::filename::build_filename;
use serde::Serialize;
use std::fmt;
use tracing::info;
use url::Url;

/// Supported sites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Threads,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Instagram, Platform::Threads];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Instagram => "instagram",
            Self::Threads => "threads",
        }
    }

    /// Registrable domains served by this platform
    pub const fn domains(&self) -> &'static [&'static str] {
        match self {
            Self::Instagram => &["instagram.com"],
            Self::Threads => &["threads.net", "threads.com", "www.threads.com"],
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to download one video
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoMetadata {
    pub platform: Platform,
    /// Normalised post URL
    pub source_url: String,
    /// Direct media URL
    pub video_url: String,
    /// Output filename, `.mp4` included
    pub filename: String,
    pub title: Option<String>,
    pub caption: Option<String>,
}

/// `true` when `host` is `domain` or a subdomain of it
pub fn host_matches(host: &str, domains: &[&str]) -> bool {
    let host = host.to_ascii_lowercase();
    domains
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")))
}

pub trait Scraper: Send + Sync {
    fn platform(&self) -> Platform;

    fn domains(&self) -> &[&str] {
        self.platform().domains()
    }

    fn can_handle(&self, url: &Url) -> bool {
        url.host_str()
            .is_some_and(|host| host_matches(host, self.domains()))
    }

    fn scrape(&self, url: &Url, transport: &dyn Transport) -> Result<VideoMetadata>;
}

/// Open Graph / JSON-LD scraper for one platform
#[derive(Debug, Clone, Copy)]
pub struct PlatformScraper {
    platform: Platform,
}

impl PlatformScraper {
    pub const fn new(platform: Platform) -> Self {
        Self { platform }
    }

    pub const fn instagram() -> Self {
        Self::new(Platform::Instagram)
    }

    pub const fn threads() -> Self {
        Self::new(Platform::Threads)
    }
}

impl Scraper for PlatformScraper {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn scrape(&self, url: &Url, transport: &dyn Transport) -> Result<VideoMetadata> {
        info!("Scraping {} post {}", self.platform, url);
        let html = transport.get_text(url.as_str())?;
        extract_video_metadata(&html, url.as_str(), self.platform)
    }
}

/// Build [`VideoMetadata`] from a fetched page
pub fn extract_video_metadata(html: &str, source_url: &str, platform: Platform) -> Result<VideoMetadata> {
    let page = extract_page_metadata(html);
    let video_url = page.video_url.ok_or_else(|| {
        Error::Scrape("Unable to locate video URL in the page metadata.".to_string())
    })?;
    let filename = build_filename(page.title.as_deref(), source_url, platform.as_str());

    Ok(VideoMetadata {
        platform,
        source_url: source_url.to_string(),
        video_url,
        filename,
        title: page.title,
        caption: page.caption,
    })
}

/// Scrapers for every supported platform, in lookup order
pub fn default_scrapers() -> Vec<Box<dyn Scraper>> {
    Platform::ALL
        .into_iter()
        .map(|p| Box::new(PlatformScraper::new(p)) as Box<dyn Scraper>)
        .collect()
}
