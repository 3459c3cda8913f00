// src/download.rs

//! Resolve post URLs and download their videos
//!
//! [`VideoDownloader`] ties the scrapers to a [`Transport`]: it normalises
//! the URL a user typed, picks the scraper that owns the domain, and
//! streams the video into the output directory. Files are written to a
//! `.part` sibling first and renamed into place once complete, so an
//! interrupted transfer never leaves a truncated video behind.

use crate::client::Transport;
use crate::error::{Error, Result};
use crate::progress::ProgressTracker;
use crate::scrape::{default_scrapers, Scraper, VideoMetadata};
use regex::Regex;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info};
use url::Url;

/// Chunk size for streaming downloads (8 KB)
const STREAM_BUFFER_SIZE: usize = 8192;

/// Suffix of in-flight downloads
const PARTIAL_SUFFIX: &str = ".part";

/// A scheme at the very start of the input
static SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").expect("Invalid regex"));

/// A completed download
#[derive(Debug, Clone)]
pub struct DownloadResult {
    pub metadata: VideoMetadata,
    pub output_path: PathBuf,
    pub bytes: u64,
}

pub struct VideoDownloader<T: Transport> {
    transport: T,
    scrapers: Vec<Box<dyn Scraper>>,
}

impl<T: Transport> VideoDownloader<T> {
    /// Downloader with the built-in Instagram and Threads scrapers
    pub fn new(transport: T) -> Self {
        Self::with_scrapers(transport, default_scrapers())
    }

    pub fn with_scrapers(transport: T, scrapers: Vec<Box<dyn Scraper>>) -> Self {
        Self { transport, scrapers }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolve a user-supplied post URL to video metadata
    pub fn fetch_metadata(&self, raw_url: &str) -> Result<VideoMetadata> {
        let url = normalize_url(raw_url)?;
        let scraper = self
            .scrapers
            .iter()
            .find(|s| s.can_handle(&url))
            .ok_or_else(|| Error::UnsupportedUrl(raw_url.to_string()))?;
        debug!("{} handled by {} scraper", url, scraper.platform());
        scraper.scrape(&url, &self.transport)
    }

    /// Download the video described by `metadata` into `output_dir`
    pub fn download(
        &self,
        metadata: &VideoMetadata,
        output_dir: &Path,
        overwrite: bool,
        progress: &dyn ProgressTracker,
    ) -> Result<DownloadResult> {
        fs::create_dir_all(output_dir).map_err(|e| {
            Error::IoError(format!("Failed to create directory {}: {e}", output_dir.display()))
        })?;

        let file_path = output_dir.join(&metadata.filename);
        if file_path.exists() && !overwrite {
            return Err(Error::FileExists(file_path));
        }

        info!("Downloading {} to {}", metadata.video_url, file_path.display());
        let body = self.transport.open(&metadata.video_url)?;
        progress.set_length(body.content_length.unwrap_or(0));
        progress.set_message(&metadata.filename);

        let partial_path = partial_path_for(&file_path);
        let written = match stream_to_file(body.reader, &partial_path, progress) {
            Ok(n) => n,
            Err(e) => {
                let _ = fs::remove_file(&partial_path);
                progress.finish_with_error(&e.to_string());
                return Err(e);
            }
        };

        fs::rename(&partial_path, &file_path).map_err(|e| {
            let _ = fs::remove_file(&partial_path);
            Error::IoError(format!(
                "Failed to move {} to {}: {e}",
                partial_path.display(),
                file_path.display()
            ))
        })?;

        progress.finish_with_message(&format!("{} [done]", metadata.filename));
        info!("Downloaded {} bytes to {}", written, file_path.display());

        Ok(DownloadResult {
            metadata: metadata.clone(),
            output_path: file_path,
            bytes: written,
        })
    }
}

/// Clean up a URL typed by a user
///
/// Surrounding whitespace is dropped and `https://` is assumed when no
/// scheme is given. Only http(s) URLs with a host are accepted.
pub fn normalize_url(raw_url: &str) -> Result<Url> {
    let candidate = raw_url.trim();
    if candidate.is_empty() {
        return Err(Error::Scrape("Empty URL provided.".to_string()));
    }
    let candidate = if SCHEME_RE.is_match(candidate) {
        candidate.to_string()
    } else {
        format!("https://{candidate}")
    };

    let url = Url::parse(&candidate)
        .map_err(|e| Error::Scrape(format!("Invalid URL '{}': {e}", raw_url.trim())))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        _ => Err(Error::UnsupportedUrl(raw_url.to_string())),
    }
}

fn partial_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}

/// Copy the body to `dest` in chunks, reporting each chunk
fn stream_to_file(
    mut reader: Box<dyn Read + Send>,
    dest: &Path,
    progress: &dyn ProgressTracker,
) -> Result<u64> {
    let mut file = File::create(dest)
        .map_err(|e| Error::IoError(format!("Failed to create file {}: {e}", dest.display())))?;

    let mut written: u64 = 0;
    let mut buffer = [0u8; STREAM_BUFFER_SIZE];
    loop {
        let n = reader
            .read(&mut buffer)
            .map_err(|e| Error::Network(format!("Failed to read response: {e}")))?;
        if n == 0 {
            break;
        }
        file.write_all(&buffer[..n])
            .map_err(|e| Error::IoError(format!("Failed to write data: {e}")))?;
        written += n as u64;
        progress.increment(n as u64);
    }
    file.flush()
        .map_err(|e| Error::IoError(format!("Failed to flush {}: {e}", dest.display())))?;
    Ok(written)
}
