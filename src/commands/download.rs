// src/commands/download.rs

//! Default command - download videos from post URLs

use super::output::{output_table, print_metadata};
use super::progress::CliProgress;
use anyhow::{Context, Result};
use sedot::client::HttpClient;
use sedot::config::SedotConfig;
use sedot::download::{DownloadResult, VideoDownloader};
use sedot::progress::{LogProgress, ProgressTracker, SilentProgress};
use sedot::Error;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{debug, info};

/// Options for a download run, after config and flags are merged
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub output_dir: PathBuf,
    pub overwrite: bool,
    pub dry_run: bool,
    pub show_metadata: bool,
    pub quiet: bool,
}

/// A URL that could not be downloaded
#[derive(Debug)]
struct Failure {
    url: String,
    reason: String,
}

/// Download every URL in turn
///
/// Failures do not stop the run; they are reported as they happen and
/// summarised at the end. Returns the number of failed URLs.
pub fn cmd_download(urls: &[String], options: &DownloadOptions, config: &SedotConfig) -> Result<usize> {
    let client = HttpClient::new(&config.http).context("Failed to create HTTP client")?;
    let downloader = VideoDownloader::new(client);

    let mut success: Vec<DownloadResult> = Vec::new();
    let mut failures: Vec<Failure> = Vec::new();

    for url in urls {
        if !options.quiet {
            println!("Processing {}", url);
        }
        match process_url(&downloader, url, options) {
            Ok(Some(result)) => {
                if !options.quiet {
                    println!("Saved to {}", result.output_path.display());
                }
                success.push(result);
            }
            Ok(None) => {}
            Err(e) => {
                let reason = report_failure(url, &e);
                failures.push(Failure {
                    url: url.clone(),
                    reason,
                });
            }
        }
    }

    println!();
    if !success.is_empty() && !options.quiet {
        println!("Downloads");
        let rows: Vec<Vec<String>> = success
            .iter()
            .map(|r| vec![r.output_path.display().to_string(), r.metadata.source_url.clone()])
            .collect();
        output_table(&["File", "Source"], &rows);
    }

    if failures.is_empty() {
        println!("All downloads completed successfully.");
    } else {
        for failure in &failures {
            debug!("{} failed: {}", failure.url, failure.reason);
        }
        println!("{} download(s) failed.", failures.len());
    }

    Ok(failures.len())
}

fn process_url(
    downloader: &VideoDownloader<HttpClient>,
    url: &str,
    options: &DownloadOptions,
) -> sedot::Result<Option<DownloadResult>> {
    let metadata = downloader.fetch_metadata(url)?;
    info!("Resolved {} to {}", url, metadata.video_url);

    if options.dry_run || options.show_metadata {
        print_metadata(&metadata);
    }
    if options.dry_run {
        return Ok(None);
    }

    let progress = progress_for(&metadata.filename, options.quiet);
    downloader
        .download(&metadata, &options.output_dir, options.overwrite, progress.as_ref())
        .map(Some)
}

fn progress_for(name: &str, quiet: bool) -> Box<dyn ProgressTracker> {
    if quiet {
        Box::new(SilentProgress::new())
    } else if std::io::stderr().is_terminal() {
        Box::new(CliProgress::new(name))
    } else {
        Box::new(LogProgress::new(name))
    }
}

/// Print a classified failure line and return the summary reason
fn report_failure(url: &str, err: &Error) -> String {
    match err {
        Error::FileExists(_) => {
            println!("Skipping: {}", err);
            err.to_string()
        }
        Error::Scrape(_) | Error::UnsupportedUrl(_) => {
            println!("Error: {}", err);
            err.to_string()
        }
        Error::Http { status, .. } => {
            println!("HTTP error while downloading {}: {}", url, err);
            format!("HTTP error {}", status)
        }
        Error::Network(_) => {
            println!("Network error while downloading {}: {}", url, err);
            err.to_string()
        }
        other => {
            println!("Error: {}", other);
            other.to_string()
        }
    }
}
