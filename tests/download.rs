// tests/download.rs

//! Scrape-and-download flow against an in-memory transport.

mod common;

use common::{json_ld_page, og_page, FakeResponse, FakeTransport};
use sedot::progress::{ProgressTracker, SilentProgress};
use sedot::{Error, Platform, VideoDownloader};
use std::fs;

const REEL_URL: &str = "https://www.instagram.com/reel/C9xYz12/";
const THREADS_URL: &str = "https://www.threads.net/@someone/post/DAbc34";
const VIDEO_URL: &str = "https://cdn.example.com/v/clip.mp4";

fn video_bytes() -> Vec<u8> {
    (0..20_000u32).map(|i| (i % 251) as u8).collect()
}

#[test]
fn test_fetch_instagram_metadata() {
    let transport = FakeTransport::new().page(REEL_URL, &og_page(VIDEO_URL, Some("Morning Run"), Some("5k done")));
    let downloader = VideoDownloader::new(transport);

    // scheme is added and whitespace trimmed before lookup
    let metadata = downloader.fetch_metadata("  www.instagram.com/reel/C9xYz12/ ").unwrap();

    assert_eq!(metadata.platform, Platform::Instagram);
    assert_eq!(metadata.source_url, REEL_URL);
    assert_eq!(metadata.video_url, VIDEO_URL);
    assert_eq!(metadata.title.as_deref(), Some("Morning Run"));
    assert_eq!(metadata.caption.as_deref(), Some("5k done"));
    assert_eq!(metadata.filename, "instagram-morning-run-c9xyz12.mp4");
    assert_eq!(downloader.transport().requests(), vec![REEL_URL.to_string()]);
}

#[test]
fn test_fetch_threads_metadata_from_json_ld() {
    let transport = FakeTransport::new().page(THREADS_URL, &json_ld_page(VIDEO_URL));
    let downloader = VideoDownloader::new(transport);

    let metadata = downloader.fetch_metadata(THREADS_URL).unwrap();
    assert_eq!(metadata.platform, Platform::Threads);
    assert_eq!(metadata.video_url, VIDEO_URL);
    assert_eq!(metadata.filename, "threads-clip-dabc34.mp4");
}

#[test]
fn test_unsupported_domain_makes_no_request() {
    let downloader = VideoDownloader::new(FakeTransport::new());

    let err = downloader.fetch_metadata("https://www.youtube.com/watch?v=abc").unwrap_err();
    assert!(matches!(err, Error::UnsupportedUrl(_)));
    assert_eq!(
        err.to_string(),
        "sedot does not support the domain in 'https://www.youtube.com/watch?v=abc'. \
         Pass a full Instagram or Threads post URL."
    );
    assert!(downloader.transport().requests().is_empty());
}

#[test]
fn test_page_without_video() {
    let transport = FakeTransport::new().page(REEL_URL, r#"<meta property="og:title" content="Photo">"#);
    let downloader = VideoDownloader::new(transport);

    let err = downloader.fetch_metadata(REEL_URL).unwrap_err();
    assert!(matches!(err, Error::Scrape(_)));
}

#[test]
fn test_page_http_error() {
    let transport = FakeTransport::new().with(REEL_URL, FakeResponse::Status(429));
    let downloader = VideoDownloader::new(transport);

    match downloader.fetch_metadata(REEL_URL) {
        Err(Error::Http { status, .. }) => assert_eq!(status, 429),
        other => panic!("expected HTTP error, got {:?}", other),
    }
}

#[test]
fn test_download_writes_file() {
    let bytes = video_bytes();
    let transport = FakeTransport::new()
        .page(REEL_URL, &og_page(VIDEO_URL, None, None))
        .body(VIDEO_URL, &bytes);
    let downloader = VideoDownloader::new(transport);
    let dir = tempfile::tempdir().unwrap();
    let output_dir = dir.path().join("nested").join("out");

    let metadata = downloader.fetch_metadata(REEL_URL).unwrap();
    let progress = SilentProgress::new();
    let result = downloader.download(&metadata, &output_dir, false, &progress).unwrap();

    assert_eq!(result.output_path, output_dir.join("instagram-c9xyz12.mp4"));
    assert_eq!(result.bytes, bytes.len() as u64);
    assert_eq!(fs::read(&result.output_path).unwrap(), bytes);
    assert!(!output_dir.join("instagram-c9xyz12.mp4.part").exists());

    assert_eq!(progress.length(), bytes.len() as u64);
    assert_eq!(progress.position(), bytes.len() as u64);
    assert!(progress.is_finished());
}

#[test]
fn test_existing_file_is_not_replaced() {
    let transport = FakeTransport::new()
        .page(REEL_URL, &og_page(VIDEO_URL, None, None))
        .body(VIDEO_URL, b"new video");
    let downloader = VideoDownloader::new(transport);
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("instagram-c9xyz12.mp4");
    fs::write(&target, b"old video").unwrap();

    let metadata = downloader.fetch_metadata(REEL_URL).unwrap();
    let err = downloader
        .download(&metadata, dir.path(), false, &SilentProgress::new())
        .unwrap_err();

    assert!(matches!(err, Error::FileExists(ref path) if *path == target));
    assert!(err.to_string().ends_with("already exists. Use --overwrite to replace it."));
    assert_eq!(fs::read(&target).unwrap(), b"old video");
    // the video itself was never requested
    assert!(!downloader.transport().requests().contains(&VIDEO_URL.to_string()));
}

#[test]
fn test_overwrite_replaces_file() {
    let transport = FakeTransport::new()
        .page(REEL_URL, &og_page(VIDEO_URL, None, None))
        .body(VIDEO_URL, b"new video");
    let downloader = VideoDownloader::new(transport);
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("instagram-c9xyz12.mp4");
    fs::write(&target, b"old video").unwrap();

    let metadata = downloader.fetch_metadata(REEL_URL).unwrap();
    downloader
        .download(&metadata, dir.path(), true, &SilentProgress::new())
        .unwrap();

    assert_eq!(fs::read(&target).unwrap(), b"new video");
}

#[test]
fn test_interrupted_download_leaves_nothing_behind() {
    let transport = FakeTransport::new()
        .page(REEL_URL, &og_page(VIDEO_URL, None, None))
        .with(VIDEO_URL, FakeResponse::Broken(video_bytes()));
    let downloader = VideoDownloader::new(transport);
    let dir = tempfile::tempdir().unwrap();

    let metadata = downloader.fetch_metadata(REEL_URL).unwrap();
    let progress = SilentProgress::new();
    let err = downloader
        .download(&metadata, dir.path(), false, &progress)
        .unwrap_err();

    assert!(matches!(err, Error::Network(_)));
    assert!(!dir.path().join("instagram-c9xyz12.mp4").exists());
    assert!(!dir.path().join("instagram-c9xyz12.mp4.part").exists());
    assert!(progress.is_finished());
}

#[test]
fn test_video_http_error_is_reported() {
    let transport = FakeTransport::new()
        .page(THREADS_URL, &og_page(VIDEO_URL, None, None))
        .with(VIDEO_URL, FakeResponse::Status(403));
    let downloader = VideoDownloader::new(transport);
    let dir = tempfile::tempdir().unwrap();

    let metadata = downloader.fetch_metadata(THREADS_URL).unwrap();
    let err = downloader
        .download(&metadata, dir.path(), false, &SilentProgress::new())
        .unwrap_err();

    assert!(matches!(err, Error::Http { status: 403, .. }));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}
