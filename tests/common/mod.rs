// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use sedot::client::{RemoteBody, Transport};
use sedot::Error;
use std::collections::HashMap;
use std::io::{self, Cursor, Read};
use std::sync::Mutex;

/// Digest of the v0.1.1 release archive as published in the formula
pub const RELEASE_DIGEST: &str = "3259a4974d44c5c636af8811814bca507de5ec8d4157dc5d544997e1c827fef4";

/// Canned answer for one URL
#[derive(Clone)]
pub enum FakeResponse {
    Page(String),
    Body(Vec<u8>),
    /// Body that fails after yielding the given bytes
    Broken(Vec<u8>),
    Status(u16),
    Unreachable,
}

/// In-memory [`Transport`] that records every request
#[derive(Default)]
pub struct FakeTransport {
    responses: HashMap<String, FakeResponse>,
    requests: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, response: FakeResponse) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    pub fn page(self, url: &str, html: &str) -> Self {
        self.with(url, FakeResponse::Page(html.to_string()))
    }

    pub fn body(self, url: &str, bytes: &[u8]) -> Self {
        self.with(url, FakeResponse::Body(bytes.to_vec()))
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn lookup(&self, url: &str) -> sedot::Result<FakeResponse> {
        self.requests.lock().unwrap().push(url.to_string());
        match self.responses.get(url) {
            Some(FakeResponse::Status(status)) => Err(Error::Http {
                status: *status,
                url: url.to_string(),
            }),
            Some(FakeResponse::Unreachable) => {
                Err(Error::Network(format!("Failed to fetch {url}: connection refused")))
            }
            Some(response) => Ok(response.clone()),
            None => Err(Error::Http {
                status: 404,
                url: url.to_string(),
            }),
        }
    }
}

impl Transport for FakeTransport {
    fn get_text(&self, url: &str) -> sedot::Result<String> {
        match self.lookup(url)? {
            FakeResponse::Page(html) => Ok(html),
            FakeResponse::Body(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            _ => Err(Error::Network(format!("Failed to read response from {url}"))),
        }
    }

    fn open(&self, url: &str) -> sedot::Result<RemoteBody> {
        match self.lookup(url)? {
            FakeResponse::Page(html) => Ok(RemoteBody {
                content_length: Some(html.len() as u64),
                reader: Box::new(Cursor::new(html.into_bytes())),
            }),
            FakeResponse::Body(bytes) => Ok(RemoteBody {
                content_length: Some(bytes.len() as u64),
                reader: Box::new(Cursor::new(bytes)),
            }),
            FakeResponse::Broken(bytes) => Ok(RemoteBody {
                content_length: Some(bytes.len() as u64 * 2),
                reader: Box::new(BrokenReader {
                    inner: Cursor::new(bytes),
                }),
            }),
            _ => Err(Error::Network(format!("Failed to open {url}"))),
        }
    }
}

/// Yields its bytes, then fails like a dropped connection
struct BrokenReader {
    inner: Cursor<Vec<u8>>,
}

impl Read for BrokenReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.inner.read(buf)? {
            0 => Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset")),
            n => Ok(n),
        }
    }
}

/// Post page exposing its video through Open Graph tags
pub fn og_page(video_url: &str, title: Option<&str>, caption: Option<&str>) -> String {
    let mut head = format!(r#"<meta property="og:video:secure_url" content="{video_url}">"#);
    if let Some(title) = title {
        head.push_str(&format!(r#"<meta property="og:title" content="{title}">"#));
    }
    if let Some(caption) = caption {
        head.push_str(&format!(r#"<meta property="og:description" content="{caption}">"#));
    }
    format!("<!DOCTYPE html><html><head>{head}</head><body></body></html>")
}

/// Post page exposing its video only through JSON-LD
pub fn json_ld_page(video_url: &str) -> String {
    format!(
        r#"<html><head><meta property="og:title" content="Clip"></head><body>
<script type="application/ld+json">{{"@context":"https://schema.org","@type":"SocialMediaPosting","video":[{{"@type":"VideoObject","contentUrl":"{video_url}"}}]}}</script>
</body></html>"#
    )
}

/// The sedot formula with the given digest
pub fn sedot_formula_rb(sha256: &str) -> String {
    format!(
        r##"class Sedot < Formula
  include Language::Python::Virtualenv

  desc "CLI video scraper for Instagram posts/reels and Threads"
  homepage "https://github.com/foozio/homebrew-sedot-cli"
  url "https://github.com/foozio/homebrew-sedot-cli/archive/refs/tags/v0.1.1.tar.gz"
  sha256 "{sha256}"
  license "MIT"

  depends_on "python@3.9"

  def install
    virtualenv_install_with_resources
  end

  test do
    system "#{{bin}}/sedot", "--help"
  end
end
"##
    )
}

/// TOML formula for a fake archive served at `url`
pub fn archive_formula_toml(url: &str, sha256: &str) -> String {
    format!(
        r#"name = "sedot"
desc = "CLI video scraper for Instagram posts/reels and Threads"
homepage = "https://github.com/foozio/homebrew-sedot-cli"
url = "{url}"
sha256 = "{sha256}"
license = "MIT"

[[depends_on]]
name = "python@3.9"
"#
    )
}
