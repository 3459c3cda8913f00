// src/scrape/html.rs

//! Metadata extraction from post pages
//!
//! Instagram and Threads both publish Open Graph tags for public posts.
//! The video URL comes from the `og:video*` tags when present, otherwise
//! from a `contentUrl` inside any JSON-LD block on the page.

use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

macro_rules! selector {
    ($name:ident, $css:expr) => {
        static $name: LazyLock<Selector> =
            LazyLock::new(|| Selector::parse($css).expect("Invalid CSS selector"));
    };
}

selector!(META_SELECTOR, "meta");
selector!(JSON_LD_SELECTOR, r#"script[type="application/ld+json"]"#);

/// Open Graph properties holding the video URL, most specific first
const VIDEO_PROPERTIES: [&str; 3] = ["og:video:secure_url", "og:video:url", "og:video"];

/// Fields pulled out of a post page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub video_url: Option<String>,
    pub title: Option<String>,
    pub caption: Option<String>,
}

/// Parse a page and collect the fields a download needs
pub fn extract_page_metadata(html: &str) -> PageMetadata {
    let document = Html::parse_document(html);
    PageMetadata {
        video_url: extract_video_url(&document),
        title: meta_content(&document, "og:title"),
        caption: meta_content(&document, "og:description"),
    }
}

fn first_meta_with<'a>(document: &'a Html, attr: &str, value: &str) -> Option<ElementRef<'a>> {
    document
        .select(&META_SELECTOR)
        .find(|el| el.value().attr(attr) == Some(value))
}

/// Trimmed `content` of the first `<meta property=..>`, else `<meta name=..>`
///
/// Empty content yields `None`.
pub fn meta_content(document: &Html, key: &str) -> Option<String> {
    let tag = first_meta_with(document, "property", key).or_else(|| first_meta_with(document, "name", key))?;
    tag.value()
        .attr("content")
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

fn extract_video_url(document: &Html) -> Option<String> {
    for property in VIDEO_PROPERTIES {
        let content = first_meta_with(document, "property", property)
            .and_then(|tag| tag.value().attr("content"))
            .map(str::trim)
            .filter(|c| !c.is_empty());
        if let Some(url) = content {
            debug!("Video URL found in {}", property);
            return Some(url.to_string());
        }
    }
    extract_from_json_ld(document)
}

fn extract_from_json_ld(document: &Html) -> Option<String> {
    for script in document.select(&JSON_LD_SELECTOR) {
        let text = script.text().collect::<String>();
        let source = if text.trim().is_empty() { "{}" } else { text.as_str() };
        let data: Value = match serde_json::from_str(source) {
            Ok(data) => data,
            Err(e) => {
                debug!("Skipping unparsable JSON-LD block: {}", e);
                continue;
            }
        };
        if let Some(url) = walk_json_for_video(&data) {
            debug!("Video URL found in JSON-LD");
            return Some(url);
        }
    }
    None
}

/// JSON truthiness: null, false, 0, "" and empty containers are falsy
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Depth-first search for a video URL in a JSON-LD document
///
/// An object's own `contentUrl` wins. A truthy `video` key is followed
/// exclusively: its result is returned even when it holds no URL.
pub fn walk_json_for_video(data: &Value) -> Option<String> {
    match data {
        Value::Object(map) => {
            if let Some(url) = map.get("contentUrl").filter(|v| is_truthy(v)) {
                return Some(match url {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                });
            }
            if let Some(video) = map.get("video").filter(|v| is_truthy(v)) {
                return walk_json_for_video(video);
            }
            map.values().find_map(walk_json_for_video)
        }
        Value::Array(items) => items.iter().find_map(walk_json_for_video),
        _ => None,
    }
}
