// src/filename.rs

//! Output filenames for downloaded videos
//!
//! Names are built as `<platform>[-<title>]-<post id>.mp4`, each part
//! slugified so the result is safe on every filesystem.

use icu_normalizer::DecomposingNormalizerBorrowed;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Extension every downloaded video gets
pub const VIDEO_EXTENSION: &str = ".mp4";

/// Longest title slug kept in a filename
const MAX_TITLE_SLUG: usize = 80;

static NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-z0-9]+").expect("Invalid regex"));

/// Filesystem-friendly slug, or `fallback` when nothing survives
///
/// Text is NFKD-decomposed and anything outside ASCII is dropped, so
/// accents fall away while scripts without a Latin form vanish entirely.
pub fn slugify_or(value: &str, fallback: &str) -> String {
    let decomposed = DecomposingNormalizerBorrowed::new_nfkd().normalize(value);
    let ascii: String = decomposed.chars().filter(char::is_ascii).collect();
    let lowered = ascii.trim().to_ascii_lowercase();

    let slug = NON_ALNUM.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        fallback.to_string()
    } else {
        slug.to_string()
    }
}

/// Last meaningful part of a URL
///
/// The last non-empty path segment, else the host, else `download`.
pub fn filename_from_url(url: &str) -> String {
    let candidate = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
            .map(str::to_string)
            .or_else(|| parsed.host_str().map(str::to_string)),
        Err(_) => url.split('/').filter(|s| !s.is_empty()).next_back().map(str::to_string),
    };
    match candidate {
        Some(name) if !name.trim_matches('/').is_empty() => name.trim_matches('/').to_string(),
        _ => "download".to_string(),
    }
}

/// Append `extension` unless the name already ends with it (any case)
pub fn ensure_extension(name: &str, extension: &str) -> String {
    if name.to_ascii_lowercase().ends_with(&extension.to_ascii_lowercase()) {
        name.to_string()
    } else {
        format!("{name}{extension}")
    }
}

/// Descriptive filename for a video
pub fn build_filename(title: Option<&str>, source_url: &str, platform: &str) -> String {
    let mut parts = vec![slugify_or(platform, platform)];
    if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
        parts.push(truncate_slug(slugify_or(title, "video")));
    }
    parts.push(slugify_or(&filename_from_url(source_url), "video"));

    let base = parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if base.is_empty() {
        ensure_extension("sedot-video", VIDEO_EXTENSION)
    } else {
        ensure_extension(&base, VIDEO_EXTENSION)
    }
}

fn truncate_slug(mut slug: String) -> String {
    if slug.len() > MAX_TITLE_SLUG {
        slug.truncate(MAX_TITLE_SLUG);
        slug.truncate(slug.trim_end_matches('-').len());
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify_or("Hello World", "video"), "hello-world");
        assert_eq!(slugify_or("  Sunset at the Beach!! ", "video"), "sunset-at-the-beach");
    }

    #[test]
    fn test_slugify_fallback() {
        assert_eq!(slugify_or("", "video"), "video");
        assert_eq!(slugify_or("   ", "video"), "video");
        assert_eq!(slugify_or("!!!", "video"), "video");
    }

    #[test]
    fn test_slugify_drops_non_ascii() {
        assert_eq!(slugify_or("Café Déjà Vu", "video"), "cafe-deja-vu");
        assert_eq!(slugify_or("Straße", "video"), "strae");
        assert_eq!(slugify_or("Sunset 🌅 vibes", "video"), "sunset-vibes");
        assert_eq!(slugify_or("日本の猫", "video"), "video");
        // compatibility forms fold to ASCII
        assert_eq!(slugify_or("ｆｕｌｌ ｗｉｄｔｈ ①", "video"), "full-width-1");
    }

    #[test]
    fn test_build_filename_with_untransliterated_title() {
        let name = build_filename(Some("東京タワー"), "https://www.instagram.com/reel/ABC/", "instagram");
        assert_eq!(name, "instagram-video-abc.mp4");
    }

    #[test]
    fn test_filename_from_url() {
        assert_eq!(filename_from_url("https://www.instagram.com/reel/C1a2B3/"), "C1a2B3");
        assert_eq!(filename_from_url("https://www.threads.net/@user/post/XyZ"), "XyZ");
        assert_eq!(filename_from_url("https://www.instagram.com/"), "www.instagram.com");
        assert_eq!(filename_from_url(""), "download");
    }

    #[test]
    fn test_ensure_extension() {
        assert_eq!(ensure_extension("clip", ".mp4"), "clip.mp4");
        assert_eq!(ensure_extension("clip.mp4", ".mp4"), "clip.mp4");
        assert_eq!(ensure_extension("CLIP.MP4", ".mp4"), "CLIP.MP4");
    }

    #[test]
    fn test_build_filename_with_title() {
        let name = build_filename(
            Some("Morning Run"),
            "https://www.instagram.com/reel/ABC123/",
            "instagram",
        );
        assert_eq!(name, "instagram-morning-run-abc123.mp4");
    }

    #[test]
    fn test_build_filename_without_title() {
        let name = build_filename(None, "https://www.threads.net/@someone/post/Q9", "threads");
        assert_eq!(name, "threads-q9.mp4");

        let blank = build_filename(Some("   "), "https://www.threads.net/@someone/post/Q9", "threads");
        assert_eq!(blank, "threads-q9.mp4");
    }

    #[test]
    fn test_long_title_is_capped() {
        let title = "word ".repeat(60);
        let name = build_filename(Some(&title), "https://www.instagram.com/p/X1/", "instagram");
        let title_part = name
            .strip_prefix("instagram-")
            .and_then(|rest| rest.strip_suffix("-x1.mp4"))
            .unwrap();
        assert!(title_part.len() <= MAX_TITLE_SLUG);
        assert!(!title_part.ends_with('-'));
    }
}
