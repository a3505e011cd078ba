//! Asset classification
//!
//! Media kind and storage provenance are pure functions of the URL (plus an
//! optional MIME hint), so entries never carry them as mutable state.

use crate::types::{AssetType, StorageSource};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Video file extensions, matched case-insensitively at the end of the path
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "webm", "ogv", "m4v", "avi"];

static VIDEO_PATH: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(r"(?i)\.(?:{})$", VIDEO_EXTENSIONS.join("|"));
    Regex::new(&pattern).expect("video extension pattern is valid")
});

/// Strip query string and fragment
///
/// Resolution and breakpoint variants of one image differ only there, so this
/// is the canonical form used for grouping.
#[inline]
#[must_use]
pub fn normalize_url(url: &str) -> &str {
    let end = url.find(|c: char| c == '?' || c == '#').unwrap_or(url.len());
    &url[..end]
}

/// Lowercase file extension of the URL path, with its leading dot
///
/// Empty when the last path segment has no dot.
#[must_use]
pub fn file_extension(url: &str) -> String {
    let path = normalize_url(url);
    let segment = path.rsplit('/').next().unwrap_or_default();
    segment
        .rfind('.')
        .map(|dot| segment[dot..].to_lowercase())
        .unwrap_or_default()
}

/// Check if the URL path ends in a video extension
#[inline]
#[must_use]
pub fn is_video_url(url: &str) -> bool {
    VIDEO_PATH.is_match(normalize_url(url))
}

/// Classify media kind from URL shape and an optional MIME hint
#[must_use]
pub fn classify_asset_type(url: &str, mime_hint: Option<&str>) -> AssetType {
    let video_mime = mime_hint.is_some_and(|mime| mime.starts_with("video/"));
    if video_mime || is_video_url(url) {
        AssetType::Video
    } else {
        AssetType::Image
    }
}

/// Classify storage provenance from the URL host
///
/// First-party when the hostname ends with one of `first_party_hosts`;
/// malformed URLs and URLs without a host are external.
#[must_use]
pub fn detect_storage_source<S: AsRef<str>>(url: &str, first_party_hosts: &[S]) -> StorageSource {
    let Ok(parsed) = Url::parse(url) else {
        return StorageSource::External;
    };
    let Some(host) = parsed.host_str() else {
        return StorageSource::External;
    };

    let host = host.to_lowercase();
    if first_party_hosts
        .iter()
        .any(|suffix| host.ends_with(&suffix.as_ref().to_lowercase()))
    {
        StorageSource::FirstParty
    } else {
        StorageSource::External
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const HOSTS: &[&str] = &["framerusercontent.com", "framer.com"];

    #[test]
    fn normalize_strips_query_and_fragment() {
        assert_eq!(normalize_url("https://x/a.png?scale=2"), "https://x/a.png");
        assert_eq!(normalize_url("https://x/a.png#frag"), "https://x/a.png");
        assert_eq!(normalize_url("https://x/a.png#f?q"), "https://x/a.png");
        assert_eq!(normalize_url("https://x/a.png"), "https://x/a.png");
    }

    #[test]
    fn extension_extraction() {
        assert_eq!(file_extension("https://cdn.example.com/clip.MP4?v=3"), ".mp4");
        assert_eq!(file_extension("https://framerusercontent.com/images/abc.webp"), ".webp");
        assert_eq!(file_extension("https://example.com/asset"), "");
        assert_eq!(file_extension("https://example.com/dir.v2/asset"), "");
    }

    #[test]
    fn video_detection() {
        assert!(is_video_url("https://x/clip.mp4"));
        assert!(is_video_url("https://x/clip.WebM?token=1"));
        assert!(is_video_url("https://x/clip.mov#t=3"));
        assert!(!is_video_url("https://x/clip.mp4.png"));
        assert!(!is_video_url("https://x/mp4"));
        assert!(!is_video_url("https://x/image.png"));
    }

    #[test]
    fn mime_hint_overrides_extension() {
        assert_eq!(
            classify_asset_type("https://cdn.x/signed-blob", Some("video/quicktime")),
            AssetType::Video
        );
        assert_eq!(
            classify_asset_type("https://cdn.x/signed-blob", Some("image/png")),
            AssetType::Image
        );
        assert_eq!(classify_asset_type("https://cdn.x/a.avi", None), AssetType::Video);
    }

    #[test]
    fn storage_detection() {
        assert_eq!(
            detect_storage_source("https://framerusercontent.com/images/a.png", HOSTS),
            StorageSource::FirstParty
        );
        assert_eq!(
            detect_storage_source("https://assets.FRAMER.com/a.png", HOSTS),
            StorageSource::FirstParty
        );
        assert_eq!(
            detect_storage_source("https://res.cloudinary.com/a.png", HOSTS),
            StorageSource::External
        );
        assert_eq!(detect_storage_source("not a url", HOSTS), StorageSource::External);
        assert_eq!(detect_storage_source("", HOSTS), StorageSource::External);
        assert_eq!(
            detect_storage_source("data:image/png;base64,AAAA", HOSTS),
            StorageSource::External
        );
    }

    proptest! {
        #[test]
        fn prop_video_extensions_classify_as_video(
            stem in "[a-zA-Z0-9_-]{1,12}",
            ext_index in 0..VIDEO_EXTENSIONS.len(),
            upper in any::<bool>(),
            query in proptest::option::of("[a-z]{1,5}=[0-9]{1,3}"),
        ) {
            let ext = if upper {
                VIDEO_EXTENSIONS[ext_index].to_uppercase()
            } else {
                VIDEO_EXTENSIONS[ext_index].to_string()
            };
            let mut url = format!("https://cdn.example.com/media/{stem}.{ext}");
            if let Some(query) = query {
                url.push('?');
                url.push_str(&query);
            }
            prop_assert_eq!(classify_asset_type(&url, None), AssetType::Video);
        }

        #[test]
        fn prop_image_extensions_classify_as_image(
            stem in "[a-zA-Z0-9_-]{1,12}",
            ext in prop_oneof![Just("png"), Just("jpg"), Just("webp"), Just("svg"), Just("gif")],
            query in proptest::option::of("[a-z]{1,5}=[0-9]{1,3}"),
        ) {
            let mut url = format!("https://cdn.example.com/{stem}.{ext}");
            if let Some(query) = query {
                url.push('?');
                url.push_str(&query);
            }
            prop_assert_eq!(classify_asset_type(&url, None), AssetType::Image);
        }

        #[test]
        fn prop_first_party_suffixes(sub in "[a-z]{1,8}", first in any::<bool>()) {
            let host = if first { "framerusercontent.com" } else { "framer.com" };
            let url = format!("https://{sub}.{host}/a.png");
            prop_assert_eq!(detect_storage_source(&url, HOSTS), StorageSource::FirstParty);
        }

        #[test]
        fn prop_storage_never_panics(input in ".*") {
            let _ = detect_storage_source(&input, HOSTS);
        }
    }
}
