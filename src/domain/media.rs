//! Media classification from URL heuristics.
//!
//! Classification always looks at the URL as it appears in the feed,
//! before any delivery rewriting.

use url::Url;

use super::item::MediaType;

/// File extensions served as native video.
pub const VIDEO_EXTENSIONS: [&str; 6] = ["mp4", "webm", "ogg", "mov", "avi", "mkv"];

/// Path segment used by the video CDN for uploaded video assets.
pub const VIDEO_UPLOAD_MARKER: &str = "/video/upload/";

/// Domain markers that identify a YouTube link.
const YOUTUBE_MARKERS: [&str; 2] = ["youtube.com", "youtu.be"];

/// Classify a raw feed URL.
///
/// Blank and unrecognized URLs are images.
pub fn detect_media_type(url: &str) -> MediaType {
    if url.is_empty() {
        return MediaType::Image;
    }

    if is_youtube(url) {
        return MediaType::YoutubeEmbed;
    }

    let is_video_file = file_extension(url)
        .is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));

    if is_video_file || url.contains(VIDEO_UPLOAD_MARKER) {
        MediaType::Video
    } else {
        MediaType::Image
    }
}

pub fn is_youtube(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    YOUTUBE_MARKERS.iter().any(|m| lower.contains(m))
}

/// Extension of the last path segment, with query and fragment removed.
pub fn file_extension(url: &str) -> Option<&str> {
    let clean = strip_query_and_fragment(url);
    let last_segment = clean.rsplit('/').next().unwrap_or(clean);
    let (stem, ext) = last_segment.rsplit_once('.')?;
    (!stem.is_empty() && !ext.is_empty()).then_some(ext)
}

pub fn strip_query_and_fragment(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

/// Extract the video id from the three accepted YouTube URL shapes:
/// `watch?v=<id>`, `youtu.be/<id>` and `/embed/<id>`.
pub fn youtube_video_id(url: &str) -> Option<String> {
    match Url::parse(url) {
        Ok(parsed) => video_id_from_parsed(&parsed),
        Err(_) => video_id_from_text(url),
    }
    .filter(|id| !id.is_empty())
}

fn video_id_from_parsed(url: &Url) -> Option<String> {
    if let Some((_, v)) = url.query_pairs().find(|(k, _)| k == "v") {
        return Some(v.into_owned());
    }

    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    let mut segments = url.path_segments()?;

    if host == "youtu.be" || host.ends_with(".youtu.be") {
        return segments.next().map(str::to_string);
    }

    while let Some(segment) = segments.next() {
        if segment == "embed" {
            return segments.next().map(str::to_string);
        }
    }
    None
}

// Scheme-less links like `youtu.be/abc` do not parse as URLs.
fn video_id_from_text(url: &str) -> Option<String> {
    let id = if let Some((_, rest)) = url.split_once("v=") {
        rest.split('&').next()
    } else if let Some((_, rest)) = url.split_once("youtu.be/") {
        rest.split(['?', '#', '/']).next()
    } else if let Some((_, rest)) = url.split_once("embed/") {
        rest.split(['?', '#', '/']).next()
    } else {
        None
    };
    id.map(str::to_string)
}
