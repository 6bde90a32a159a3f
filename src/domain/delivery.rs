//! Delivery URL rewriting.
//!
//! Rewrites feed URLs per provider so the site requests appropriately
//! sized assets:
//! - Unsplash (image CDN): fixed width/quality/format query
//! - Cloudinary (video CDN): passthrough unless transforms are enabled
//! - YouTube: embeddable, autoplaying, muted, looping player URL
//!
//! Every rewrite is idempotent: feeding a rewritten URL back in returns
//! it unchanged.

use serde::Deserialize;

use super::media::{is_youtube, youtube_video_id};

const UNSPLASH_HOST: &str = "images.unsplash.com";
const CLOUDINARY_HOST: &str = "cloudinary.com";
const CLOUDINARY_UPLOAD: &str = "/upload/";

/// Markers meaning a Cloudinary URL already carries delivery transforms
/// (or is signed, where any edit would break the signature).
const CLOUDINARY_OPTIMIZED_MARKERS: [&str; 3] = ["/upload/q_auto", "/upload/f_auto", "/s--"];

/// Delivery tuning knobs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeliveryOptions {
    /// Target width in pixels for CDN-resized images.
    #[serde(default = "default_image_width")]
    pub image_width: u32,
    /// JPEG/WebP quality requested from the image CDN (1..=100).
    #[serde(default = "default_image_quality")]
    pub image_quality: u8,
    /// Apply automatic format/quality/width transforms to Cloudinary URLs.
    #[serde(default)]
    pub cloudinary_transforms: bool,
}

impl Default for DeliveryOptions {
    fn default() -> Self {
        Self {
            image_width: default_image_width(),
            image_quality: default_image_quality(),
            cloudinary_transforms: false,
        }
    }
}

const fn default_image_width() -> u32 {
    1200
}

const fn default_image_quality() -> u8 {
    80
}

impl DeliveryOptions {
    /// Query string appended to image CDN URLs.
    pub fn unsplash_query(&self) -> String {
        format!(
            "q={}&w={}&auto=format&fit=crop",
            self.image_quality, self.image_width
        )
    }

    fn cloudinary_transform(&self) -> String {
        format!("f_auto,q_auto,w_{},c_limit", self.image_width)
    }
}

/// Rewrite a raw feed URL for delivery. Blank input stays blank.
pub fn optimize_url(url: &str, options: &DeliveryOptions) -> String {
    if url.is_empty() {
        return String::new();
    }

    if url.contains(CLOUDINARY_HOST) {
        return optimize_cloudinary(url, options);
    }

    if url.contains(UNSPLASH_HOST) {
        return optimize_unsplash(url, options);
    }

    if is_youtube(url) {
        if let Some(id) = youtube_video_id(url) {
            return youtube_embed_url(&id);
        }
    }

    url.to_string()
}

fn optimize_unsplash(url: &str, options: &DeliveryOptions) -> String {
    let query = options.unsplash_query();
    let (base, existing) = match url.split_once('?') {
        Some((base, rest)) => (base, Some(rest)),
        None => (url.split('#').next().unwrap_or(url), None),
    };

    if existing == Some(query.as_str()) {
        return url.to_string();
    }

    format!("{base}?{query}")
}

fn optimize_cloudinary(url: &str, options: &DeliveryOptions) -> String {
    if !options.cloudinary_transforms
        || CLOUDINARY_OPTIMIZED_MARKERS.iter().any(|m| url.contains(m))
    {
        return url.to_string();
    }

    url.replacen(
        CLOUDINARY_UPLOAD,
        &format!("{CLOUDINARY_UPLOAD}{}/", options.cloudinary_transform()),
        1,
    )
}

/// Embeddable background-player URL for a YouTube video id.
pub fn youtube_embed_url(video_id: &str) -> String {
    format!(
        "https://www.youtube.com/embed/{video_id}?autoplay=1&mute=1&loop=1&playlist={video_id}&controls=0&modestbranding=1&rel=0"
    )
}
