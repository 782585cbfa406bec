//! Image references in exported markdown.
//!
//! Packaging collects every image a document shows, assigns each a local
//! file name, and rewrites the markdown to point at the local copies. The
//! fetching itself happens elsewhere; this module only plans and rewrites.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;
use smol_str::SmolStr;

use crate::icons::{LLM_ICON_SCHEME, llm_icon_url};

/// Folder images are placed in when none is configured.
pub const DEFAULT_IMAGE_FOLDER: &str = "images";

const KNOWN_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp"];

static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[(.*?)\]\((.*?)\)").unwrap());
static DATA_MIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"data:image/(\w+);").unwrap());

/// An image to bundle: where it comes from and what it is saved as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRef {
    pub url: String,
    pub filename: String,
}

// llm-icon sources stand for their hosted asset; an unknown id stays as is.
fn effective_url(src: &str) -> Option<String> {
    match src.strip_prefix(LLM_ICON_SCHEME) {
        Some(id) => llm_icon_url(id),
        None => Some(src.to_string()),
    }
}

/// Fetchable image URLs in document order, duplicates included.
///
/// LLM icons are mapped to their hosted asset. Only `http(s)://` and `data:`
/// sources are collected; relative paths and `social-icon://` are skipped.
pub fn extract_image_urls(markdown: &str) -> Vec<String> {
    IMAGE_RE
        .captures_iter(markdown)
        .filter_map(|caps| {
            let src = &caps[2];
            if src.starts_with(LLM_ICON_SCHEME) {
                effective_url(src)
            } else if src.starts_with("http://")
                || src.starts_with("https://")
                || src.starts_with("data:")
            {
                Some(src.to_string())
            } else {
                None
            }
        })
        .collect()
}

/// File extension for an image URL, `png` when nothing better is known.
pub fn image_extension(url: &str) -> SmolStr {
    if url.starts_with("data:") {
        return match DATA_MIME_RE.captures(url) {
            Some(caps) if &caps[1] == "jpeg" => SmolStr::new_static("jpg"),
            Some(caps) => SmolStr::new(&caps[1]),
            None => SmolStr::new_static("png"),
        };
    }

    let path = url.split('?').next().unwrap_or(url);
    let extension = path.rsplit('.').next().unwrap_or_default().to_lowercase();
    if KNOWN_EXTENSIONS.contains(&extension.as_str()) {
        SmolStr::new(extension)
    } else {
        SmolStr::new_static("png")
    }
}

/// Number and name every distinct image, the featured image first.
pub fn plan_images(markdown: &str, featured: Option<&str>) -> Vec<ImageRef> {
    let mut urls = extract_image_urls(markdown);
    if let Some(featured) = featured.filter(|url| !url.is_empty()) {
        if !urls.iter().any(|url| url == featured) {
            urls.insert(0, featured.to_string());
        }
    }

    let mut unique: Vec<String> = Vec::with_capacity(urls.len());
    for url in urls {
        if !unique.contains(&url) {
            unique.push(url);
        }
    }

    let images: Vec<ImageRef> = unique
        .into_iter()
        .enumerate()
        .map(|(index, url)| ImageRef {
            filename: format!("image-{}.{}", index + 1, image_extension(&url)),
            url,
        })
        .collect();
    tracing::debug!(count = images.len(), "planned export images");
    images
}

/// Point every bundled image at `<folder>/<filename>`. Images not in
/// `images` keep their source.
pub fn rewrite_image_urls(markdown: &str, images: &[ImageRef], folder: &str) -> String {
    IMAGE_RE
        .replace_all(markdown, |caps: &Captures| {
            let found = effective_url(&caps[2])
                .and_then(|url| images.iter().find(|image| image.url == url));
            match found {
                Some(image) => format!("![{}]({folder}/{})", &caps[1], image.filename),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
