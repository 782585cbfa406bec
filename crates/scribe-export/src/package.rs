//! Platform-ready documents and the bundles that carry them.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use scribe_editor_core::comment;
use scribe_editor_core::toc::export_markdown_with_toc;

use crate::error::ExportError;
use crate::images::{ImageRef, plan_images, rewrite_image_urls};

/// Badge row placed under the title of a GitHub README.
pub const README_BADGES: &str = "[![License: MIT](https://img.shields.io/badge/License-MIT-blue.svg)](/LICENSE) [![Build Status](https://img.shields.io/badge/build-passing-brightgreen.svg)](#) [![Version](https://img.shields.io/badge/version-1.0.0-blue.svg)](#)\n\n";

const DEFAULT_ARTICLE_TITLE: &str = "My Article";
const DEFAULT_COVER: &str = "cover.png";

// Only a title on the very first line qualifies.
static LEADING_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(# .+)\n").unwrap());
static FIRST_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^# (.+)$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    GitHub,
    DevTo,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::GitHub => "github",
            Platform::DevTo => "devto",
        }
    }

    /// Name of the markdown file inside an export bundle.
    pub fn document_name(self) -> &'static str {
        match self {
            Platform::GitHub => "README.md",
            Platform::DevTo => "article.md",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "github" => Ok(Platform::GitHub),
            "devto" | "dev.to" => Ok(Platform::DevTo),
            _ => Err(ExportError::UnknownPlatform(s.to_string())),
        }
    }
}

/// Markdown ready to paste into `platform`: comments removed, `{{TOC}}`
/// replaced with a GitHub-anchored list.
///
/// Both platforms share one anchor scheme, so the output is currently the
/// same for either.
pub fn export_for_platform(markdown: &str, platform: Platform) -> String {
    tracing::debug!(%platform, "exporting markdown");
    export_markdown_with_toc(&comment::strip(markdown))
}

fn prepare(markdown: &str, platform: Platform, images: &[ImageRef], folder: &str) -> String {
    rewrite_image_urls(&export_for_platform(markdown, platform), images, folder)
}

/// README text: platform markdown with local images and a badge row under a
/// leading `# ` title.
pub fn github_readme(markdown: &str, images: &[ImageRef], folder: &str) -> String {
    let readme = prepare(markdown, Platform::GitHub, images, folder);
    LEADING_TITLE_RE
        .replace(&readme, |caps: &Captures| {
            format!("{}\n\n{README_BADGES}", &caps[1])
        })
        .into_owned()
}

/// Dev.to article: platform markdown behind a front-matter block.
///
/// The cover is the first bundled image, so a featured image, which plans
/// first, becomes the cover.
pub fn devto_article(markdown: &str, images: &[ImageRef], folder: &str) -> String {
    let body = prepare(markdown, Platform::DevTo, images, folder);
    let title = FIRST_TITLE_RE
        .captures(&body)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| DEFAULT_ARTICLE_TITLE.to_string());
    let cover = images
        .first()
        .map_or(DEFAULT_COVER, |image| image.filename.as_str());

    format!(
        "---\ntitle: {title}\npublished: false\ndescription:\ntags:\ncover_image: ./{folder}/{cover}\n---\n\n{body}"
    )
}

/// A file to write into a bundle, relative to its root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleFile {
    pub path: String,
    pub contents: String,
}

/// Everything a packager needs: the document to write and the images to
/// fetch into `image_folder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportBundle {
    pub platform: Platform,
    pub document: BundleFile,
    pub image_folder: String,
    pub images: Vec<ImageRef>,
}

impl ExportBundle {
    /// Bundle-relative path for each image.
    pub fn image_paths(&self) -> impl Iterator<Item = (&ImageRef, String)> {
        self.images
            .iter()
            .map(|image| (image, format!("{}/{}", self.image_folder, image.filename)))
    }
}

pub fn export_bundle(
    markdown: &str,
    featured: Option<&str>,
    platform: Platform,
    image_folder: &str,
) -> ExportBundle {
    let images = plan_images(&comment::strip(markdown), featured);
    let contents = match platform {
        Platform::GitHub => github_readme(markdown, &images, image_folder),
        Platform::DevTo => devto_article(markdown, &images, image_folder),
    };
    ExportBundle {
        platform,
        document: BundleFile {
            path: platform.document_name().to_string(),
            contents,
        },
        image_folder: image_folder.to_string(),
        images,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn platform_export_strips_comments_and_fills_toc() {
        let md = "# Guide [[comment: tighten intro]]\n\n{{TOC}}\n\n## Setup";
        assert_eq!(
            export_for_platform(md, Platform::DevTo),
            "# Guide \n\n## Table of Contents\n\n- [Guide](#guide)\n  - [Setup](#setup)\n\n\n## Setup"
        );
    }

    #[test]
    fn platform_parsing() {
        assert_eq!("GitHub".parse::<Platform>().unwrap(), Platform::GitHub);
        assert_eq!("dev.to".parse::<Platform>().unwrap(), Platform::DevTo);
        assert!(matches!(
            "medium".parse::<Platform>(),
            Err(ExportError::UnknownPlatform(name)) if name == "medium"
        ));
        let parsed: Platform = serde_json::from_str(r#""devto""#).unwrap();
        assert_eq!(parsed, Platform::DevTo);
    }

    #[test]
    fn readme_gets_badges_under_leading_title() {
        let md = "# Project\nIntro ![shot](https://x.io/s.png)";
        let images = plan_images(md, None);
        assert_snapshot!(github_readme(md, &images, "images"), @r"
        # Project

        [![License: MIT](https://img.shields.io/badge/License-MIT-blue.svg)](/LICENSE) [![Build Status](https://img.shields.io/badge/build-passing-brightgreen.svg)](#) [![Version](https://img.shields.io/badge/version-1.0.0-blue.svg)](#)

        Intro ![shot](images/image-1.png)
        ");
    }

    #[test]
    fn readme_without_leading_title_has_no_badges() {
        let md = "Preamble\n# Late title\nbody";
        assert_eq!(github_readme(md, &[], "images"), md);
    }

    #[test]
    fn devto_front_matter() {
        let md = "Lead\n\n# Hello Dev\n\n![c](https://x.io/c.webp)";
        let images = plan_images(md, None);
        assert_snapshot!(devto_article(md, &images, "images"), @r"
        ---
        title: Hello Dev
        published: false
        description:
        tags:
        cover_image: ./images/image-1.webp
        ---

        Lead

        # Hello Dev

        ![c](images/image-1.webp)
        ");
    }

    #[test]
    fn devto_defaults_without_title_or_images() {
        let article = devto_article("just text", &[], "images");
        assert!(article.starts_with("---\ntitle: My Article\n"));
        assert!(article.contains("cover_image: ./images/cover.png\n"));
        assert!(article.ends_with("---\n\njust text"));
    }

    #[test]
    fn bundle_collects_document_and_images() {
        let md = "# T\n\n![a](https://x.io/a.gif) [[comment: ![draft](https://x.io/draft.png)]]";
        let bundle = export_bundle(md, Some("https://x.io/hero.jpg"), Platform::GitHub, "images");

        assert_eq!(bundle.document.path, "README.md");
        let paths: Vec<_> = bundle.image_paths().map(|(_, path)| path).collect();
        assert_eq!(paths, vec!["images/image-1.jpg", "images/image-2.gif"]);
        assert!(bundle.document.contents.contains("![a](images/image-2.gif)"));
        assert!(!bundle.document.contents.contains("draft"));
    }
}
