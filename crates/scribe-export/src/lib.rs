//! scribe-export: turning an editor document into something to publish.
//!
//! Nothing here touches the network or the filesystem. The transforms
//! produce text and plans; callers fetch images and write files.

pub mod error;
pub mod html;
pub mod icons;
pub mod images;
pub mod package;

pub use error::ExportError;
pub use html::{export_html, standalone_document};
pub use icons::{
    IconSrc, SOCIAL_PLATFORMS, SocialPlatform, icon_img_html, resolve_icon_src,
    social_profile_url, social_token,
};
pub use images::{
    DEFAULT_IMAGE_FOLDER, ImageRef, extract_image_urls, image_extension, plan_images,
    rewrite_image_urls,
};
pub use package::{
    BundleFile, ExportBundle, Platform, devto_article, export_bundle, export_for_platform,
    github_readme,
};
