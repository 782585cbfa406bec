//! Icon pseudo-schemes used by toolbar insertions.
//!
//! `llm-icon://<id>` and `social-icon://<id>` are image sources that only
//! mean something to the renderer and exporter. They resolve to hosted
//! asset URLs here.

use crate::error::ExportError;
use scribe_editor_core::escape::escape_html;

pub const LLM_ICON_SCHEME: &str = "llm-icon://";
pub const SOCIAL_ICON_SCHEME: &str = "social-icon://";

const LOBEHUB: &str = "https://registry.npmmirror.com/@lobehub/icons-static-png/latest/files/light";

/// `(id, file)` under the lobehub icon set.
const LLM_ICON_FILES: &[(&str, &str)] = &[
    ("gemini", "gemini-color.png"),
    ("chatgpt", "openai.png"),
    ("claude", "claude-color.png"),
    ("perplexity", "perplexity-color.png"),
    ("mistral", "mistral-color.png"),
    ("groq", "groq.png"),
    ("deepseek", "deepseek-color.png"),
    ("ollama", "ollama.png"),
    ("anthropic", "anthropic.png"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocialPlatform {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    /// Prefix joined with a bare handle to form the profile URL.
    pub url_pattern: &'static str,
}

const MAIL_SVG: &str = r#"data:image/svg+xml,%3Csvg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"%3E%3Crect width="20" height="16" x="2" y="4" rx="2"/%3E%3Cpath d="m22 7-8.97 5.7a1.94 1.94 0 0 1-2.06 0L2 7"/%3E%3C/svg%3E"#;
const GLOBE_SVG: &str = r#"data:image/svg+xml,%3Csvg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"%3E%3Ccircle cx="12" cy="12" r="10"/%3E%3Cpath d="M12 2a14.5 14.5 0 0 0 0 20 14.5 14.5 0 0 0 0-20"/%3E%3Cpath d="M2 12h20"/%3E%3C/svg%3E"#;

pub const SOCIAL_PLATFORMS: &[SocialPlatform] = &[
    SocialPlatform {
        id: "x",
        name: "X (Twitter)",
        icon: "https://upload.wikimedia.org/wikipedia/commons/c/ce/X_logo_2023.svg",
        url_pattern: "https://x.com/",
    },
    SocialPlatform {
        id: "email",
        name: "Email",
        icon: MAIL_SVG,
        url_pattern: "mailto:",
    },
    SocialPlatform {
        id: "discord",
        name: "Discord",
        icon: "https://cdn.prod.website-files.com/6257adef93867e50d84d30e2/636e0a6ca814282eca7172c6_icon_clyde_white_RGB.svg",
        url_pattern: "https://discord.gg/",
    },
    SocialPlatform {
        id: "youtube",
        name: "YouTube",
        icon: "https://www.youtube.com/s/desktop/d743f786/img/favicon_144x144.png",
        url_pattern: "https://youtube.com/",
    },
    SocialPlatform {
        id: "website",
        name: "Website",
        icon: GLOBE_SVG,
        url_pattern: "",
    },
    SocialPlatform {
        id: "dev",
        name: "Dev.to",
        icon: "https://dev-to-uploads.s3.amazonaws.com/uploads/logos/resized_logo_UQww2soKuUsjaOGNB38o.png",
        url_pattern: "https://dev.to/",
    },
    SocialPlatform {
        id: "linkedin",
        name: "LinkedIn",
        icon: "https://static.licdn.com/aero-v1/sc/h/al2o9zrvru7aqj8e1x2rzsrca",
        url_pattern: "https://linkedin.com/in/",
    },
    SocialPlatform {
        id: "instagram",
        name: "Instagram",
        icon: "https://static.cdninstagram.com/rsrc.php/v3/yt/r/30PrGfR3xhB.png",
        url_pattern: "https://instagram.com/",
    },
];

pub fn llm_icon_url(id: &str) -> Option<String> {
    LLM_ICON_FILES
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, file)| format!("{LOBEHUB}/{file}"))
}

pub fn social_platform(id: &str) -> Option<&'static SocialPlatform> {
    SOCIAL_PLATFORMS.iter().find(|platform| platform.id == id)
}

/// An image source after pseudo-scheme resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSrc {
    Llm(String),
    Social(&'static str),
    Plain(String),
}

impl IconSrc {
    pub fn url(&self) -> &str {
        match self {
            IconSrc::Llm(url) | IconSrc::Plain(url) => url,
            IconSrc::Social(url) => url,
        }
    }
}

/// Resolve `llm-icon://` and `social-icon://` sources. Anything else passes
/// through as [`IconSrc::Plain`].
pub fn resolve_icon_src(src: &str) -> Result<IconSrc, ExportError> {
    if let Some(id) = src.strip_prefix(LLM_ICON_SCHEME) {
        return llm_icon_url(id)
            .map(IconSrc::Llm)
            .ok_or_else(|| ExportError::UnknownIcon {
                scheme: LLM_ICON_SCHEME,
                id: id.to_string(),
            });
    }
    if let Some(id) = src.strip_prefix(SOCIAL_ICON_SCHEME) {
        return social_platform(id)
            .map(|platform| IconSrc::Social(platform.icon))
            .ok_or_else(|| ExportError::UnknownIcon {
                scheme: SOCIAL_ICON_SCHEME,
                id: id.to_string(),
            });
    }
    Ok(IconSrc::Plain(src.to_string()))
}

/// Render an image element the way the preview does.
///
/// Known icons render inline at icon size with the alt text doubling as the
/// title. Unknown pseudo-scheme ids fall back to a plain image.
pub fn icon_img_html(src: &str, alt: &str, title: Option<&str>) -> String {
    let alt = escape_html(alt);
    match resolve_icon_src(src) {
        Ok(IconSrc::Llm(url)) => format!(
            r#"<img src="{}" alt="{alt}" title="{alt}" class="inline-block w-6 h-6 mx-1 align-middle" />"#,
            escape_html(&url)
        ),
        Ok(IconSrc::Social(url)) => format!(
            r#"<img src="{}" alt="{alt}" title="{alt}" class="inline-block w-5 h-5 mx-1 align-middle" />"#,
            escape_html(url)
        ),
        Ok(IconSrc::Plain(_)) | Err(_) => format!(
            r#"<img src="{}" alt="{alt}" title="{}" />"#,
            escape_html(src),
            escape_html(title.unwrap_or_default())
        ),
    }
}

/// Turn what a user typed into a profile URL for `platform_id`.
///
/// Email gains `mailto:`, websites gain `https://`, other platforms join a
/// bare handle (leading `@` dropped) onto their URL pattern. Input that
/// already starts with `http` is kept as is.
pub fn social_profile_url(platform_id: &str, input: &str) -> Result<String, ExportError> {
    let platform = social_platform(platform_id).ok_or_else(|| ExportError::InvalidSocialInput {
        platform: platform_id.to_string(),
        reason: "unknown platform",
    })?;
    let input = input.trim();
    if input.is_empty() {
        return Err(ExportError::InvalidSocialInput {
            platform: platform_id.to_string(),
            reason: "profile is empty",
        });
    }

    let url = match platform.id {
        "email" if input.starts_with("mailto:") => input.to_string(),
        "email" => format!("mailto:{input}"),
        _ if input.starts_with("http") => input.to_string(),
        "website" => format!("https://{input}"),
        _ => format!(
            "{}{}",
            platform.url_pattern,
            input.strip_prefix('@').unwrap_or(input)
        ),
    };
    Ok(url)
}

/// The toolbar token that inserts a linked social icon.
pub fn social_token(platform_id: &str, input: &str) -> Result<String, ExportError> {
    let url = social_profile_url(platform_id, input)?;
    Ok(format!("social-{platform_id}::{url}"))
}
