use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("no icon registered for {scheme}{id}")]
    #[diagnostic(code(export::unknown_icon))]
    UnknownIcon { scheme: &'static str, id: String },

    #[error("cannot build a {platform} profile link: {reason}")]
    #[diagnostic(
        code(export::invalid_social_input),
        help("known platforms: x, email, discord, youtube, website, dev, linkedin, instagram")
    )]
    InvalidSocialInput { platform: String, reason: &'static str },

    #[error("unknown export platform `{0}`")]
    #[diagnostic(code(export::unknown_platform), help("expected `github` or `devto`"))]
    UnknownPlatform(String),
}
