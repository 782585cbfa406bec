use std::path::{Path, PathBuf};
use std::{env, fs, io};

use miette::Diagnostic;
use scribe_editor_core::HistoryConfig;
use scribe_export::{DEFAULT_IMAGE_FOLDER, Platform};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("error reading config file {}", path.display())]
    #[diagnostic(code(scribe::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error parsing config file {}", path.display())]
    #[diagnostic(code(scribe::config::parse))]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub image_folder: String,
    pub platform: Platform,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            image_folder: DEFAULT_IMAGE_FOLDER.into(),
            platform: Platform::GitHub,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub history: HistoryConfig,
    pub export: ExportConfig,
}

impl Config {
    /// Load from an explicit path, or from the default location if one
    /// exists there. Missing default config means built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        match explicit {
            Some(path) => Config::load(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Config::load(&path),
                _ => Ok(Config::default()),
            },
        }
    }

    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Config::parse(&substitute_env(contents), path)
    }

    fn parse(contents: &str, path: &Path) -> Result<Config, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

// `$NAME` anywhere in the file is replaced with that variable's value.
fn substitute_env(mut contents: String) -> String {
    for (key, value) in env::vars() {
        contents = contents.replace(&format!("${key}"), &value);
    }
    contents
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("scribe").join("scribe.toml"))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::parse("", Path::new("scribe.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.history.max_entries, 50);
        assert_eq!(config.export.image_folder, "images");
    }

    #[test]
    fn sections_override_defaults() {
        let toml = r#"
            [history]
            max_entries = 10
            debounce_ms = 250

            [export]
            platform = "devto"
        "#;
        let config = Config::parse(toml, Path::new("scribe.toml")).unwrap();
        assert_eq!(config.history.max_entries, 10);
        assert_eq!(config.history.debounce, Duration::from_millis(250));
        assert_eq!(config.export.platform, Platform::DevTo);
        assert_eq!(config.export.image_folder, "images");
    }

    #[test]
    fn bad_value_is_a_parse_error() {
        let err = Config::parse("[export]\nplatform = \"medium\"", Path::new("x.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_explicit_file_is_a_read_error() {
        let err = Config::resolve(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
