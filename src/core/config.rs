use std::env;
use std::io;
use std::path::{Path, PathBuf};

use reqwest::Url;
use serde::Deserialize;

use crate::core::paths;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const ENV_BASE_URL: &str = "TRAVEL_COMPANION_URL";
pub const ENV_CSRF_TOKEN: &str = "TRAVEL_COMPANION_CSRF_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    /// Explicit CSRF token; when absent the backend's cookie or page token is used.
    pub csrf_token: Option<String>,
    /// Settings file consulted, whether or not it exists.
    pub settings_path: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not read settings file {}: {source}", path.display())]
    ReadSettings {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid settings file {}: {source}", path.display())]
    ParseSettings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid backend URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Values given on the command line; they win over every other source.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub csrf_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Settings {
    base_url: Option<String>,
    csrf_token: Option<String>,
}

/// Load configuration: defaults, then settings file, then environment, then `overrides`.
pub fn load(overrides: &Overrides) -> Result<Config, ConfigError> {
    let settings_path = paths::settings_path();
    load_from(settings_path, |key| env::var(key).ok(), overrides)
}

fn load_from(
    settings_path: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
    overrides: &Overrides,
) -> Result<Config, ConfigError> {
    let settings = match &settings_path {
        Some(path) => read_settings(path)?,
        None => Settings::default(),
    };
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

    let base_url = non_empty(overrides.base_url.clone())
        .or_else(|| non_empty(env(ENV_BASE_URL)))
        .or_else(|| non_empty(settings.base_url))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let base_url = validate_base_url(base_url.trim())?;

    let csrf_token = non_empty(overrides.csrf_token.clone())
        .or_else(|| non_empty(env(ENV_CSRF_TOKEN)))
        .or_else(|| non_empty(settings.csrf_token));

    Ok(Config {
        base_url,
        csrf_token,
        settings_path,
    })
}

fn read_settings(path: &Path) -> Result<Settings, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Settings::default()),
        Err(source) => {
            return Err(ConfigError::ReadSettings {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    log::debug!("Using settings file {}", path.display());
    serde_json::from_str(&text).map_err(|source| ConfigError::ParseSettings {
        path: path.to_path_buf(),
        source,
    })
}

fn validate_base_url(url: &str) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: url.to_string(),
        reason,
    };
    let parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
    }
    if parsed.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn write_settings(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join(paths::SETTINGS_FILE);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn defaults_without_any_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let cfg = load_from(Some(path.clone()), env_of(&[]), &Overrides::default()).unwrap();
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.csrf_token, None);
        assert_eq!(cfg.settings_path, Some(path));
    }

    #[test]
    fn settings_file_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(
            &dir,
            r#"{"base_url": "https://trips.example.com", "csrf_token": "abc"}"#,
        );
        let cfg = load_from(Some(path), env_of(&[]), &Overrides::default()).unwrap();
        assert_eq!(cfg.base_url, "https://trips.example.com");
        assert_eq!(cfg.csrf_token.as_deref(), Some("abc"));
    }

    #[test]
    fn env_beats_settings_and_flags_beat_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(&dir, r#"{"base_url": "http://from-file:1"}"#);
        let env = env_of(&[
            (ENV_BASE_URL, "http://from-env:2"),
            (ENV_CSRF_TOKEN, "env-token"),
        ]);

        let cfg = load_from(Some(path.clone()), &env, &Overrides::default()).unwrap();
        assert_eq!(cfg.base_url, "http://from-env:2");
        assert_eq!(cfg.csrf_token.as_deref(), Some("env-token"));

        let overrides = Overrides {
            base_url: Some("http://from-flag:3".into()),
            csrf_token: Some("flag-token".into()),
        };
        let cfg = load_from(Some(path), &env, &overrides).unwrap();
        assert_eq!(cfg.base_url, "http://from-flag:3");
        assert_eq!(cfg.csrf_token.as_deref(), Some("flag-token"));
    }

    #[test]
    fn empty_values_fall_through() {
        let env = env_of(&[(ENV_BASE_URL, "  "), (ENV_CSRF_TOKEN, "")]);
        let cfg = load_from(None, env, &Overrides::default()).unwrap();
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.csrf_token, None);
    }

    #[test]
    fn malformed_settings_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(&dir, "{ not json");
        let err = load_from(Some(path), env_of(&[]), &Overrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseSettings { .. }));
        assert!(err.to_string().contains("settings.json"));
    }

    #[test]
    fn rejects_non_http_urls() {
        for url in ["ftp://example.com", "not a url", "/relative/path"] {
            let overrides = Overrides {
                base_url: Some(url.into()),
                ..Default::default()
            };
            let err = load_from(None, env_of(&[]), &overrides).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidBaseUrl { .. }),
                "{} accepted",
                url
            );
        }
    }
}
