//! Configuration resolution
//!
//! Hub token, base URL and timeout resolve through three tiers:
//! command-line flag, environment variable, TOML config file
//! (`~/.config/aibomgen/config.toml`). A warning is logged when a value is
//! set in more than one place; the highest-priority source wins.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use aibom_common::{Error, Result};

pub const TOKEN_ENV: &str = "HF_TOKEN";
pub const BASE_URL_ENV: &str = "AIBOMGEN_HUB_URL";
pub const TIMEOUT_ENV: &str = "AIBOMGEN_TIMEOUT_SECS";

/// Optional on-disk settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub hub_token: Option<String>,
    pub hub_base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl TomlConfig {
    /// Load from an explicit path.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load from the default location; a missing file yields defaults, a
    /// malformed file is logged and ignored.
    pub fn load_default() -> Self {
        let Some(path) = default_config_path() else {
            return TomlConfig::default();
        };
        if !path.exists() {
            return TomlConfig::default();
        }
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed config file");
                TomlConfig::default()
            }
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("aibomgen").join("config.toml"))
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn warn_multiple(name: &str, sources: &[&str]) {
    if sources.len() > 1 {
        warn!(
            "{} found in multiple sources: {}; using {} (highest priority)",
            name,
            sources.join(", "),
            sources[0]
        );
    }
}

/// Resolve the hub token: flag, `HF_TOKEN`, TOML file.
pub fn resolve_token(flag: Option<&str>, config: &TomlConfig) -> String {
    let flag = non_empty(flag.map(str::to_string));
    let env = non_empty(std::env::var(TOKEN_ENV).ok());
    let file = non_empty(config.hub_token.clone());

    let mut sources = Vec::new();
    if flag.is_some() {
        sources.push("flag");
    }
    if env.is_some() {
        sources.push("environment");
    }
    if file.is_some() {
        sources.push("config file");
    }
    warn_multiple("hub token", &sources);

    flag.or(env).or(file).unwrap_or_default()
}

/// Resolve the hub base URL: flag, `AIBOMGEN_HUB_URL`, TOML file. Empty
/// means the client default.
pub fn resolve_base_url(flag: Option<&str>, config: &TomlConfig) -> String {
    let flag = non_empty(flag.map(str::to_string));
    let env = non_empty(std::env::var(BASE_URL_ENV).ok());
    let file = non_empty(config.hub_base_url.clone());

    let mut sources = Vec::new();
    if flag.is_some() {
        sources.push("flag");
    }
    if env.is_some() {
        sources.push("environment");
    }
    if file.is_some() {
        sources.push("config file");
    }
    warn_multiple("hub base URL", &sources);

    flag.or(env).or(file).unwrap_or_default()
}

/// Resolve the per-request timeout: flag, `AIBOMGEN_TIMEOUT_SECS`, TOML
/// file, 10 s default.
pub fn resolve_timeout(flag: Option<u64>, config: &TomlConfig) -> Duration {
    let env = std::env::var(TIMEOUT_ENV)
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok());

    let secs = flag.or(env).or(config.timeout_secs).unwrap_or(10);
    Duration::from_secs(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_wins_over_file() {
        let config = TomlConfig {
            hub_token: Some("from-file".into()),
            ..TomlConfig::default()
        };
        assert_eq!(resolve_token(Some("from-flag"), &config), "from-flag");
    }

    #[test]
    fn test_file_used_when_no_flag() {
        let config = TomlConfig {
            hub_base_url: Some("https://hub.example.org".into()),
            ..TomlConfig::default()
        };
        // Assumes AIBOMGEN_HUB_URL is not set in the test environment.
        assert_eq!(
            resolve_base_url(None, &config),
            "https://hub.example.org"
        );
    }

    #[test]
    fn test_blank_flag_falls_through() {
        let config = TomlConfig {
            hub_token: Some("from-file".into()),
            ..TomlConfig::default()
        };
        assert_eq!(resolve_token(Some("   "), &config), "from-file");
    }

    #[test]
    fn test_timeout_default() {
        let config = TomlConfig::default();
        assert_eq!(resolve_timeout(None, &config), Duration::from_secs(10));
        assert_eq!(resolve_timeout(Some(30), &config), Duration::from_secs(30));
    }

    #[test]
    fn test_load_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "hub_token = \"tok\"\ntimeout_secs = 5\n").unwrap();
        let config = TomlConfig::load(&path).unwrap();
        assert_eq!(config.hub_token.as_deref(), Some("tok"));
        assert_eq!(config.timeout_secs, Some(5));
    }
}
