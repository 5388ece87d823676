use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::cli::Cli;
use crate::theme::{THEMES, theme_names};

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub theme: Option<String>,
}

impl Config {
    /// Reads `path`, or the default location when none is given. A missing
    /// file is an empty config.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(config_path);
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        Ok(config)
    }
}

/// What the running client needs, after flags and the config file have been
/// merged. Flags and environment win over the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub timeout: Duration,
    pub theme: Option<String>,
}

impl Settings {
    pub fn resolve(cli: &Cli, config: &Config) -> Result<Self> {
        let base_url = cli
            .base_url
            .as_deref()
            .or(config.base_url.as_deref())
            .map(str::trim)
            .filter(|value| !value.is_empty());
        let Some(base_url) = base_url else {
            bail!("No API base URL. Pass --base-url, set ISSUEDECK_BASE_URL, or add base_url to the config file");
        };

        let timeout_secs = cli
            .timeout_secs
            .or(config.request_timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            bail!("Request timeout must be at least one second");
        }

        let theme = cli.theme.clone().or_else(|| config.theme.clone());
        if let Some(name) = theme.as_deref()
            && !THEMES
                .iter()
                .any(|palette| palette.name.eq_ignore_ascii_case(name.trim()))
        {
            tracing::warn!(theme = name, known = ?theme_names(), "unknown theme, using default");
        }

        Ok(Self {
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(timeout_secs),
            theme,
        })
    }
}

fn config_path() -> PathBuf {
    config_dir().join("issuedeck").join("config.toml")
}

fn config_dir() -> PathBuf {
    if let Ok(dir) = env::var("XDG_CONFIG_HOME") {
        return Path::new(&dir).to_path_buf();
    }

    if let Ok(home) = env::var("HOME") {
        return Path::new(&home).join(".config");
    }

    env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
