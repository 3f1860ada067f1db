//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/jotquote/settings.toml)
//! 3. Environment variables (JOTQUOTE_* prefix)
//!
//! Environment variables take precedence over config file values.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::QuoteError;

/// Environment variable prefix
const ENV_PREFIX: &str = "JOTQUOTE";

/// Contents written to a freshly bootstrapped quote file
const QUOTE_FILE_TEMPLATE: &str = "\
# This is a jotquote quote file.  Each line holds one quote in the format:
#
#   <quote> | <author> | [<publication>] | [<tag1>, <tag2>, ...]
#
# Blank lines and lines beginning with '#' are ignored.
";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the managed quote file
    #[serde(default = "default_quote_file")]
    pub quote_file: PathBuf,

    /// Line terminator used when writing: platform, unix or windows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_separator: Option<String>,

    /// Port for the quote of the day web server
    #[serde(default = "default_web_port")]
    pub web_port: u16,

    /// Address the web server binds to
    #[serde(default = "default_web_ip")]
    pub web_ip: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quote_file: default_quote_file(),
            line_separator: Some(LineSeparator::Platform.as_str().to_string()),
            web_port: default_web_port(),
            web_ip: default_web_ip(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it on first run
    pub fn load() -> Result<Self> {
        Self::load_or_bootstrap(&Self::config_file_path())
    }

    /// Load configuration, writing defaults first if the file does not exist
    ///
    /// On first run this creates the config directory, the settings file, and
    /// an empty quote file (from a commented template) if none exists yet.
    pub fn load_or_bootstrap(path: &Path) -> Result<Self> {
        if !path.exists() {
            Self::bootstrap(path)?;
        }
        Self::load_from_path(path)
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Write default settings and an empty quote file
    fn bootstrap(path: &Path) -> Result<()> {
        let config = Self::default_for(path);
        config.save_to_path(path)?;
        info!("Created default settings file {:?}", path);

        if !config.quote_file.exists() {
            if let Some(parent) = config.quote_file.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
            std::fs::write(&config.quote_file, QUOTE_FILE_TEMPLATE).with_context(|| {
                format!("Failed to create quote file: {:?}", config.quote_file)
            })?;
            info!("Created empty quote file {:?}", config.quote_file);
        }
        Ok(())
    }

    /// Defaults with the quote file placed beside the given settings file
    fn default_for(path: &Path) -> Self {
        let quote_file = path
            .parent()
            .map(|dir| dir.join("quotes.txt"))
            .unwrap_or_else(default_quote_file);
        Self {
            quote_file,
            ..Self::default()
        }
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // JOTQUOTE_QUOTE_FILE
        if let Ok(val) = std::env::var(format!("{}_QUOTE_FILE", ENV_PREFIX)) {
            self.quote_file = PathBuf::from(val);
        }

        // JOTQUOTE_LINE_SEPARATOR
        if let Ok(val) = std::env::var(format!("{}_LINE_SEPARATOR", ENV_PREFIX)) {
            self.line_separator = if val.is_empty() { None } else { Some(val) };
        }

        // JOTQUOTE_WEB_PORT (ignored if not a port number)
        if let Ok(val) = std::env::var(format!("{}_WEB_PORT", ENV_PREFIX)) {
            if let Ok(port) = val.parse() {
                self.web_port = port;
            }
        }

        // JOTQUOTE_WEB_IP
        if let Ok(val) = std::env::var(format!("{}_WEB_IP", ENV_PREFIX)) {
            self.web_ip = val;
        }
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with JOTQUOTE_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        config_dir().join("settings.toml")
    }

    /// Resolve the line terminator to use when writing the quote file
    ///
    /// An unset or empty property means the platform terminator.
    pub fn line_terminator(&self) -> Result<&'static str, QuoteError> {
        match self.line_separator.as_deref() {
            None | Some("") => Ok(LineSeparator::Platform.terminator()),
            Some(value) => value.parse::<LineSeparator>().map(|sep| sep.terminator()),
        }
    }
}

/// Allowed values of the `line_separator` property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSeparator {
    Platform,
    Unix,
    Windows,
}

impl LineSeparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineSeparator::Platform => "platform",
            LineSeparator::Unix => "unix",
            LineSeparator::Windows => "windows",
        }
    }

    pub fn terminator(&self) -> &'static str {
        match self {
            LineSeparator::Platform if cfg!(windows) => "\r\n",
            LineSeparator::Platform => "\n",
            LineSeparator::Unix => "\n",
            LineSeparator::Windows => "\r\n",
        }
    }
}

impl FromStr for LineSeparator {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "platform" => Ok(LineSeparator::Platform),
            "unix" => Ok(LineSeparator::Unix),
            "windows" => Ok(LineSeparator::Windows),
            other => Err(QuoteError::InvalidLineSeparator(other.to_string())),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("jotquote")
}

fn default_quote_file() -> PathBuf {
    config_dir().join("quotes.txt")
}

fn default_web_port() -> u16 {
    5544
}

fn default_web_ip() -> String {
    "127.0.0.1".to_string()
}
