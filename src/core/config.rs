// Copyright © 2024 BlogFlow. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Configuration Module
//!
//! Layered configuration for BlogFlow. Values are resolved in this order,
//! later layers winning:
//!
//! 1. built-in defaults
//! 2. a TOML file
//! 3. environment variables carrying a prefix; `__` separates a section
//!    from its key, so `BLOGFLOW_SITE__TITLE` sets `site.title`
//! 4. programmatic overrides, such as command-line flags
//!
//! The result is validated before it is handed out.
//!
//! ## Example
//!
//! ```rust,no_run
//! use blogflow::core::config::ConfigBuilder;
//!
//! let config = ConfigBuilder::new()
//!     .with_file("blogflow.toml")
//!     .with_env_prefix("BLOGFLOW_")
//!     .with_override("output_dir", "dist")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.output_dir.to_str(), Some("dist"));
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use toml::Value as TomlValue;

use crate::i18n::Language;
use crate::{BlogFlowError, Result};

/// Represents the main configuration structure encompassing all settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_content_dir")]
    /// Directory holding the content collections (`<content_dir>/posts`).
    pub content_dir: PathBuf,

    #[serde(default = "default_output_dir")]
    /// Directory generated files are written to.
    pub output_dir: PathBuf,

    #[serde(default = "default_languages")]
    /// Languages to publish.
    pub languages: Vec<Language>,

    #[serde(default)]
    /// Site identity used by feeds.
    pub site: SiteConfig,

    #[serde(default)]
    /// Feed generation settings.
    pub feed: FeedConfig,

    #[serde(default)]
    /// Listing settings.
    pub listing: ListingConfig,
}

/// Site identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_title")]
    /// Site title, used as the prefix of feed titles.
    pub title: String,

    #[serde(default = "default_site_url")]
    /// Absolute base URL of the published site.
    pub url: String,
}

impl SiteConfig {
    /// The site URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_site_title(),
            url: default_site_url(),
        }
    }
}

/// Feed generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_true")]
    /// Whether an RSS feed is written per language.
    pub enabled: bool,

    #[serde(default = "default_feed_file_name")]
    /// File name of the feed inside each language directory.
    pub file_name: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file_name: default_feed_file_name(),
        }
    }
}

/// Listing settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingConfig {
    #[serde(default = "default_page_size")]
    /// Posts per listing page.
    pub page_size: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl Default for Config {
    /// Creates a default `Config` instance with preset values.
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            output_dir: default_output_dir(),
            languages: default_languages(),
            site: SiteConfig::default(),
            feed: FeedConfig::default(),
            listing: ListingConfig::default(),
        }
    }
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        validate_config(self)
    }
}

/// Builds a `Config` instance from defaults, a file, the environment and
/// explicit overrides.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_file: Option<PathBuf>,
    env_prefix: Option<String>,
    overrides: Vec<(String, TomlValue)>,
}

impl ConfigBuilder {
    /// Initialises a new `ConfigBuilder` instance with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a configuration file to the builder.
    ///
    /// # Parameters
    /// - `path`: The path to the TOML configuration file.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Adds a prefix for environment variables to override configuration values.
    ///
    /// # Parameters
    /// - `prefix`: The prefix for environment variables (e.g., "BLOGFLOW_").
    pub fn with_env_prefix<S: Into<String>>(
        mut self,
        prefix: S,
    ) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Adds a key-value pair to override configuration values.
    ///
    /// Overrides are applied in the order they were added.
    ///
    /// # Parameters
    /// - `key`: The configuration key to override, e.g. `site.title`.
    /// - `value`: The new value for the key.
    pub fn with_override<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<TomlValue>,
    {
        self.overrides.push((key.into(), value.into()));
        self
    }

    /// Builds the final configuration by applying all specified settings and overrides.
    pub fn build(self) -> Result<Config> {
        let mut config = if let Some(path) = self.config_file {
            load_from_file(&path)?
        } else {
            Config::default()
        };

        if let Some(prefix) = self.env_prefix {
            apply_env_overrides(&mut config, &prefix)?;
        }

        for (key, value) in &self.overrides {
            apply_config_value(&mut config, key, value)?;
        }

        validate_config(&config)?;
        Ok(config)
    }
}

// Internal helper functions

fn load_from_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| {
        BlogFlowError::config_error(
            format!("Failed to read config file: {}", e),
            Some(path.to_path_buf()),
        )
    })?;

    toml::from_str(&content).map_err(|e| {
        BlogFlowError::config_error(
            format!("Failed to parse config file: {}", e),
            Some(path.to_path_buf()),
        )
    })
}

fn apply_env_overrides(config: &mut Config, prefix: &str) -> Result<()> {
    let mut vars = Vec::new();
    for (key, value) in env::vars_os() {
        let Some(key) = key.to_str().filter(|key| key.starts_with(prefix))
        else {
            continue;
        };
        let value = value.into_string().map_err(|_| {
            BlogFlowError::config_error(
                format!("Environment variable {} is not valid UTF-8", key),
                None,
            )
        })?;
        vars.push((key.to_string(), value));
    }
    vars.sort();

    for (key, value) in vars {
        let config_key = key[prefix.len()..]
            .trim_start_matches('_')
            .to_lowercase()
            .replace("__", ".");
        apply_config_value(config, &config_key, &TomlValue::String(value))?;
    }
    Ok(())
}

fn apply_config_value(
    config: &mut Config,
    key: &str,
    value: &TomlValue,
) -> Result<()> {
    match key {
        "content_dir" => config.content_dir = PathBuf::from(scalar(key, value)?),
        "output_dir" => config.output_dir = PathBuf::from(scalar(key, value)?),
        "languages" => config.languages = parse_languages(key, value)?,
        "site.title" => config.site.title = scalar(key, value)?,
        "site.url" => config.site.url = scalar(key, value)?,
        "feed.enabled" => {
            config.feed.enabled = match value {
                TomlValue::Boolean(enabled) => *enabled,
                _ => parse_value(key, &scalar(key, value)?)?,
            };
        }
        "feed.file_name" => config.feed.file_name = scalar(key, value)?,
        "listing.page_size" => {
            config.listing.page_size = parse_value(key, &scalar(key, value)?)?;
        }
        _ => {
            return Err(BlogFlowError::config_error(
                format!("Unknown configuration key: {}", key),
                None,
            ));
        }
    }
    Ok(())
}

/// The text of a scalar value; strings are taken verbatim.
fn scalar(key: &str, value: &TomlValue) -> Result<String> {
    match value {
        TomlValue::String(text) => Ok(text.clone()),
        TomlValue::Integer(_) | TomlValue::Float(_) | TomlValue::Boolean(_) => {
            Ok(value.to_string())
        }
        _ => Err(BlogFlowError::config_error(
            format!("Expected a single value for {}, got {}", key, value),
            None,
        )),
    }
}

/// Languages from a TOML array of codes or a comma-separated string.
fn parse_languages(key: &str, value: &TomlValue) -> Result<Vec<Language>> {
    match value {
        TomlValue::Array(items) => items
            .iter()
            .map(|item| match item {
                TomlValue::String(code) => Language::from_code(code),
                other => Err(BlogFlowError::config_error(
                    format!("Invalid {} entry: {}", key, other),
                    None,
                )),
            })
            .collect(),
        TomlValue::String(codes) => codes
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(Language::from_code)
            .collect(),
        other => Err(BlogFlowError::config_error(
            format!("Invalid {} value: {}", key, other),
            None,
        )),
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e| {
        BlogFlowError::config_error(
            format!("Invalid {} value '{}': {}", key, value, e),
            None,
        )
    })
}

fn validate_config(config: &Config) -> Result<()> {
    if config.site.title.trim().is_empty() {
        return Err(BlogFlowError::config_error(
            "Site title cannot be empty",
            None,
        ));
    }

    let url = config.site.url.as_str();
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(BlogFlowError::config_error(
            format!("Site url must be absolute http(s): {}", url),
            None,
        ));
    }

    if config.languages.is_empty() {
        return Err(BlogFlowError::config_error(
            "At least one language must be configured",
            None,
        ));
    }

    for (index, lang) in config.languages.iter().enumerate() {
        if config.languages[..index].contains(lang) {
            return Err(BlogFlowError::config_error(
                format!("Language {} is configured more than once", lang),
                None,
            ));
        }
    }

    if config.listing.page_size == 0 {
        return Err(BlogFlowError::config_error(
            "Listing page size must be greater than zero",
            None,
        ));
    }

    if config.feed.file_name.trim().is_empty() {
        return Err(BlogFlowError::config_error(
            "Feed file name cannot be empty",
            None,
        ));
    }

    Ok(())
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("content")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_languages() -> Vec<Language> {
    Language::ALL.to_vec()
}

fn default_site_title() -> String {
    "Blog".to_string()
}

fn default_site_url() -> String {
    "https://example.com".to_string()
}

fn default_feed_file_name() -> String {
    "rss.xml".to_string()
}

fn default_page_size() -> usize {
    10
}

/// Tests for the configuration module.
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.languages, Language::ALL.to_vec());
        assert_eq!(config.feed.file_name, "rss.xml");
        assert_eq!(config.listing.page_size, 10);
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("blogflow.toml");
        fs::write(
            &config_file,
            "content_dir = 'src/content'\nlanguages = ['es']\n\n[site]\ntitle = 'Samuel de Vega'\nurl = 'https://samdevega.com/'\n",
        )
        .unwrap();

        let config = ConfigBuilder::new().with_file(&config_file).build().unwrap();
        assert_eq!(config.content_dir, PathBuf::from("src/content"));
        assert_eq!(config.languages, vec![Language::Spanish]);
        assert_eq!(config.site.title, "Samuel de Vega");
        assert_eq!(config.site.base_url(), "https://samdevega.com");
        assert!(config.feed.enabled);
    }

    #[test]
    fn test_unknown_language_in_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("blogflow.toml");
        fs::write(&config_file, "languages = ['fr']\n").unwrap();

        let err = ConfigBuilder::new()
            .with_file(&config_file)
            .build()
            .unwrap_err();
        assert!(matches!(err, BlogFlowError::ConfigError { path: Some(_), .. }));
    }

    #[test]
    fn test_overrides() {
        let config = ConfigBuilder::new()
            .with_override("output_dir", "dist")
            .with_override("site.title", "Override")
            .with_override("listing.page_size", 3_i64)
            .with_override("languages", "en")
            .build()
            .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("dist"));
        assert_eq!(config.site.title, "Override");
        assert_eq!(config.listing.page_size, 3);
        assert_eq!(config.languages, vec![Language::English]);
    }

    #[test]
    fn test_unknown_key_fails() {
        let err = ConfigBuilder::new()
            .with_override("site.colour", "blue")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("Unknown configuration key"));
    }

    #[test]
    fn test_env_overrides() {
        env::set_var("BLOGFLOW_CONFIG_TEST_SITE__TITLE", "From env");
        env::set_var("BLOGFLOW_CONFIG_TEST_FEED__ENABLED", "false");

        let config = ConfigBuilder::new()
            .with_env_prefix("BLOGFLOW_CONFIG_TEST_")
            .build()
            .unwrap();

        assert_eq!(config.site.title, "From env");
        assert!(!config.feed.enabled);
    }

    #[test]
    fn test_typed_overrides() {
        let config = ConfigBuilder::new()
            .with_override("languages", vec!["es", "en"])
            .with_override("site.title", r#"The "Quoted" \ Blog"#)
            .with_override("feed.enabled", false)
            .build()
            .unwrap();

        assert_eq!(config.languages, vec![Language::Spanish, Language::English]);
        assert_eq!(config.site.title, r#"The "Quoted" \ Blog"#);
        assert!(!config.feed.enabled);
    }

    #[test]
    fn test_non_scalar_override_fails() {
        let err = ConfigBuilder::new()
            .with_override("site.title", vec!["a", "b"])
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("site.title"));

        let err = ConfigBuilder::new()
            .with_override("languages", vec![1_i64])
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("languages"));
    }

    #[test]
    fn test_duplicate_languages_fail() {
        let err = ConfigBuilder::new()
            .with_override("languages", vec!["en", "es", "en"])
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[cfg(unix)]
    #[test]
    fn test_env_overrides_tolerate_non_utf8_entries() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"\xff\xfe");
        env::set_var("BLOGFLOW_UNRELATED_RAW_BYTES", raw);
        env::set_var("BLOGFLOW_CONFIG_UTF8_SITE__TITLE", "Still works");

        let config = ConfigBuilder::new()
            .with_env_prefix("BLOGFLOW_CONFIG_UTF8_")
            .build()
            .unwrap();
        assert_eq!(config.site.title, "Still works");

        env::set_var("BLOGFLOW_CONFIG_RAW_SITE__TITLE", raw);
        let err = ConfigBuilder::new()
            .with_env_prefix("BLOGFLOW_CONFIG_RAW_")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("not valid UTF-8"));
    }

    #[test]
    fn test_invalid_bool_fails() {
        let err = ConfigBuilder::new()
            .with_override("feed.enabled", "maybe")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("feed.enabled"));
    }

    #[test]
    fn test_validation() {
        let mut config = Config::default();
        config.listing.page_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.site.url = "samdevega.com".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.languages.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.site.title = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
