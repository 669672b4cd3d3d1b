//! Shared configuration loader for the markdeck toolchain.
//!
//! `defaults/markdeck.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`MarkdeckConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use markdeck_convert::ConvertOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/markdeck.default.toml");

/// File name picked up from the working directory when present.
pub const USER_CONFIG_FILE: &str = "markdeck.toml";

/// Top-level configuration consumed by markdeck applications.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkdeckConfig {
    pub render: RenderConfig,
    pub reverse: ReverseConfig,
    pub images: ImagesConfig,
}

/// Markdown → HTML knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub hard_breaks: bool,
    pub copy_feedback_ms: u64,
    pub copy_label: String,
}

/// HTML → Markdown knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct ReverseConfig {
    pub list_indent: String,
    pub full_scan_fallback: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImagesConfig {
    /// JSON image store; stored references stay unresolved without one.
    #[serde(default)]
    pub store: Option<PathBuf>,
}

impl From<&MarkdeckConfig> for ConvertOptions {
    fn from(config: &MarkdeckConfig) -> Self {
        ConvertOptions {
            hard_breaks: config.render.hard_breaks,
            copy_feedback_ms: config.render.copy_feedback_ms,
            copy_label: config.render.copy_label.clone(),
            list_indent: config.reverse.list_indent.clone(),
            full_scan_fallback: config.reverse.full_scan_fallback,
        }
    }
}

impl From<MarkdeckConfig> for ConvertOptions {
    fn from(config: MarkdeckConfig) -> Self {
        ConvertOptions::from(&config)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<MarkdeckConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<MarkdeckConfig, ConfigError> {
    Loader::new().build()
}
