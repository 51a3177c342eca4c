//! Shared configuration loader for the pandoc-babel tools.
//!
//! `defaults/pandoc.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files and
//! environment variables on top of those defaults via [`Loader`] before
//! deserializing into [`PandocConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat, ValueKind};
use pandoc_babel::{OptionDecl, Settings};
use serde::Deserialize;
use std::path::Path;

pub use config::{ConfigError, Map};

const DEFAULT_TOML: &str = include_str!("../defaults/pandoc.default.toml");

/// Prefix for environment overrides (`PANDOC_BABEL__PANDOC__FAIL_ON_STDERR`).
pub const ENV_PREFIX: &str = "PANDOC_BABEL";
const ENV_SEPARATOR: &str = "__";

/// Top-level configuration consumed by pandoc-babel applications.
#[derive(Debug, Clone, Deserialize)]
pub struct PandocConfig {
    pub pandoc: PandocSection,
    pub convert: ConvertConfig,
}

/// How pandoc is launched.
#[derive(Debug, Clone, Deserialize)]
pub struct PandocSection {
    pub executable_path: String,
    pub allow_file_paths: bool,
    pub fail_on_stderr: bool,
}

impl From<&PandocSection> for Settings {
    fn from(section: &PandocSection) -> Self {
        Settings::default()
            .with_executable_path(section.executable_path.clone())
            .with_path_mode(section.allow_file_paths)
            .with_fail_on_stderr(section.fail_on_stderr)
    }
}

impl From<PandocSection> for Settings {
    fn from(section: PandocSection) -> Self {
        Settings::from(&section)
    }
}

/// Options applied to every conversion.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    /// Entries in `name` or `name=value` form; leading dashes are allowed.
    pub options: Vec<String>,
}

impl ConvertConfig {
    /// Parses `options` into declarations, skipping entries with no name.
    pub fn option_decls(&self) -> Vec<OptionDecl> {
        self.options
            .iter()
            .filter_map(|raw| OptionDecl::parse(raw))
            .collect()
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

    /// Layer `PANDOC_BABEL__<SECTION>__<KEY>` variables from the process environment.
    pub fn with_env(self) -> Self {
        self.with_env_source(None)
    }

    /// Like [`Loader::with_env`], reading from `vars` instead of the process
    /// environment when given.
    pub fn with_env_source(mut self, vars: Option<Map<String, String>>) -> Self {
        let source = Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
            .source(vars);
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
    pub fn build(self) -> Result<PandocConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<PandocConfig, ConfigError> {
    Loader::new().build()
}
