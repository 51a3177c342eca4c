//! Format registry for reader and writer entry points
//!
//! The registry is the lookup table behind the `from <reader>` / `to <writer>`
//! shortcuts. It is built once from the static catalog: every reader maps to a
//! constructor that seeds `--from <reader>`, every writer maps to a function that
//! appends `--to <writer>` and runs the conversion (including the temp-file round
//! trip for binary writers).

use crate::catalog;
use crate::converter::{Converter, Inputs, Settings};
use crate::error::ConversionError;
use crate::format::{ConversionOutput, FormatEntry};
use crate::options::OptionDecl;
use crate::runner::Runner;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;

/// Builds a converter seeded for one reader.
pub type ReaderFn = Box<dyn Fn(Inputs) -> Converter + Send + Sync>;

/// Runs a converter against one writer.
pub type WriterFn = Box<
    dyn Fn(&mut Converter, Vec<OptionDecl>) -> Result<ConversionOutput, ConversionError>
        + Send
        + Sync,
>;

struct Registered<F> {
    entry: FormatEntry,
    call: F,
}

static GLOBAL: Lazy<FormatRegistry> = Lazy::new(FormatRegistry::with_defaults);

/// Registry of reader and writer entry points
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::default();
/// let mut converter = registry.open("markdown", "# Title")?;
/// let html = registry.write("html", &mut converter, vec![])?;
/// ```
pub struct FormatRegistry {
    readers: HashMap<String, Registered<ReaderFn>>,
    writers: HashMap<String, Registered<WriterFn>>,
    settings: Settings,
    runner: Option<Arc<dyn Runner>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            readers: HashMap::new(),
            writers: HashMap::new(),
            settings: Settings::default(),
            runner: None,
        }
    }

    /// Shared registry built from the catalog with default [`Settings`].
    pub fn global() -> &'static FormatRegistry {
        &GLOBAL
    }

    /// Register a reader entry point
    ///
    /// If a reader with the same name already exists, it will be replaced.
    pub fn register_reader(&mut self, entry: FormatEntry, call: ReaderFn) {
        self.readers
            .insert(entry.name.to_string(), Registered { entry, call });
    }

    /// Register a writer entry point
    ///
    /// If a writer with the same name already exists, it will be replaced.
    pub fn register_writer(&mut self, entry: FormatEntry, call: WriterFn) {
        self.writers
            .insert(entry.name.to_string(), Registered { entry, call });
    }

    /// Get a reader by name
    pub fn get_reader(&self, name: &str) -> Result<&FormatEntry, ConversionError> {
        self.readers
            .get(name)
            .map(|r| &r.entry)
            .ok_or_else(|| ConversionError::FormatNotFound(name.to_string()))
    }

    /// Get a writer by name
    pub fn get_writer(&self, name: &str) -> Result<&FormatEntry, ConversionError> {
        self.writers
            .get(name)
            .map(|w| &w.entry)
            .ok_or_else(|| ConversionError::FormatNotFound(name.to_string()))
    }

    pub fn has_reader(&self, name: &str) -> bool {
        self.readers.contains_key(name)
    }

    pub fn has_writer(&self, name: &str) -> bool {
        self.writers.contains_key(name)
    }

    /// List all reader names (sorted)
    pub fn list_readers(&self) -> Vec<String> {
        let mut names: Vec<_> = self.readers.keys().cloned().collect();
        names.sort();
        names
    }

    /// List all writer names (sorted)
    pub fn list_writers(&self) -> Vec<String> {
        let mut names: Vec<_> = self.writers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Build a converter for `reader` (the `from_<reader>` shortcut).
    pub fn open(&self, reader: &str, inputs: impl Into<Inputs>) -> Result<Converter, ConversionError> {
        let registered = self
            .readers
            .get(reader)
            .ok_or_else(|| ConversionError::FormatNotFound(reader.to_string()))?;
        Ok((registered.call)(inputs.into()))
    }

    /// Build a converter that leaves the reader to pandoc's own default.
    pub fn open_unseeded(&self, inputs: impl Into<Inputs>) -> Converter {
        let converter = Converter::new(inputs, vec![]).with_settings(self.settings.clone());
        match &self.runner {
            Some(runner) => converter.with_shared_runner(Arc::clone(runner)),
            None => converter,
        }
    }

    /// Settings every converter built by this registry runs under.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Convert with `writer` (the `to_<writer>` shortcut).
    pub fn write(
        &self,
        writer: &str,
        converter: &mut Converter,
        extra: Vec<OptionDecl>,
    ) -> Result<ConversionOutput, ConversionError> {
        let registered = self
            .writers
            .get(writer)
            .ok_or_else(|| ConversionError::FormatNotFound(writer.to_string()))?;
        (registered.call)(converter, extra)
    }

    /// Detect a reader from a filename's extension
    ///
    /// ```ignore
    /// let registry = FormatRegistry::default();
    /// assert_eq!(registry.detect_reader_from_filename("doc.md"), Some("markdown".to_string()));
    /// assert_eq!(registry.detect_reader_from_filename("doc.unknown"), None);
    /// ```
    ///
    /// Catalog entries are searched in catalog order, then any other registered
    /// readers by name, so the first match is stable.
    pub fn detect_reader_from_filename(&self, filename: &str) -> Option<String> {
        let extension = extension_of(filename)?;
        detect(&self.readers, catalog::readers().iter(), extension)
    }

    /// Detect a writer from a filename's extension (e.g. the `-o` target)
    pub fn detect_writer_from_filename(&self, filename: &str) -> Option<String> {
        let extension = extension_of(filename)?;
        detect(&self.writers, catalog::writers(), extension)
    }

    /// Create a registry with the catalog formats and default settings
    pub fn with_defaults() -> Self {
        Self::from_catalog(Settings::default(), None)
    }

    /// Create a registry whose converters run under `settings`
    pub fn with_settings(settings: Settings) -> Self {
        Self::from_catalog(settings, None)
    }

    /// Create a registry whose converters run under `settings` with `runner`
    pub fn with_runner(settings: Settings, runner: impl Runner + 'static) -> Self {
        Self::from_catalog(settings, Some(Arc::new(runner)))
    }

    fn from_catalog(settings: Settings, runner: Option<Arc<dyn Runner>>) -> Self {
        let mut registry = Self::new();
        registry.settings = settings.clone();
        registry.runner = runner.clone();

        for entry in catalog::readers() {
            let settings = settings.clone();
            let runner = runner.clone();
            let name = entry.name;
            registry.register_reader(
                *entry,
                Box::new(move |inputs: Inputs| {
                    let converter = Converter::new(inputs, vec![OptionDecl::value("from", name)])
                        .with_settings(settings.clone());
                    match &runner {
                        Some(runner) => converter.with_shared_runner(Arc::clone(runner)),
                        None => converter,
                    }
                }),
            );
        }

        for entry in catalog::writers() {
            let name = entry.name;
            registry.register_writer(
                *entry,
                Box::new(move |converter: &mut Converter, extra: Vec<OptionDecl>| {
                    converter.to_writer(name, extra)
                }),
            );
        }

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn detect<'a, F>(
    registered: &HashMap<String, Registered<F>>,
    catalog_order: impl Iterator<Item = &'a FormatEntry>,
    extension: &str,
) -> Option<String> {
    let mut order: Vec<&str> = catalog_order.map(|entry| entry.name).collect();
    let mut rest: Vec<&str> = registered
        .keys()
        .map(String::as_str)
        .filter(|name| !order.contains(name))
        .collect();
    rest.sort_unstable();
    order.extend(rest);

    order
        .into_iter()
        .filter_map(|name| registered.get(name))
        .find(|r| r.entry.file_extensions.contains(&extension))
        .map(|r| r.entry.name.to_string())
}

fn extension_of(filename: &str) -> Option<&str> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
}
