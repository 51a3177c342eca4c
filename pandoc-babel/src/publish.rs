//! Document publishing pipeline.
//!
//! Provides a high-level API for running a conversion and optionally writing the
//! result to disk. This module bridges the gap between the format registry and
//! file I/O, handling both in-memory and file-based output.
//!
//! For more control over the conversion process, use [`Converter`] or
//! [`FormatRegistry`] directly.
//!
//! [`Converter`]: crate::converter::Converter

use crate::catalog;
use crate::converter::Inputs;
use crate::error::ConversionError;
use crate::format::ConversionOutput;
use crate::options::OptionDecl;
use crate::registry::FormatRegistry;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Specifies how to publish a conversion.
///
/// ```ignore
/// let spec = PublishSpec::new("# Title", "docx")
///     .with_reader("markdown")
///     .with_output_path("output.docx")
///     .with_option(OptionDecl::from("toc"));
/// ```
///
/// If no output path is provided, string writers return in-memory content.
/// Binary writers (docx, odt, epub) require an explicit output path.
#[derive(Debug, Clone)]
pub struct PublishSpec {
    /// Literal text or file paths to convert.
    pub inputs: Inputs,
    /// Target writer name (e.g., "html", "rst", "docx").
    pub writer: String,
    /// Optional reader name; pandoc guesses when absent.
    pub reader: Option<String>,
    /// Optional file path for writing output. Required for binary writers.
    pub output: Option<PathBuf>,
    /// Option declarations placed before `--to <writer>`.
    pub options: Vec<OptionDecl>,
}

impl PublishSpec {
    pub fn new(inputs: impl Into<Inputs>, writer: impl Into<String>) -> Self {
        Self {
            inputs: inputs.into(),
            writer: writer.into(),
            reader: None,
            output: None,
            options: Vec::new(),
        }
    }

    pub fn with_reader(mut self, reader: impl Into<String>) -> Self {
        self.reader = Some(reader.into());
        self
    }

    /// Sets the output file path. If provided, content is written to disk.
    pub fn with_output_path(mut self, path: impl AsRef<Path>) -> Self {
        self.output = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_option(mut self, decl: impl Into<OptionDecl>) -> Self {
        self.options.push(decl.into());
        self
    }

    pub fn with_options(mut self, decls: impl IntoIterator<Item = OptionDecl>) -> Self {
        self.options.extend(decls);
        self
    }
}

/// The output from a successful publish operation.
#[derive(Debug, Clone, PartialEq)]
pub enum PublishArtifact {
    /// Content held in memory (string writers without an output path).
    InMemory(String),
    /// Path to the written file (when output path was specified).
    File(PathBuf),
}

/// Result of a publish operation.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishResult {
    pub artifact: PublishArtifact,
}

/// Publishes with the shared registry (default settings).
pub fn publish(spec: PublishSpec) -> Result<PublishResult, ConversionError> {
    publish_with(FormatRegistry::global(), spec)
}

/// Publishes using `registry`, which determines the settings converters run
/// under.
///
/// # Errors
///
/// Returns [`ConversionError`] if:
/// - The reader or writer is not in the catalog
/// - A binary writer is requested without an output path (checked before
///   pandoc is launched)
/// - The conversion fails
/// - Writing the output file fails
pub fn publish_with(
    registry: &FormatRegistry,
    spec: PublishSpec,
) -> Result<PublishResult, ConversionError> {
    registry.get_writer(&spec.writer)?;
    if catalog::is_binary_writer(&spec.writer) && spec.output.is_none() {
        return Err(ConversionError::Input(format!(
            "binary writer '{}' requires an explicit output path",
            spec.writer
        )));
    }

    let mut converter = match &spec.reader {
        Some(reader) => registry.open(reader, spec.inputs)?,
        None => registry.open_unseeded(spec.inputs),
    };

    let output = registry.write(&spec.writer, &mut converter, spec.options)?;
    match output {
        ConversionOutput::Text(text) => write_or_return_text(text, spec.output),
        ConversionOutput::Binary(bytes) => write_binary(bytes, spec.output),
    }
}

fn write_or_return_text(
    text: String,
    output: Option<PathBuf>,
) -> Result<PublishResult, ConversionError> {
    if let Some(path) = output {
        write_to_path(path, text.into_bytes()).map(|path| PublishResult {
            artifact: PublishArtifact::File(path),
        })
    } else {
        Ok(PublishResult {
            artifact: PublishArtifact::InMemory(text),
        })
    }
}

fn write_binary(bytes: Vec<u8>, output: Option<PathBuf>) -> Result<PublishResult, ConversionError> {
    let path = output.ok_or_else(|| {
        ConversionError::Input("binary writers require an explicit output path".to_string())
    })?;
    write_to_path(path, bytes).map(|path| PublishResult {
        artifact: PublishArtifact::File(path),
    })
}

fn write_to_path(path: PathBuf, bytes: Vec<u8>) -> Result<PathBuf, ConversionError> {
    debug!(path = %path.display(), bytes = bytes.len(), "writing published output");
    fs::write(&path, &bytes)
        .map(|_| path.clone())
        .map_err(|source| ConversionError::Write { path, source })
}
