//! Format descriptors and conversion output
//!
//! This module defines the data shared by the catalog, the registry and the
//! converter: what kind of format a name refers to, and what a conversion
//! hands back.

use serde::Serialize;

/// Role of a format in the pandoc catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatKind {
    /// Input format pandoc can parse
    Reader,
    /// Output format whose result is text read from standard output
    StringWriter,
    /// Output format pandoc refuses to write to a stream. The result is
    /// written to a file and read back.
    BinaryWriter,
}

/// A catalog entry: short identifier plus human-readable label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormatEntry {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FormatKind,
    /// File extensions (without the leading dot) used for detection
    pub file_extensions: &'static [&'static str],
}

impl FormatEntry {
    pub const fn reader(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FormatKind::Reader,
            file_extensions: &[],
        }
    }

    pub const fn string_writer(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FormatKind::StringWriter,
            file_extensions: &[],
        }
    }

    pub const fn binary_writer(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FormatKind::BinaryWriter,
            file_extensions: &[],
        }
    }

    pub const fn with_extensions(self, file_extensions: &'static [&'static str]) -> Self {
        Self {
            file_extensions,
            ..self
        }
    }

    pub fn is_binary(&self) -> bool {
        self.kind == FormatKind::BinaryWriter
    }
}

/// Output produced by a conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutput {
    /// UTF-8 text captured from standard output (html, rst, markdown, ...)
    Text(String),
    /// Bytes read back from the temporary output file (docx, odt, epub, ...)
    Binary(Vec<u8>),
}

impl ConversionOutput {
    /// Consume the output and return the underlying bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            ConversionOutput::Text(text) => text.into_bytes(),
            ConversionOutput::Binary(bytes) => bytes,
        }
    }

    /// Borrow the text, if this is textual output.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ConversionOutput::Text(text) => Some(text),
            ConversionOutput::Binary(_) => None,
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, ConversionOutput::Binary(_))
    }
}
