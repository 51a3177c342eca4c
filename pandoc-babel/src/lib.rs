//! Command-line builder and process driver for pandoc
//!
//!     This crate turns a list of option declarations into a pandoc command line, runs pandoc
//!     as a child process and hands back its output. Pandoc does all the document work; this
//!     crate never parses or serializes a format itself.
//!
//!     TLDR:
//!         - Declare options as `OptionDecl`s (flags, valued options, ordered groups)
//!         - Build a `Converter` from literal text (piped to stdin) or, in path mode, file paths
//!         - Call `convert`, or use the `from <reader>` / `to <writer>` shortcuts of the registry
//!         - Binary writers (docx, odt, epub, epub3) round trip through a temporary file
//!
//! Architecture
//!
//!     .
//!     ├── options.rs      # OptionDecl and the declaration -> token rules
//!     ├── catalog.rs      # Static reader / string writer / binary writer tables
//!     ├── format.rs       # FormatEntry, FormatKind and ConversionOutput
//!     ├── converter.rs    # Settings, Inputs and the Converter engine
//!     ├── runner.rs       # Invocation and the Runner seam (ProcessRunner spawns pandoc)
//!     ├── registry.rs     # FormatRegistry: name -> entry point lookup built from the catalog
//!     ├── publish.rs      # High level "convert and maybe write to disk" API
//!     └── error.rs
//!
//!     Settings are explicit values passed to each converter. There is no process wide mutable
//!     configuration; the shared registry returned by `FormatRegistry::global` is built once
//!     with default settings and never changes.
//!
//!     This is a pure lib, that is, it powers the panbabel cli but is shell agnostic: no code
//!     here prints to stdout or reads env vars.
//!
//! Option Serialization
//!
//!     A one character name becomes `-x`, anything longer becomes `--name` with underscores
//!     turned into hyphens. Values follow as a separate token. Order is preserved exactly, so
//!     options pandoc treats as order sensitive (filters, variables) keep their meaning.
//!
//! Testing
//!
//!     Unit tests substitute a recording `Runner` so command synthesis can be asserted without
//!     pandoc installed. The integration tests in tests/ drive a stub pandoc script, and a few
//!     smoke tests run the real binary when it is found on PATH.
//!
pub mod catalog;
pub mod converter;
pub mod error;
pub mod format;
pub mod options;
pub mod publish;
pub mod registry;
pub mod runner;

pub use converter::{Converter, Inputs, Settings};
pub use error::{ConversionError, ExitStatusCode};
pub use format::{ConversionOutput, FormatEntry, FormatKind};
pub use options::OptionDecl;
pub use publish::{publish, PublishArtifact, PublishResult, PublishSpec};
pub use registry::FormatRegistry;
pub use runner::{Invocation, ProcessRunner, RunOutput, Runner};

/// Converts `inputs` with default [`Settings`] in a single call.
///
/// ```ignore
/// let html = pandoc_babel::convert("# hello", vec![OptionDecl::value("to", "html")])?;
/// ```
pub fn convert(
    inputs: impl Into<Inputs>,
    options: Vec<OptionDecl>,
) -> Result<ConversionOutput, ConversionError> {
    convert_with(Settings::default(), inputs, options)
}

/// Converts `inputs` under explicit `settings` in a single call.
pub fn convert_with(
    settings: Settings,
    inputs: impl Into<Inputs>,
    options: Vec<OptionDecl>,
) -> Result<ConversionOutput, ConversionError> {
    Converter::new(inputs, options)
        .with_settings(settings)
        .convert(Vec::new())
}
