//! Conversion engine
//!
//! A [`Converter`] owns one conversion request: the inputs, the option
//! declarations accumulated so far and the [`Settings`] it runs under. Calling
//! [`Converter::convert`] appends any extra declarations, synthesizes the pandoc
//! invocation, runs it and hands back the output.
//!
//! Command synthesis:
//!
//!     <executable_path> <options...> [<input paths...>] [--output <temp file>]
//!
//! Inputs are passed as trailing paths only in path mode when every input names an
//! existing file. Otherwise they are literal text, joined in order by a blank line
//! and piped to standard input.
//!
//! Binary writers (docx, odt, epub, epub3) cannot print to a stream, so a uniquely
//! named temporary file is allocated for each call, pandoc is told to write there,
//! and the bytes are read back. The file is owned by a guard and removed when the
//! call returns, whether it succeeded or not.

use crate::catalog;
use crate::error::ConversionError;
use crate::format::ConversionOutput;
use crate::options::{self, OptionDecl};
use crate::runner::{Invocation, ProcessRunner, Runner};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempPath;
use tracing::{debug, warn};

/// Option names pandoc accepts for the output format.
const WRITER_OPTIONS: &[&str] = &["t", "to", "w", "write"];
/// Option names pandoc accepts for the output file.
const OUTPUT_OPTIONS: &[&str] = &["o", "output"];

/// How conversions are run.
///
/// Passed explicitly to each [`Converter`]; there is no process-wide mutable
/// state. Share a `Settings` value between callers that need the same setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Command used to launch pandoc. Split on whitespace: the first word is
    /// the program, the rest are leading arguments (`/usr/bin/env pandoc`).
    pub executable_path: String,
    /// Treat inputs naming existing files as paths instead of literal text.
    pub path_mode: bool,
    /// Fail when pandoc writes to stderr even if it exits successfully.
    pub fail_on_stderr: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            executable_path: "pandoc".to_string(),
            path_mode: false,
            fail_on_stderr: true,
        }
    }
}

impl Settings {
    pub fn with_executable_path(mut self, path: impl Into<String>) -> Self {
        self.executable_path = path.into();
        self
    }

    pub fn with_path_mode(mut self, enabled: bool) -> Self {
        self.path_mode = enabled;
        self
    }

    pub fn with_fail_on_stderr(mut self, enabled: bool) -> Self {
        self.fail_on_stderr = enabled;
        self
    }
}

/// Ordered conversion inputs: literal text or file paths.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Inputs(Vec<String>);

impl Inputs {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<&str> for Inputs {
    fn from(input: &str) -> Self {
        Inputs(vec![input.to_string()])
    }
}

impl From<String> for Inputs {
    fn from(input: String) -> Self {
        Inputs(vec![input])
    }
}

impl From<&String> for Inputs {
    fn from(input: &String) -> Self {
        Inputs(vec![input.clone()])
    }
}

impl From<Vec<String>> for Inputs {
    fn from(inputs: Vec<String>) -> Self {
        Inputs(inputs)
    }
}

impl From<Vec<&str>> for Inputs {
    fn from(inputs: Vec<&str>) -> Self {
        Inputs(inputs.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Inputs {
    fn from(inputs: &[&str]) -> Self {
        Inputs(inputs.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Inputs {
    fn from(inputs: [&str; N]) -> Self {
        Inputs(inputs.iter().map(|s| s.to_string()).collect())
    }
}

/// Where pandoc reads its input from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum InputSource {
    /// Trailing path arguments
    Paths(Vec<String>),
    /// Literal text on standard input
    Literal(String),
}

/// A single conversion request.
#[derive(Clone)]
pub struct Converter {
    inputs: Inputs,
    options: Vec<OptionDecl>,
    settings: Settings,
    runner: Arc<dyn Runner>,
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("inputs", &self.inputs)
            .field("options", &self.options)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Converter {
    /// Create a request with default [`Settings`].
    pub fn new(inputs: impl Into<Inputs>, options: Vec<OptionDecl>) -> Self {
        Self {
            inputs: inputs.into(),
            options,
            settings: Settings::default(),
            runner: Arc::new(ProcessRunner),
        }
    }

    /// Create a request pre-seeded with `--from <reader>`.
    pub fn from_reader(reader: &str, inputs: impl Into<Inputs>) -> Result<Self, ConversionError> {
        if !catalog::is_reader(reader) {
            return Err(ConversionError::FormatNotFound(reader.to_string()));
        }
        Ok(Self::new(inputs, vec![OptionDecl::value("from", reader)]))
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Replace the process runner (used by tests and embedders).
    pub fn with_runner(mut self, runner: impl Runner + 'static) -> Self {
        self.runner = Arc::new(runner);
        self
    }

    pub(crate) fn with_shared_runner(mut self, runner: Arc<dyn Runner>) -> Self {
        self.runner = runner;
        self
    }

    /// Append a declaration without running anything.
    pub fn push_option(&mut self, decl: impl Into<OptionDecl>) {
        self.options.push(decl.into());
    }

    pub fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    pub fn options(&self) -> &[OptionDecl] {
        &self.options
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Writer named by the last `-t`/`--to`/`-w`/`--write` declaration.
    ///
    /// Extensions (`markdown+smart`, `html-raw_html`) are stripped.
    pub fn requested_writer(&self) -> Option<&str> {
        options::declared_value(&self.options, WRITER_OPTIONS)
            .and_then(|value| value.split(['+', '-']).next())
    }

    /// Append `extra` to the stored options, then run the conversion.
    ///
    /// The stored options are extended, not replaced: a second call sees the
    /// declarations of the first. Build a new `Converter` for a fresh request.
    pub fn convert(&mut self, extra: Vec<OptionDecl>) -> Result<ConversionOutput, ConversionError> {
        self.options.extend(extra);

        let temp = self.allocate_output()?;
        let invocation = self.plan(temp.as_deref())?;
        debug!(command = %invocation.command_line(), "synthesized pandoc command");

        let run = self.runner.run(&invocation)?;
        let stderr = String::from_utf8_lossy(&run.stderr).trim().to_string();
        if !run.success() || (self.settings.fail_on_stderr && !stderr.is_empty()) {
            return Err(ConversionError::Invocation {
                command: invocation.command_line(),
                status: run.status_code.into(),
                stderr,
            });
        }
        if !stderr.is_empty() {
            warn!(%stderr, "pandoc reported diagnostics");
        }

        match temp {
            Some(path) => {
                let bytes = fs::read(&path).map_err(|source| ConversionError::TempFile {
                    detail: format!("could not read back '{}'", path.display()),
                    source,
                })?;
                let shown = path.display().to_string();
                if let Err(err) = path.close() {
                    warn!(error = %err, "failed to remove temporary output file");
                }
                if bytes.is_empty() {
                    return Err(ConversionError::InvalidOutput(format!(
                        "pandoc exited successfully but wrote nothing to '{shown}'"
                    )));
                }
                Ok(ConversionOutput::Binary(bytes))
            }
            None => String::from_utf8(run.stdout)
                .map(ConversionOutput::Text)
                .map_err(|e| ConversionError::InvalidOutput(format!("output is not UTF-8: {e}"))),
        }
    }

    /// Run with no extra options and return the output as text.
    pub fn to_text(&mut self) -> Result<String, ConversionError> {
        match self.convert(Vec::new())? {
            ConversionOutput::Text(text) => Ok(text),
            ConversionOutput::Binary(bytes) => String::from_utf8(bytes).map_err(|_| {
                ConversionError::InvalidOutput(
                    "binary output cannot be represented as text".to_string(),
                )
            }),
        }
    }

    /// Convert to a catalog writer: appends `--to <writer>` after `extra`.
    pub fn to_writer(
        &mut self,
        writer: &str,
        mut extra: Vec<OptionDecl>,
    ) -> Result<ConversionOutput, ConversionError> {
        if !catalog::is_writer(writer) {
            return Err(ConversionError::FormatNotFound(writer.to_string()));
        }
        extra.push(OptionDecl::value("to", writer));
        self.convert(extra)
    }

    /// The invocation a conversion would run, without the temporary output
    /// redirection binary writers add.
    pub fn invocation(&self) -> Result<Invocation, ConversionError> {
        self.plan(None)
    }

    /// [`Converter::invocation`] as a single command string.
    pub fn command_line(&self) -> Result<String, ConversionError> {
        Ok(self.invocation()?.command_line())
    }

    fn plan(&self, output: Option<&Path>) -> Result<Invocation, ConversionError> {
        let mut words = self.settings.executable_path.split_whitespace();
        let program = words.next().ok_or_else(|| ConversionError::Launch {
            program: self.settings.executable_path.clone(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "empty executable path"),
        })?;

        let mut args: Vec<String> = words.map(str::to_string).collect();
        args.extend(options::tokens(&self.options));

        let stdin = match self.resolve_inputs()? {
            InputSource::Paths(paths) => {
                args.extend(paths);
                None
            }
            InputSource::Literal(text) => Some(text),
        };

        if let Some(path) = output {
            args.push("--output".to_string());
            args.push(path.display().to_string());
        }

        Ok(Invocation {
            program: program.to_string(),
            args,
            stdin,
            output: output.map(Path::to_path_buf),
        })
    }

    fn resolve_inputs(&self) -> Result<InputSource, ConversionError> {
        let inputs = self.inputs.as_slice();
        if inputs.is_empty() {
            return Err(ConversionError::Input("no inputs supplied".to_string()));
        }

        if self.settings.path_mode {
            let missing: Vec<&str> = inputs
                .iter()
                .filter(|input| !Path::new(input.as_str()).exists())
                .map(String::as_str)
                .collect();

            if missing.is_empty() {
                for input in inputs {
                    check_readable(input)?;
                }
                return Ok(InputSource::Paths(inputs.to_vec()));
            }
            if missing.len() != inputs.len() {
                return Err(ConversionError::Input(format!(
                    "cannot mix file paths and literal text; not found: {}",
                    missing.join(", ")
                )));
            }
        }

        Ok(InputSource::Literal(inputs.join("\n\n")))
    }

    /// Temporary output file for binary writers, unless the caller already
    /// chose an output file.
    fn allocate_output(&self) -> Result<Option<TempPath>, ConversionError> {
        let Some(writer) = self.requested_writer() else {
            return Ok(None);
        };
        if !catalog::is_binary_writer(writer)
            || options::is_declared(&self.options, OUTPUT_OPTIONS)
        {
            return Ok(None);
        }

        let suffix = format!(".{}", output_extension(writer));
        let file = tempfile::Builder::new()
            .prefix("pandoc-babel-")
            .suffix(&suffix)
            .tempfile()
            .map_err(|source| ConversionError::TempFile {
                detail: format!("could not create temporary {writer} output"),
                source,
            })?;
        // Close our handle; pandoc opens the path itself.
        let path = file.into_temp_path();
        debug!(path = %path.display(), "allocated temporary output");
        Ok(Some(path))
    }
}

fn check_readable(input: &str) -> Result<(), ConversionError> {
    let path = Path::new(input);
    if !path.is_file() {
        return Err(ConversionError::Input(format!(
            "'{input}' is not a regular file"
        )));
    }
    fs::File::open(path)
        .map(|_| ())
        .map_err(|e| ConversionError::Input(format!("'{input}' is not readable: {e}")))
}

fn output_extension(writer: &str) -> &str {
    match writer {
        "epub3" => "epub",
        other => other,
    }
}
