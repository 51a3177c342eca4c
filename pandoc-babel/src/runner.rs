//! Process execution
//!
//! The converter describes what to run as an [`Invocation`] and hands it to a
//! [`Runner`]. [`ProcessRunner`] is the real implementation; tests substitute
//! runners that record the invocation instead of spawning pandoc.

use crate::error::ConversionError;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use tracing::debug;

/// A fully synthesized pandoc call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to launch (first word of the configured executable path)
    pub program: String,
    /// Arguments in order: leading executable words, options, paths, output
    pub args: Vec<String>,
    /// Literal text piped to standard input, if any
    pub stdin: Option<String>,
    /// File pandoc is told to write to, for binary writers
    pub output: Option<PathBuf>,
}

impl Invocation {
    /// The invocation as a single space-joined command string.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// What a finished process left behind.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunOutput {
    /// Exit code, `None` when terminated by a signal
    pub status_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl RunOutput {
    pub fn success(&self) -> bool {
        self.status_code == Some(0)
    }
}

/// Executes an [`Invocation`] and blocks until it completes.
pub trait Runner: Send + Sync {
    fn run(&self, invocation: &Invocation) -> Result<RunOutput, ConversionError>;
}

/// Runs pandoc as a child process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl Runner for ProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<RunOutput, ConversionError> {
        debug!(command = %invocation.command_line(), "spawning pandoc");

        let stdin = if invocation.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        };

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(stdin)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ConversionError::Launch {
                program: invocation.program.clone(),
                source,
            })?;

        // Feed stdin from a separate thread so a large document cannot
        // deadlock against pandoc filling the stdout pipe.
        let writer = match (child.stdin.take(), invocation.stdin.clone()) {
            (Some(mut pipe), Some(text)) => Some(thread::spawn(move || -> io::Result<()> {
                pipe.write_all(text.as_bytes())?;
                // dropping `pipe` closes the child's stdin
                Ok(())
            })),
            _ => None,
        };

        let output = child
            .wait_with_output()
            .map_err(|source| ConversionError::Launch {
                program: invocation.program.clone(),
                source,
            })?;

        if let Some(handle) = writer {
            match handle.join() {
                Ok(Ok(())) => {}
                // pandoc may exit before reading everything (e.g. bad option);
                // its exit status carries the real failure.
                Ok(Err(err)) if err.kind() == io::ErrorKind::BrokenPipe => {
                    debug!("pandoc closed stdin early");
                }
                Ok(Err(err)) => {
                    return Err(ConversionError::Input(format!(
                        "failed to write standard input: {err}"
                    )))
                }
                Err(_) => {
                    return Err(ConversionError::Input(
                        "standard input writer panicked".to_string(),
                    ))
                }
            }
        }

        debug!(status = ?output.status.code(), "pandoc finished");

        Ok(RunOutput {
            status_code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
