//! Formatting of generated sources through external tools.
//!
//! Generated code is piped through the language's canonical formatter
//! (`clang-format` for the C family, `rustfmt` for Rust). Formatting is
//! cosmetic, so [`format_source`] can fall back to the unformatted text
//! when the tool is missing or rejects the input.


use std::io::Write;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::error::FormatError;

/// Reformats source text.
pub trait SourceFormatter {
    fn format(&self, source: &str) -> Result<String, FormatError>;
}

/// Formatter backed by a program that reads stdin and writes stdout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternalFormatter {
    program: String,
    args: Vec<String>,
}

impl ExternalFormatter {
    pub fn new(program: impl Into<String>) -> Self {
        ExternalFormatter {
            program: program.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// `clang-format` with optional style selection.
    pub fn clang_format(style: Option<&str>, fallback_style: Option<&str>, sort_includes: bool) -> Self {
        let mut formatter = ExternalFormatter::new("clang-format");
        if let Some(style) = style {
            formatter = formatter.arg(format!("--style={style}"));
        }
        if let Some(fallback) = fallback_style {
            formatter = formatter.arg(format!("--fallback-style={fallback}"));
        }
        if sort_includes {
            formatter = formatter.arg("--sort-includes");
        }
        formatter
    }

    pub fn rustfmt() -> Self {
        ExternalFormatter::new("rustfmt").arg("--emit=stdout").arg("--quiet")
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Build the command that runs the formatter.
    #[must_use]
    pub fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    /// Check whether the program can be started.
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok()
    }

    fn spawn_error(&self, source: std::io::Error) -> FormatError {
        FormatError::Spawn {
            program: self.program.clone(),
            source,
        }
    }
}

impl SourceFormatter for ExternalFormatter {
    fn format(&self, source: &str) -> Result<String, FormatError> {
        let mut child = self.build_command().spawn().map_err(|e| self.spawn_error(e))?;

        // stdin is fed from its own thread; the tool may fill stdout first.
        let stdin = child.stdin.take();
        let input = source.to_owned();
        let writer = std::thread::spawn(move || match stdin {
            Some(mut stdin) => stdin.write_all(input.as_bytes()),
            None => Ok(()),
        });

        let output = child.wait_with_output().map_err(|e| self.spawn_error(e))?;
        let written = writer
            .join()
            .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked")));

        if !output.status.success() {
            return Err(FormatError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        written.map_err(|e| self.spawn_error(e))?;
        String::from_utf8(output.stdout).map_err(|_| FormatError::Encoding {
            program: self.program.clone(),
        })
    }
}

/// Default formatter for a language name (case-insensitive).
pub fn formatter_for(language: &str) -> Option<ExternalFormatter> {
    match language.to_ascii_lowercase().as_str() {
        "c" | "cpp" | "c++" | "cxx" | "cuda" => Some(ExternalFormatter::clang_format(None, None, false)),
        "rust" | "rs" => Some(ExternalFormatter::rustfmt()),
        _ => None,
    }
}

/// Format `source` written in `language`.
///
/// With `skip_errors`, any failure (unknown language, missing tool, tool
/// error) returns `source` unchanged.
pub fn format_source(language: &str, source: &str, skip_errors: bool) -> Result<String, FormatError> {
    let result = formatter_for(language)
        .ok_or_else(|| FormatError::UnknownLanguage {
            language: language.to_owned(),
        })
        .and_then(|formatter| format_with(&formatter, source));
    match result {
        Ok(formatted) => Ok(formatted),
        Err(error) if skip_errors => {
            warn!(language, %error, "formatting skipped");
            Ok(source.to_owned())
        }
        Err(error) => Err(error),
    }
}

/// Format `source` with an explicit formatter.
pub fn format_with(formatter: &dyn SourceFormatter, source: &str) -> Result<String, FormatError> {
    let formatted = formatter.format(source)?;
    debug!(input = source.len(), output = formatted.len(), "source formatted");
    Ok(formatted)
}
