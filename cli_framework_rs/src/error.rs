//! Error taxonomy for command dispatch.
//!
//! Every failure raised while parsing, resolving or executing a command is a
//! [`CliError`]. The dispatcher funnels all of them through one boundary,
//! [`report_error`], which switches on [`ErrorKind`] to decide what reaches
//! stderr and which exit code the process ends with.

use std::any::Any;
use std::io::Write;

use thiserror::Error;

use crate::cli::command::OptionValue;
use crate::colors::Painter;
use crate::context::CommandContext;

/// Result alias used throughout the crate.
pub type CliResult<T> = Result<T, CliError>;

/// Explicit discriminant of a [`CliError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The command path did not resolve.
    CommandNotFound,
    /// One or more option-schema checks failed.
    Validation,
    /// Raised deliberately by an executor or hook, with its own exit code.
    Command,
    /// Any other error returned by an executor or hook.
    Failure,
    /// A panic caught at the dispatch boundary.
    Unknown,
}

/// A single option-schema violation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    /// Option name (without dashes).
    pub field: String,
    pub message: String,
    /// The offending value, if one was present.
    pub value: Option<OptionValue>,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value: None,
        }
    }

    pub fn with_value(mut self, value: Option<OptionValue>) -> Self {
        self.value = value;
        self
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Command \"{name}\" not found.{}", did_you_mean(.suggestions))]
    CommandNotFound {
        name: String,
        suggestions: Vec<String>,
    },

    #[error("Validation failed: {}", join_issues(.issues))]
    Validation { issues: Vec<ValidationIssue> },

    #[error("{message}")]
    Command {
        message: String,
        code: Option<String>,
        exit_code: i32,
    },

    #[error(transparent)]
    Failure(#[from] anyhow::Error),

    #[error("An unknown error occurred")]
    Unknown { detail: Option<String> },
}

fn did_you_mean(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" Did you mean: {}?", suggestions.join(", "))
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl CliError {
    /// A user-facing command error with exit code 1 and no code string.
    pub fn command(message: impl Into<String>) -> Self {
        CliError::Command {
            message: message.into(),
            code: None,
            exit_code: 1,
        }
    }

    pub fn not_found(name: impl Into<String>, suggestions: Vec<String>) -> Self {
        CliError::CommandNotFound {
            name: name.into(),
            suggestions,
        }
    }

    pub fn validation(issues: Vec<ValidationIssue>) -> Self {
        CliError::Validation { issues }
    }

    /// Attach a machine-readable code (e.g. `AUTH_FAILED`). No-op for other kinds.
    pub fn with_code(mut self, new_code: impl Into<String>) -> Self {
        if let CliError::Command { code, .. } = &mut self {
            *code = Some(new_code.into());
        }
        self
    }

    /// Override the exit code. No-op for other kinds.
    pub fn with_exit_code(mut self, new_exit_code: i32) -> Self {
        if let CliError::Command { exit_code, .. } = &mut self {
            *exit_code = new_exit_code;
        }
        self
    }

    /// Convert a caught panic payload.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned());
        CliError::Unknown { detail }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CliError::CommandNotFound { .. } => ErrorKind::CommandNotFound,
            CliError::Validation { .. } => ErrorKind::Validation,
            CliError::Command { .. } => ErrorKind::Command,
            CliError::Failure(_) => ErrorKind::Failure,
            CliError::Unknown { .. } => ErrorKind::Unknown,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Command { exit_code, .. } => *exit_code,
            CliError::CommandNotFound { .. }
            | CliError::Validation { .. }
            | CliError::Failure(_)
            | CliError::Unknown { .. } => 1,
        }
    }

    /// Validation issues, empty for every other kind.
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            CliError::Validation { issues } => issues,
            _ => &[],
        }
    }

    /// Suggested command names, empty for every other kind.
    pub fn suggestions(&self) -> &[String] {
        match self {
            CliError::CommandNotFound { suggestions, .. } => suggestions,
            _ => &[],
        }
    }

    /// Cloneable summary handed to `error` hooks.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            message: self.to_string(),
            exit_code: self.exit_code(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Failure(anyhow::Error::new(err))
    }
}

/// What an `error` hook sees of the failure being handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
    pub exit_code: i32,
}

/// Write the stderr rendering of `err` (unless quiet) and return its exit code.
pub fn report_error(err: &CliError, ctx: &CommandContext) -> i32 {
    let code = err.exit_code();
    if ctx.quiet {
        return code;
    }

    let painter = Painter::new(ctx.color);
    let label = painter.error("Error:");
    let mut text = match err {
        CliError::Command {
            message,
            code: Some(tag),
            ..
        } => format!("{} [{}] {}\n", label, tag, message),
        CliError::Unknown { .. } => format!("{}\n", painter.error(&err.to_string())),
        _ => format!("{} {}\n", label, err),
    };

    if ctx.debug {
        match err {
            CliError::Validation { issues } => {
                for issue in issues {
                    text.push_str(&format!("  - {}: {}\n", issue.field, issue.message));
                }
            }
            CliError::Failure(inner) => {
                text.push_str(&painter.dim(&format!("{:?}", inner)));
                text.push('\n');
            }
            CliError::Unknown {
                detail: Some(detail),
            } => {
                text.push_str(&painter.dim(detail));
                text.push('\n');
            }
            _ => {}
        }
    }

    let mut stderr = ctx.stderr();
    let _ = stderr.write_all(text.as_bytes());
    let _ = stderr.flush();
    code
}
