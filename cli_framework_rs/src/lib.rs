//! # cli-framework
//!
//! **Toolkit for command-line applications** - nested subcommands, typed
//! option schemas, lifecycle hooks and generated help in one dispatcher.
//!
//! ## Features
//!
//! - **Subcommand trees** - groups, aliases, hidden and deprecated commands
//! - **Typed options** - string, number, boolean, array and count options with
//!   defaults, choices, validators and coercers
//! - **Lifecycle hooks** - preparse, postparse, precommand, postcommand, error
//! - **Structured errors** - one reporting boundary, stable exit codes
//! - **Suggestions** - "Did you mean" for mistyped commands
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cli_framework::{Cli, CliConfig, CommandDefinition, CommandMetadata, executor};
//!
//! # async fn demo() {
//! let mut cli = Cli::new(CliConfig::new("app", "1.0.0"));
//! cli.register(CommandDefinition::leaf(
//!     CommandMetadata::new("hello", "Say hello"),
//!     executor(|_args, ctx| Box::pin(async move {
//!         ctx.log("Hello!")?;
//!         Ok(())
//!     })),
//! ));
//! let code = cli.run(std::env::args().skip(1)).await;
//! std::process::exit(code);
//! # }
//! ```

// ============================================================================
// Core Modules
// ============================================================================

/// Command model, argument parser and dispatcher.
///
/// - [`cli::command`] - definitions, schemas, help
/// - [`cli::parser`] - argv parsing and validation
/// - [`cli::dispatch`] - registry, hooks, plugins, [`Cli`]
pub mod cli;

/// Error taxonomy and the single reporting boundary.
pub mod error;

/// Per-invocation execution context (streams, cwd, env, toggles).
pub mod context;

/// Output helpers on [`CommandContext`]: status lines, tables, lists, boxes.
pub mod output;

// ============================================================================
// Ambient Modules
// ============================================================================

/// Application configuration, optionally loaded from TOML.
pub mod config;

/// `tracing` subscriber setup.
pub mod logging;

pub mod colors;

/// Spinner for long-running work.
pub mod progress;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use cli::{
    Cli, Command, CommandDefinition, CommandGroup, CommandInfo, CommandMetadata, DispatchOutcome,
    HookContext, HookEvent, NoOptions, OptionDefinition, OptionType, OptionValue, OptionsSchema,
    ParsedArguments, Plugin, Verdict, executor, hook, parse_arguments,
};

pub use config::CliConfig;

pub use context::{CommandContext, ContextOverrides, Stream};

pub use error::{CliError, CliResult, ErrorKind, ValidationIssue, report_error};

pub use logging::init_logging;
