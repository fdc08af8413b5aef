//! Command model, argument parser and dispatcher.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        User Input (argv)                        │
//! └─────────────────────────────────────────────────────────────────┘
//!                                  │
//!                                  ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Dispatcher (Cli)                        │
//! │  ┌─────────────────┐    ┌─────────────────────────────────┐     │
//! │  │ Global flags    │    │ Hooks                           │     │
//! │  │ --debug         │    │ preparse → postparse →          │     │
//! │  │ --quiet / -q    │    │ precommand → postcommand        │     │
//! │  │ --no-color      │    │ error                           │     │
//! │  └────────┬────────┘    └────────────────┬────────────────┘     │
//! │           └──────────────┬───────────────┘                      │
//! │                          ▼                                      │
//! │              ┌───────────────────────┐                          │
//! │              │  Parser + Registry    │                          │
//! │              │  path, options,       │                          │
//! │              │  positionals          │                          │
//! │              └───────────┬───────────┘                          │
//! └──────────────────────────┼──────────────────────────────────────┘
//!                            │
//!                            ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   Command executors / help text                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Module Structure
//!
//! - [`command`] - Command definitions, option schemas, help rendering
//! - [`parser`] - argv tokenizer, schema coercion and validation
//! - [`dispatch`] - Registry, hooks, plugins and the [`Cli`] runner

pub mod command;
pub mod dispatch;
pub mod parser;

pub use command::{
    Command, CommandDefinition, CommandGroup, CommandInfo, CommandKind, CommandMetadata, Example,
    Executor, GlobalFlags, HelpFormatter, NoOptions, OptionDefinition, OptionType, OptionValue,
    OptionsSchema, ParsedArguments, Verdict, executor, extract_global_flags,
};

pub use parser::{parse_arguments, suggest_similar_commands};

pub use dispatch::{
    Cli, CommandRegistry, DispatchOutcome, Hook, HookContext, HookEvent, Plugin, PluginInfo, hook,
};
