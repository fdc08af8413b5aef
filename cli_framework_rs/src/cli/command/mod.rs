//! Command definitions and help text.
//!
//! - `options`: option kinds, values and the ordered [`OptionsSchema`]
//! - `types`: [`CommandMetadata`], [`CommandDefinition`] and executors
//! - `parsed`: [`ParsedArguments`] result type
//! - `global`: [`GlobalFlags`] shared by every command
//! - `base`: the [`Command`] / [`CommandGroup`] traits
//! - `help`: [`HelpFormatter`]

mod base;
mod global;
mod help;
pub mod options;
mod parsed;
mod types;

pub use base::{Command, CommandGroup, CommandInfo, NoOptions};
pub use global::{GlobalFlags, extract_global_flags};
pub use help::HelpFormatter;
pub use options::{
    Coercer, OptionDefinition, OptionType, OptionValue, OptionsSchema, Validator, Verdict,
};
pub use parsed::ParsedArguments;
pub use types::{CommandDefinition, CommandKind, CommandMetadata, Example, Executor, executor};
