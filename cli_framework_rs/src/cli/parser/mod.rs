//! Argument parser.
//!
//! Turns a flat argv into a [`ParsedArguments`](crate::cli::command::ParsedArguments):
//! the command path, an options map and positionals. With a schema attached
//! the parser also fills defaults, validates and coerces.
//!
//! # Module Structure
//!
//! - [`core`](self::core) - tokenizer entry point
//! - `values` - per-type value extraction for declared options
//! - `validate` - defaulting, validation and coercion
//! - [`helpers`] - token classification and command suggestions
//!
//! # Usage
//!
//! ```ignore
//! use cli_framework::cli::parser::parse_arguments;
//!
//! let args: Vec<String> = std::env::args().skip(1).collect();
//! let parsed = parse_arguments(&args, None)?;
//! println!("{:?} {:?}", parsed.command, parsed.options);
//! ```

pub mod core;
pub mod helpers;
mod validate;
mod values;

pub use self::core::parse_arguments;
pub use helpers::{MAX_SUGGESTIONS, suggest_similar_commands};
