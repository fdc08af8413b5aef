//! Trait-based commands.
//!
//! Implement [`Command`] for a struct when a command wants typed options
//! and a home for its own state; [`CommandGroup`] for a namespace that only
//! routes to subcommands. Both project to a [`CommandDefinition`], which is
//! what the dispatcher actually registers.

use std::sync::Arc;

use futures::future::BoxFuture;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::options::OptionsSchema;
use super::parsed::ParsedArguments;
use super::types::{CommandDefinition, CommandKind, CommandMetadata, Example, executor};
use crate::context::CommandContext;
use crate::error::CliResult;

/// Options type for commands that take none (ignores whatever was parsed).
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct NoOptions {}

/// Descriptive half shared by [`Command`] and [`CommandGroup`].
pub trait CommandInfo {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn aliases(&self) -> Vec<String> {
        Vec::new()
    }

    fn hidden(&self) -> bool {
        false
    }

    fn deprecated(&self) -> bool {
        false
    }

    fn usage(&self) -> Option<String> {
        None
    }

    fn examples(&self) -> Vec<Example> {
        Vec::new()
    }

    fn options(&self) -> Option<OptionsSchema> {
        None
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: self.name().to_string(),
            description: self.description().to_string(),
            aliases: self.aliases(),
            hidden: self.hidden(),
            deprecated: self.deprecated(),
            usage: self.usage(),
            examples: self.examples(),
        }
    }
}

pub trait Command: CommandInfo + Send + Sync + 'static {
    /// Parsed options are deserialized into this before `execute` runs.
    type Options: DeserializeOwned + Send + 'static;

    fn subcommands(&self) -> Vec<CommandDefinition> {
        Vec::new()
    }

    fn execute<'a>(
        &'a self,
        options: Self::Options,
        args: &'a ParsedArguments,
        ctx: &'a mut CommandContext,
    ) -> BoxFuture<'a, CliResult<()>>;

    /// Project to a registrable definition (a group with default action when
    /// subcommands are declared).
    fn into_definition(self) -> CommandDefinition
    where
        Self: Sized,
    {
        let metadata = self.metadata();
        let options = self.options();
        let subcommands: Vec<_> = self.subcommands().into_iter().map(Arc::new).collect();

        let command = Arc::new(self);
        let action = executor(move |args, ctx| {
            let command = Arc::clone(&command);
            Box::pin(async move {
                let typed = args.deserialize_options::<Self::Options>()?;
                command.execute(typed, args, ctx).await
            })
        });

        let kind = if subcommands.is_empty() {
            CommandKind::Leaf(action)
        } else {
            CommandKind::GroupWithDefault {
                subcommands,
                executor: action,
            }
        };
        CommandDefinition {
            metadata,
            options,
            kind,
        }
    }
}

/// A namespace without an action of its own; dispatching it shows its help.
pub trait CommandGroup: CommandInfo {
    fn subcommands(&self) -> Vec<CommandDefinition>;

    fn into_definition(self) -> CommandDefinition
    where
        Self: Sized,
    {
        CommandDefinition {
            metadata: self.metadata(),
            options: self.options(),
            kind: CommandKind::Group(self.subcommands().into_iter().map(Arc::new).collect()),
        }
    }
}
