//! Command definitions: metadata, executors and the leaf/group shape.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;

use super::options::OptionsSchema;
use super::parsed::ParsedArguments;
use crate::context::CommandContext;
use crate::error::CliResult;

/// A usage example shown in help output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    pub description: String,
    pub command: String,
}

/// Descriptive data for a command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandMetadata {
    pub name: String,
    pub description: String,
    pub aliases: Vec<String>,
    /// Hidden commands dispatch normally but never show in listings or suggestions.
    pub hidden: bool,
    pub deprecated: bool,
    /// Replaces the synthesized usage line.
    pub usage: Option<String>,
    pub examples: Vec<Example>,
}

impl CommandMetadata {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn example(mut self, description: impl Into<String>, command: impl Into<String>) -> Self {
        self.examples.push(Example {
            description: description.into(),
            command: command.into(),
        });
        self
    }

    /// Name or alias match.
    pub fn answers_to(&self, token: &str) -> bool {
        self.name == token || self.aliases.iter().any(|alias| alias == token)
    }
}

/// Async body of a command.
pub type Executor = Arc<
    dyn for<'a> Fn(&'a ParsedArguments, &'a mut CommandContext) -> BoxFuture<'a, CliResult<()>>
        + Send
        + Sync,
>;

/// Wrap a closure as an [`Executor`].
///
/// ```ignore
/// let exec = executor(|args, ctx| Box::pin(async move {
///     writeln!(ctx.stdout(), "{:?}", args.positionals)?;
///     Ok(())
/// }));
/// ```
pub fn executor<F>(body: F) -> Executor
where
    F: for<'a> Fn(&'a ParsedArguments, &'a mut CommandContext) -> BoxFuture<'a, CliResult<()>>
        + Send
        + Sync
        + 'static,
{
    Arc::new(body)
}

/// Leaf, pure group, or group that also runs when no subcommand is named.
#[derive(Clone)]
pub enum CommandKind {
    Leaf(Executor),
    Group(Vec<Arc<CommandDefinition>>),
    GroupWithDefault {
        subcommands: Vec<Arc<CommandDefinition>>,
        executor: Executor,
    },
}

/// A registrable command.
#[derive(Clone)]
pub struct CommandDefinition {
    pub metadata: CommandMetadata,
    pub options: Option<OptionsSchema>,
    pub kind: CommandKind,
}

impl CommandDefinition {
    pub fn leaf(metadata: CommandMetadata, executor: Executor) -> Self {
        Self {
            metadata,
            options: None,
            kind: CommandKind::Leaf(executor),
        }
    }

    pub fn group(metadata: CommandMetadata, subcommands: Vec<CommandDefinition>) -> Self {
        Self {
            metadata,
            options: None,
            kind: CommandKind::Group(subcommands.into_iter().map(Arc::new).collect()),
        }
    }

    pub fn with_options(mut self, schema: OptionsSchema) -> Self {
        self.options = Some(schema);
        self
    }

    /// Give a group its own action; on a leaf this replaces the executor.
    pub fn with_default_action(mut self, action: Executor) -> Self {
        self.kind = match self.kind {
            CommandKind::Leaf(_) => CommandKind::Leaf(action),
            CommandKind::Group(subcommands) | CommandKind::GroupWithDefault { subcommands, .. } => {
                CommandKind::GroupWithDefault {
                    subcommands,
                    executor: action,
                }
            }
        };
        self
    }

    /// Add a child; a leaf becomes a group that keeps its executor as default.
    pub fn subcommand(mut self, child: CommandDefinition) -> Self {
        let child = Arc::new(child);
        self.kind = match self.kind {
            CommandKind::Leaf(executor) => CommandKind::GroupWithDefault {
                subcommands: vec![child],
                executor,
            },
            CommandKind::Group(mut subcommands) => {
                subcommands.push(child);
                CommandKind::Group(subcommands)
            }
            CommandKind::GroupWithDefault {
                mut subcommands,
                executor,
            } => {
                subcommands.push(child);
                CommandKind::GroupWithDefault {
                    subcommands,
                    executor,
                }
            }
        };
        self
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn executor(&self) -> Option<&Executor> {
        match &self.kind {
            CommandKind::Leaf(executor) | CommandKind::GroupWithDefault { executor, .. } => {
                Some(executor)
            }
            CommandKind::Group(_) => None,
        }
    }

    pub fn subcommands(&self) -> &[Arc<CommandDefinition>] {
        match &self.kind {
            CommandKind::Leaf(_) => &[],
            CommandKind::Group(subcommands) | CommandKind::GroupWithDefault { subcommands, .. } => {
                subcommands
            }
        }
    }

    pub fn is_group(&self) -> bool {
        !self.subcommands().is_empty()
    }

    /// Exact name first, then alias, in declaration order.
    pub fn find_subcommand(&self, token: &str) -> Option<&Arc<CommandDefinition>> {
        let subcommands = self.subcommands();
        subcommands
            .iter()
            .find(|sub| sub.metadata.name == token)
            .or_else(|| subcommands.iter().find(|sub| sub.metadata.answers_to(token)))
    }
}

impl fmt::Debug for CommandDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match &self.kind {
            CommandKind::Leaf(_) => "leaf",
            CommandKind::Group(_) => "group",
            CommandKind::GroupWithDefault { .. } => "group+default",
        };
        f.debug_struct("CommandDefinition")
            .field("metadata", &self.metadata)
            .field("options", &self.options)
            .field("kind", &shape)
            .field(
                "subcommands",
                &self.subcommands().iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
