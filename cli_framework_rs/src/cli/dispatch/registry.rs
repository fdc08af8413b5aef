//! Command registry: canonical names plus a separate alias table.
//!
//! Primary names always win over aliases, so an alias can never shadow
//! another command. Re-registering a name replaces the definition in place
//! (listing order is kept) and drops the aliases the old definition owned.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::cli::command::CommandDefinition;

/// Outcome of walking a command path through the registry.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// The path was empty.
    Empty,
    /// `depth` is how many path segments named commands; the rest are positionals.
    Found {
        command: Arc<CommandDefinition>,
        depth: usize,
    },
    /// `segment` matched nothing at its level.
    NotFound { segment: String },
}

#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: Vec<Arc<CommandDefinition>>,
    by_name: HashMap<String, usize>,
    aliases: HashMap<String, String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, definition: CommandDefinition) -> Arc<CommandDefinition> {
        let definition = Arc::new(definition);
        let name = definition.name().to_string();

        match self.by_name.get(&name) {
            Some(&slot) => {
                warn!(command = %name, "command registered twice; last registration wins");
                self.aliases.retain(|_, target| *target != name);
                self.commands[slot] = Arc::clone(&definition);
            }
            None => {
                self.by_name.insert(name.clone(), self.commands.len());
                self.commands.push(Arc::clone(&definition));
            }
        }

        for alias in &definition.metadata.aliases {
            if *alias == name {
                continue;
            }
            if self.by_name.contains_key(alias) {
                warn!(command = %name, alias = %alias, "alias collides with a command name; ignored");
                continue;
            }
            if let Some(previous) = self.aliases.insert(alias.clone(), name.clone()) {
                if previous != name {
                    warn!(alias = %alias, from = %previous, to = %name, "alias reassigned");
                }
            }
        }

        debug!(command = %name, aliases = definition.metadata.aliases.len(), "registered command");
        definition
    }

    /// Top-level lookup by primary name, then alias.
    pub fn get(&self, token: &str) -> Option<&Arc<CommandDefinition>> {
        let slot = match self.by_name.get(token) {
            Some(slot) => Some(slot),
            None => self
                .aliases
                .get(token)
                .and_then(|target| self.by_name.get(target)),
        };
        slot.map(|&index| &self.commands[index])
    }

    pub fn contains(&self, token: &str) -> bool {
        self.get(token).is_some()
    }

    /// Registered commands in registration order, one entry per definition.
    pub fn commands(&self) -> impl Iterator<Item = &Arc<CommandDefinition>> {
        self.commands.iter()
    }

    /// Names of non-hidden top-level commands in registration order.
    pub fn visible_names(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter(|command| !command.metadata.hidden)
            .map(|command| command.name())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Walk `path`: top-level lookup, then exact name/alias matches among
    /// subcommands. A leaf stops the walk and leaves the remaining segments
    /// as arguments; a group requires every further segment to match.
    pub fn resolve(&self, path: &[String]) -> Resolution {
        let Some(first) = path.first() else {
            return Resolution::Empty;
        };
        let Some(mut current) = self.get(first).cloned() else {
            return Resolution::NotFound {
                segment: first.clone(),
            };
        };

        let mut depth = 1;
        for segment in &path[1..] {
            if !current.is_group() {
                break;
            }
            match current.find_subcommand(segment) {
                Some(child) => {
                    current = Arc::clone(child);
                    depth += 1;
                }
                None => {
                    return Resolution::NotFound {
                        segment: segment.clone(),
                    };
                }
            }
        }

        Resolution::Found {
            command: current,
            depth,
        }
    }
}
