//! Help text generation from registered command metadata.

use super::options::{OptionDefinition, OptionsSchema};
use super::types::{CommandDefinition, CommandMetadata};

const GLOBAL_OPTIONS: &str = "Global Options:
  -h, --help      Show help
  -v, --version   Show version
  --debug         Enable debug output
  -q, --quiet     Suppress non-essential output
  --no-color      Disable colored output
";

/// Renders general and per-command help for one application.
#[derive(Debug, Clone, Copy)]
pub struct HelpFormatter<'a> {
    app_name: &'a str,
    version: &'a str,
}

impl<'a> HelpFormatter<'a> {
    pub fn new(app_name: &'a str, version: &'a str) -> Self {
        Self { app_name, version }
    }

    /// Overview of the application and its visible commands, in the order given.
    pub fn format_general_help(
        &self,
        description: Option<&str>,
        commands: &[&CommandMetadata],
    ) -> String {
        let mut help = String::new();
        help.push_str(&format!("{} v{}\n", self.app_name, self.version));
        if let Some(description) = description.filter(|d| !d.is_empty()) {
            help.push_str(&format!("\n{}\n", description));
        }
        help.push_str(&format!("\nUsage: {} <command> [options]\n", self.app_name));

        let visible: Vec<&CommandMetadata> =
            commands.iter().copied().filter(|meta| !meta.hidden).collect();
        if !visible.is_empty() {
            help.push_str("\nCommands:\n");
            let width = visible.iter().map(|meta| meta.name.len()).max().unwrap_or(0);
            for meta in &visible {
                help.push_str(&listing_line(meta, width));
            }
        }

        help.push('\n');
        help.push_str(GLOBAL_OPTIONS);

        help.push_str("\nExamples:\n");
        help.push_str(&format!("  {} <command> --help\n", self.app_name));
        help.push_str(&format!("  {} help <command>\n", self.app_name));
        help
    }

    /// Help for one command; `path` is the full path it was reached by.
    pub fn format_command_help(&self, command: &CommandDefinition, path: &[String]) -> String {
        let meta = &command.metadata;
        let mut help = String::new();

        if meta.description.is_empty() {
            help.push_str(&format!("{}\n", meta.name));
        } else {
            help.push_str(&format!("{} - {}\n", meta.name, meta.description));
        }
        if meta.deprecated {
            help.push_str("\nWARNING: This command is deprecated and may be removed in a future version.\n");
        }

        help.push_str(&format!("\nUsage: {}\n", self.usage_line(command, path)));

        if !meta.aliases.is_empty() {
            help.push_str(&format!("\nAliases: {}\n", meta.aliases.join(", ")));
        }

        if let Some(schema) = command.options.as_ref().filter(|s| !s.is_empty()) {
            help.push_str("\nOptions:\n");
            help.push_str(&format_options(schema));
        }

        let subcommands: Vec<&CommandMetadata> = command
            .subcommands()
            .iter()
            .map(|sub| &sub.metadata)
            .filter(|sub| !sub.hidden)
            .collect();
        if !subcommands.is_empty() {
            help.push_str("\nSubcommands:\n");
            let width = subcommands.iter().map(|sub| sub.name.len()).max().unwrap_or(0);
            for sub in &subcommands {
                help.push_str(&listing_line(sub, width));
            }
        }

        if !meta.examples.is_empty() {
            help.push_str("\nExamples:\n");
            for example in &meta.examples {
                help.push_str(&format!("  # {}\n  {}\n", example.description, example.command));
            }
        }
        help
    }

    fn usage_line(&self, command: &CommandDefinition, path: &[String]) -> String {
        if let Some(usage) = &command.metadata.usage {
            return usage.clone();
        }
        let mut line = String::from(self.app_name);
        if path.is_empty() {
            line.push(' ');
            line.push_str(&command.metadata.name);
        }
        for segment in path {
            line.push(' ');
            line.push_str(segment);
        }
        if command.subcommands().iter().any(|sub| !sub.metadata.hidden) {
            line.push_str(" [<subcommand>]");
        }
        if command.options.as_ref().is_some_and(|s| !s.is_empty()) {
            line.push_str(" [options]");
        }
        line.push_str(" [arguments]");
        line
    }
}

fn listing_line(meta: &CommandMetadata, width: usize) -> String {
    let mut line = format!("  {:<width$}  {}", meta.name, meta.description, width = width);
    if meta.deprecated {
        line.push_str(" (deprecated)");
    }
    line.push('\n');
    line
}

fn option_flags(name: &str, definition: &OptionDefinition) -> String {
    let mut flags = match definition.alias {
        Some(alias) => format!("-{}, --{}", alias, name),
        None => format!("    --{}", name),
    };
    if definition.kind.takes_value() {
        flags.push_str(&format!(" <{}>", definition.kind));
    }
    flags
}

fn format_options(schema: &OptionsSchema) -> String {
    let rows: Vec<(String, &OptionDefinition)> = schema
        .iter()
        .map(|(name, definition)| (option_flags(name, definition), definition))
        .collect();
    let width = rows.iter().map(|(flags, _)| flags.len()).max().unwrap_or(0);

    let mut out = String::new();
    for (flags, definition) in &rows {
        let mut line = format!("  {:<width$}  {}", flags, definition.description, width = width);
        if definition.required {
            line.push_str(" (required)");
        }
        if let Some(default) = &definition.default {
            line.push_str(&format!(" (default: {})", default));
        }
        out.push_str(line.trim_end());
        out.push('\n');
        if !definition.choices.is_empty() {
            let choices: Vec<String> = definition.choices.iter().map(ToString::to_string).collect();
            out.push_str(&format!(
                "  {:<width$}    Choices: {}\n",
                "",
                choices.join(", "),
                width = width
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::command::{CommandDefinition, OptionDefinition, OptionsSchema, executor};

    fn noop_leaf(meta: CommandMetadata) -> CommandDefinition {
        CommandDefinition::leaf(meta, executor(|_, _| Box::pin(async { Ok(()) })))
    }

    #[test]
    fn general_help_lists_visible_commands_aligned() {
        let deploy = CommandMetadata::new("deploy", "Deploy the app");
        let db = CommandMetadata::new("db", "Database operations");
        let secret = CommandMetadata::new("secret", "Hidden").hidden();
        let old = CommandMetadata::new("legacy", "Old entrypoint").deprecated();

        let help = HelpFormatter::new("myapp", "1.2.0").format_general_help(
            Some("Demo application"),
            &[&deploy, &db, &secret, &old],
        );

        assert!(help.starts_with("myapp v1.2.0\n\nDemo application\n"));
        assert!(help.contains("Usage: myapp <command> [options]"));
        assert!(help.contains("  deploy  Deploy the app\n"));
        assert!(help.contains("  db      Database operations\n"));
        assert!(help.contains("  legacy  Old entrypoint (deprecated)\n"));
        assert!(!help.contains("secret"));
        assert!(help.contains("--no-color"));
        assert!(help.find("deploy").unwrap() < help.find("  db ").unwrap());
    }

    #[test]
    fn command_help_renders_options_and_subcommands() {
        let schema = OptionsSchema::new()
            .option(
                "env",
                OptionDefinition::string()
                    .alias('e')
                    .describe("Target environment")
                    .required()
                    .choices(["dev", "staging", "production"]),
            )
            .option(
                "port",
                OptionDefinition::number().describe("Port").default_value(3000),
            )
            .option("force", OptionDefinition::boolean().describe("Skip checks"));
        let cmd = noop_leaf(
            CommandMetadata::new("deploy", "Deploy the app")
                .alias("d")
                .deprecated()
                .example("Deploy to production", "myapp deploy -e production"),
        )
        .with_options(schema)
        .subcommand(noop_leaf(CommandMetadata::new("status", "Show status")))
        .subcommand(noop_leaf(CommandMetadata::new("internal", "x").hidden()));

        let help = HelpFormatter::new("myapp", "1.0.0")
            .format_command_help(&cmd, &["deploy".to_string()]);

        assert!(help.starts_with("deploy - Deploy the app\n"));
        assert!(help.contains("deprecated"));
        assert!(help.contains("Usage: myapp deploy [<subcommand>] [options] [arguments]"));
        assert!(help.contains("Aliases: d"));
        assert!(help.contains("-e, --env <string>"));
        assert!(help.contains("Target environment (required)"));
        assert!(help.contains("Port (default: 3000)"));
        assert!(help.contains("Choices: dev, staging, production"));
        assert!(help.contains("    --force"));
        assert!(help.contains("  status  Show status"));
        assert!(!help.contains("internal"));
        assert!(help.trim_end().ends_with("myapp deploy -e production"));
    }

    #[test]
    fn usage_omits_inapplicable_segments() {
        let cmd = noop_leaf(CommandMetadata::new("ping", "Ping"));
        let help = HelpFormatter::new("app", "0.1.0").format_command_help(&cmd, &[]);
        assert!(help.contains("Usage: app ping [arguments]\n"));

        let custom = noop_leaf(CommandMetadata::new("ping", "Ping").usage("app ping <host>"));
        let help = HelpFormatter::new("app", "0.1.0").format_command_help(&custom, &[]);
        assert!(help.contains("Usage: app ping <host>\n"));
    }
}
