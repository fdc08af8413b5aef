//! Command registry and dispatcher.
//!
//! [`Cli`] owns the command table and the hook table and drives one
//! invocation through a fixed pipeline:
//!
//! ```text
//! argv ─▶ global flags ─▶ preparse ─▶ parse ─▶ postparse
//!                                                 │
//!            ┌────────────────────────────────────┘
//!            ▼
//!   --help / --version / help / version ─▶ help or version text
//!            │
//!            ▼
//!   resolve path ─▶ (schema re-parse) ─▶ precommand ─▶ executor ─▶ postcommand
//!            │
//!            └─ any failure ─▶ error hooks ─▶ report_error ─▶ exit code
//! ```
//!
//! Every failure, panics included, meets the same boundary in [`Cli::run`].
//! Caught panics are not echoed by the process panic hook.

mod hooks;
mod panics;
mod plugin;
mod registry;

use std::io::Write;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::debug;

pub use hooks::{Hook, HookContext, HookEvent, HookTable, hook};
pub use plugin::{Plugin, PluginInfo};
pub use registry::{CommandRegistry, Resolution};

use panics::silenced;

use super::command::{
    Command, CommandDefinition, CommandGroup, CommandMetadata, HelpFormatter, OptionValue,
    ParsedArguments, extract_global_flags,
};
use super::parser::{parse_arguments, suggest_similar_commands};
use crate::config::CliConfig;
use crate::context::{CommandContext, ContextOverrides};
use crate::error::{CliError, CliResult, report_error};

/// How a successful dispatch ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    HelpShown,
    VersionShown,
    /// Space-joined path of the command that ran.
    Executed { command: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Builtin {
    Help,
    Version,
}

fn builtin(token: &str) -> Option<Builtin> {
    match token {
        "help" | "h" => Some(Builtin::Help),
        "version" | "v" => Some(Builtin::Version),
        _ => None,
    }
}

const BUILTIN_NAMES: [&str; 2] = ["help", "version"];

#[derive(Debug)]
pub struct Cli {
    config: CliConfig,
    registry: CommandRegistry,
    hooks: HookTable,
    overrides: ContextOverrides,
    plugins: Vec<PluginInfo>,
}

impl Cli {
    pub fn new(config: CliConfig) -> Self {
        Self {
            config,
            registry: CommandRegistry::new(),
            hooks: HookTable::default(),
            overrides: ContextOverrides::default(),
            plugins: Vec::new(),
        }
    }

    /// Replace process defaults (streams, cwd, env, toggles) for every run.
    pub fn with_context(mut self, overrides: ContextOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Construction-time hooks; call before any `add_hook` so they run first.
    pub fn with_hooks<I>(mut self, event: HookEvent, hooks: I) -> Self
    where
        I: IntoIterator<Item = Hook>,
    {
        for hook in hooks {
            self.hooks.add(event, hook);
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn version(&self) -> &str {
        &self.config.version
    }

    pub fn config(&self) -> &CliConfig {
        &self.config
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    // ========================================================================
    // Registration
    // ========================================================================

    pub fn register(&mut self, definition: CommandDefinition) -> Arc<CommandDefinition> {
        if self.config.builtin_commands && builtin(definition.name()).is_some() {
            tracing::warn!(
                command = definition.name(),
                "command name is shadowed by a built-in command"
            );
        }
        self.registry.register(definition)
    }

    pub fn register_command<C: Command>(&mut self, command: C) -> Arc<CommandDefinition> {
        self.register(command.into_definition())
    }

    pub fn register_group<G: CommandGroup>(&mut self, group: G) -> Arc<CommandDefinition> {
        self.register(group.into_definition())
    }

    pub fn add_hook(&mut self, event: HookEvent, hook: Hook) {
        self.hooks.add(event, hook);
    }

    pub fn hook_count(&self, event: HookEvent) -> usize {
        self.hooks.count(event)
    }

    pub fn use_plugin<P: Plugin + ?Sized>(&mut self, plugin: &P) -> CliResult<()> {
        plugin.register(self)?;
        debug!(plugin = plugin.name(), version = plugin.version(), "plugin registered");
        self.plugins.push(PluginInfo {
            name: plugin.name().to_string(),
            version: plugin.version().to_string(),
        });
        Ok(())
    }

    pub fn plugins(&self) -> &[PluginInfo] {
        &self.plugins
    }

    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugins.iter().any(|plugin| plugin.name == name)
    }

    // ========================================================================
    // Lookup and help
    // ========================================================================

    /// Resolve a registered command path (built-ins excluded).
    pub fn resolve(&self, path: &[String]) -> CliResult<Arc<CommandDefinition>> {
        match self.registry.resolve(path) {
            Resolution::Found { command, .. } => Ok(command),
            Resolution::NotFound { segment } => {
                let suggestions = self.suggestions(&segment);
                Err(CliError::not_found(segment, suggestions))
            }
            Resolution::Empty => Err(CliError::not_found("", Vec::new())),
        }
    }

    /// Up to three visible top-level names close to `token`.
    pub fn suggestions(&self, token: &str) -> Vec<String> {
        let mut pool = self.registry.visible_names();
        if self.config.builtin_commands {
            pool.extend(BUILTIN_NAMES.iter().copied().filter(|name| !self.registry.contains(name)));
        }
        suggest_similar_commands(token, &pool)
    }

    fn formatter(&self) -> HelpFormatter<'_> {
        HelpFormatter::new(&self.config.name, &self.config.version)
    }

    fn builtin_definition(&self, which: Builtin) -> CommandDefinition {
        let metadata = match which {
            Builtin::Help => CommandMetadata::new("help", "Show help for a command")
                .alias("h")
                .usage(format!("{} help [command...]", self.config.name)),
            Builtin::Version => CommandMetadata::new("version", "Show version information")
                .alias("v")
                .usage(format!("{} version", self.config.name)),
        };
        CommandDefinition::group(metadata, Vec::new())
    }

    pub fn general_help(&self) -> String {
        let builtins: Vec<CommandMetadata> = if self.config.builtin_commands {
            vec![
                self.builtin_definition(Builtin::Help).metadata,
                self.builtin_definition(Builtin::Version).metadata,
            ]
        } else {
            Vec::new()
        };
        let listing: Vec<&CommandMetadata> = self
            .registry
            .commands()
            .map(|command| &command.metadata)
            .chain(builtins.iter())
            .collect();
        self.formatter()
            .format_general_help(self.config.description.as_deref(), &listing)
    }

    /// Help for the command at `path`; general help when `path` is empty.
    pub fn command_help(&self, path: &[String]) -> CliResult<String> {
        let Some(first) = path.first() else {
            return Ok(self.general_help());
        };
        if self.config.builtin_commands {
            if let Some(which) = builtin(first) {
                let definition = self.builtin_definition(which);
                return Ok(self.formatter().format_command_help(&definition, &path[..1]));
            }
        }
        match self.registry.resolve(path) {
            Resolution::Found { command, depth } => {
                Ok(self.formatter().format_command_help(&command, &path[..depth]))
            }
            Resolution::NotFound { segment } => {
                let suggestions = self.suggestions(&segment);
                Err(CliError::not_found(segment, suggestions))
            }
            Resolution::Empty => Ok(self.general_help()),
        }
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Dispatch `args` and report any failure to stderr; returns the exit code.
    pub async fn run<I, S>(&self, args: I) -> i32
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (result, hctx) = self.pipeline(args.into_iter().map(Into::into).collect()).await;
        match result {
            Ok(outcome) => {
                debug!(?outcome, "dispatch finished");
                0
            }
            Err(err) => {
                debug!(kind = ?err.kind(), exit_code = err.exit_code(), "dispatch failed");
                report_error(&err, &hctx.context)
            }
        }
    }

    /// [`Cli::run`], then terminate the process with its exit code.
    pub async fn run_and_exit<I, S>(&self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let code = self.run(args).await;
        std::process::exit(code);
    }

    /// Dispatch `args` without writing the error report; `error` hooks still run.
    pub async fn try_run<I, S>(&self, args: I) -> CliResult<DispatchOutcome>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pipeline(args.into_iter().map(Into::into).collect())
            .await
            .0
    }

    async fn pipeline(&self, args: Vec<String>) -> (CliResult<DispatchOutcome>, HookContext) {
        let (flags, argv) = extract_global_flags(&args);
        let mut context = CommandContext::with_overrides(&self.overrides);
        context.apply_flags(&flags);
        debug!(?flags, args = argv.len(), "starting dispatch");

        let mut hctx = HookContext::new(ParsedArguments::new(argv.clone()), context);
        let result = AssertUnwindSafe(silenced(self.dispatch(&argv, &mut hctx)))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(CliError::from_panic(payload)));

        if let Err(err) = &result {
            hctx.error = Some(err.report());
            let _ = silenced(self.hooks.fire(HookEvent::Error, &mut hctx, true)).await;
        }
        (result, hctx)
    }

    async fn fire(&self, event: HookEvent, hctx: &mut HookContext) -> CliResult<()> {
        self.hooks
            .fire(event, hctx, self.config.continue_on_hook_error)
            .await
    }

    async fn dispatch(&self, argv: &[String], hctx: &mut HookContext) -> CliResult<DispatchOutcome> {
        self.fire(HookEvent::PreParse, hctx).await?;
        hctx.args = parse_arguments(argv, None)?;
        hctx.command = hctx.args.command.first().cloned();
        self.fire(HookEvent::PostParse, hctx).await?;

        if let Some(target) = self.help_request(&hctx.args) {
            return self.show_help(&target, &hctx.context);
        }
        if hctx.args.command.is_empty() && (hctx.args.has("version") || hctx.args.has("v")) {
            return self.show_version(&hctx.context);
        }

        let path = hctx.args.command.clone();
        if self.config.builtin_commands {
            match path.first().and_then(|token| builtin(token)) {
                Some(Builtin::Help) => {
                    let target = if path.len() > 1 {
                        path[1..].to_vec()
                    } else {
                        hctx.args.positionals.clone()
                    };
                    return self.show_help(&target, &hctx.context);
                }
                Some(Builtin::Version) => return self.show_version(&hctx.context),
                None => {}
            }
        }

        match self.registry.resolve(&path) {
            Resolution::Empty => {
                debug!("no command given; showing general help");
                self.show_help(&[], &hctx.context)
            }
            Resolution::NotFound { segment } => {
                debug!(segment = %segment, "command not found");
                let suggestions = self.suggestions(&segment);
                Err(CliError::not_found(segment, suggestions))
            }
            Resolution::Found { command, depth } => {
                self.execute(command, depth, argv, hctx).await
            }
        }
    }

    async fn execute(
        &self,
        command: Arc<CommandDefinition>,
        depth: usize,
        argv: &[String],
        hctx: &mut HookContext,
    ) -> CliResult<DispatchOutcome> {
        let path: Vec<String> = hctx.args.command.iter().take(depth).cloned().collect();
        let name = path.join(" ");
        hctx.command = Some(name.clone());
        debug!(command = %name, "resolved command");

        if let Some(schema) = &command.options {
            hctx.args = parse_arguments(argv, Some(schema))?;
        }
        if hctx.args.command.len() > depth {
            let extra = hctx.args.command.split_off(depth);
            hctx.args.positionals.splice(0..0, extra);
        }

        self.fire(HookEvent::PreCommand, hctx).await?;

        let outcome = match command.executor() {
            Some(executor) => {
                debug!(command = %name, "executing command");
                executor(&hctx.args, &mut hctx.context).await?;
                debug!(command = %name, "command finished");
                DispatchOutcome::Executed { command: name }
            }
            None => {
                let text = self.formatter().format_command_help(&command, &path);
                write_stdout(&hctx.context, &text)?;
                DispatchOutcome::HelpShown
            }
        };

        self.fire(HookEvent::PostCommand, hctx).await?;
        Ok(outcome)
    }

    /// Target path when `--help` (anywhere) or `-h` asks for help.
    ///
    /// `-h` is left to the command when its schema claims the letter, and a
    /// string bound to `--help` names the command to describe.
    fn help_request(&self, args: &ParsedArguments) -> Option<Vec<String>> {
        let long = args.get("help");
        if long.is_none() && !args.has("h") {
            return None;
        }

        let mut target = args.command.clone();
        if let Some(OptionValue::String(name)) = long {
            target.push(name.clone());
        }
        if long.is_none() && self.claims_short_help(&target) {
            return None;
        }
        Some(target)
    }

    fn claims_short_help(&self, path: &[String]) -> bool {
        match self.registry.resolve(path) {
            Resolution::Found { command, .. } => command
                .options
                .as_ref()
                .is_some_and(|schema| schema.claims_short('h')),
            _ => false,
        }
    }

    fn show_help(&self, target: &[String], ctx: &CommandContext) -> CliResult<DispatchOutcome> {
        let text = self.command_help(target)?;
        write_stdout(ctx, &text)?;
        Ok(DispatchOutcome::HelpShown)
    }

    fn show_version(&self, ctx: &CommandContext) -> CliResult<DispatchOutcome> {
        write_stdout(ctx, &format!("{} {}\n", self.config.name, self.config.version))?;
        Ok(DispatchOutcome::VersionShown)
    }
}

fn write_stdout(ctx: &CommandContext, text: &str) -> CliResult<()> {
    let mut out = ctx.stdout();
    out.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
