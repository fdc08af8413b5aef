use std::any::Any;
use std::panic;
use std::path::Path;

use anyhow::anyhow;
use futures::future::BoxFuture;
use serde::Deserialize;

use cli_framework::cli::{CommandGroup, CommandInfo, Example, extract_global_flags};
use cli_framework::{
    Cli, CliConfig, CliError, CliResult, Command, CommandContext, CommandDefinition,
    CommandMetadata, HookEvent, OptionDefinition, OptionsSchema, ParsedArguments, Plugin, Verdict,
    executor, hook, init_logging,
};

fn install_broken_pipe_handler() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let payload = info.payload();
        let is_broken = <dyn Any>::downcast_ref::<&str>(payload)
            .is_some_and(|s| s.contains("Broken pipe"))
            || <dyn Any>::downcast_ref::<String>(payload)
                .is_some_and(|s| s.contains("Broken pipe"));

        if is_broken {
            // Quietly exit when downstream closes the pipe (e.g. piping to `head`).
            std::process::exit(0);
        }

        default_hook(info);
    }));
}

// ============================================================================
// greet (typed options through the Command trait)
// ============================================================================

struct Greet;

#[derive(Deserialize)]
struct GreetOptions {
    name: String,
    #[serde(default)]
    shout: bool,
}

impl CommandInfo for Greet {
    fn name(&self) -> &str {
        "greet"
    }

    fn description(&self) -> &str {
        "Greet someone"
    }

    fn aliases(&self) -> Vec<String> {
        vec!["hi".into()]
    }

    fn options(&self) -> Option<OptionsSchema> {
        Some(
            OptionsSchema::new()
                .option(
                    "name",
                    OptionDefinition::string()
                        .alias('n')
                        .describe("Who to greet")
                        .default_value("world"),
                )
                .option(
                    "shout",
                    OptionDefinition::boolean().alias('s').describe("Greet loudly"),
                ),
        )
    }

    fn examples(&self) -> Vec<Example> {
        vec![Example {
            description: "Greet Alice loudly".into(),
            command: "clifw-demo greet Alice --shout".into(),
        }]
    }
}

impl Command for Greet {
    type Options = GreetOptions;

    fn execute<'a>(
        &'a self,
        options: GreetOptions,
        args: &'a ParsedArguments,
        ctx: &'a mut CommandContext,
    ) -> BoxFuture<'a, CliResult<()>> {
        Box::pin(async move {
            let name = args.positional(0).unwrap_or(options.name.as_str());
            let greeting = format!("Hello, {}!", name);
            if options.shout {
                ctx.log(&greeting.to_uppercase())?;
            } else {
                ctx.log(&greeting)?;
            }
            Ok(())
        })
    }
}

// ============================================================================
// deploy (schema features: required, choices, validator, array)
// ============================================================================

fn deploy() -> CommandDefinition {
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
            "force",
            OptionDefinition::boolean().alias('f').describe("Skip safety checks"),
        )
        .option(
            "replicas",
            OptionDefinition::number()
                .describe("Number of replicas")
                .default_value(1)
                .validate(|value| match value.as_f64() {
                    Some(n) if n >= 1.0 && n.fract() == 0.0 => Verdict::Valid,
                    _ => Verdict::from("Option --replicas must be a positive integer"),
                }),
        )
        .option(
            "tags",
            OptionDefinition::array().alias('t').describe("Release tags"),
        );

    let metadata = CommandMetadata::new("deploy", "Deploy the application")
        .alias("d")
        .example("Deploy to staging", "clifw-demo deploy --env staging")
        .example("Tag a release", "clifw-demo deploy -e production --tags v1 stable");

    CommandDefinition::leaf(
        metadata,
        executor(|args, ctx| {
            Box::pin(async move {
                let env = args.string("env").unwrap_or("dev");
                let replicas = args.number("replicas").unwrap_or(1.0) as u64;
                if args.flag("force") {
                    ctx.warn("Force deploy: skipping safety checks")?;
                }

                let mut spinner = ctx.spinner();
                spinner.start(&format!("Deploying to {}", env));
                ctx.info(&format!("Replicas: {}", replicas))?;
                if !args.array("tags").is_empty() {
                    spinner.update("Tagging release");
                    ctx.log(&format!("Tags: {}", args.array("tags").join(", ")))?;
                }
                spinner.succeed(Some(&format!("Deployed to {} ({} replicas)", env, replicas)));
                Ok(())
            })
        }),
    )
    .with_options(schema)
}

// ============================================================================
// db (group through the CommandGroup trait)
// ============================================================================

struct Db;

impl CommandInfo for Db {
    fn name(&self) -> &str {
        "db"
    }

    fn description(&self) -> &str {
        "Database operations"
    }
}

impl CommandGroup for Db {
    fn subcommands(&self) -> Vec<CommandDefinition> {
        let migrate = CommandDefinition::leaf(
            CommandMetadata::new("migrate", "Run pending migrations").alias("m"),
            executor(|args, ctx| {
                Box::pin(async move {
                    let steps = args.number("steps").unwrap_or(1.0) as u64;
                    if args.flag("dry-run") {
                        ctx.log(&format!("Dry run: {} migration(s) pending", steps))?;
                    } else {
                        ctx.success(&format!("Applied {} migration(s)", steps))?;
                    }
                    Ok(())
                })
            }),
        )
        .with_options(
            OptionsSchema::new()
                .option(
                    "steps",
                    OptionDefinition::number()
                        .describe("How many migrations to apply")
                        .default_value(1),
                )
                .option(
                    "dry-run",
                    OptionDefinition::boolean().describe("Print the plan only"),
                ),
        );

        let seed = CommandDefinition::leaf(
            CommandMetadata::new("seed", "Load fixture data"),
            executor(|args, ctx| {
                Box::pin(async move {
                    let file = args.positional(0).unwrap_or("fixtures.sql");
                    ctx.log(&format!("Seeding database from {}", file))?;
                    Ok(())
                })
            }),
        );

        vec![migrate, seed]
    }
}

// ============================================================================
// Smaller commands
// ============================================================================

fn calc() -> CommandDefinition {
    CommandDefinition::leaf(
        CommandMetadata::new("calc", "Echo a number with a verbosity level"),
        executor(|args, ctx| {
            Box::pin(async move {
                let number = args
                    .get("number")
                    .map(ToString::to_string)
                    .unwrap_or_default();
                ctx.log(&format!(
                    "Number: {}, Verbosity: {}",
                    number,
                    args.count("verbose")
                ))?;
                Ok(())
            })
        }),
    )
    .with_options(
        OptionsSchema::new()
            .option("number", OptionDefinition::number().alias('n').required())
            .option("verbose", OptionDefinition::count().alias('v')),
    )
}

fn auth() -> CommandDefinition {
    CommandDefinition::leaf(
        CommandMetadata::new("auth", "Check an access token"),
        executor(|args, ctx| {
            Box::pin(async move {
                match args.string("token") {
                    Some("letmein") => {
                        ctx.success("Authenticated")?;
                        Ok(())
                    }
                    _ => Err(CliError::command("Invalid token")
                        .with_code("AUTH_FAILED")
                        .with_exit_code(2)),
                }
            })
        }),
    )
    .with_options(OptionsSchema::new().option(
        "token",
        OptionDefinition::string().describe("Access token"),
    ))
}

fn report() -> CommandDefinition {
    CommandDefinition::leaf(
        CommandMetadata::new("report", "Show service status"),
        executor(|_args, ctx| {
            Box::pin(async move {
                let rows = vec![
                    vec!["api".to_string(), "running".to_string()],
                    vec!["worker".to_string(), "stopped".to_string()],
                ];
                ctx.table(&["Service", "Status"], &rows)?;
                Ok(())
            })
        }),
    )
}

fn confirm() -> CommandDefinition {
    CommandDefinition::leaf(
        CommandMetadata::new("confirm", "Ask for confirmation on stdin"),
        executor(|_args, ctx| {
            Box::pin(async move {
                let answer = ctx.stdin().read_line()?.unwrap_or_default();
                if answer.trim().eq_ignore_ascii_case("y") {
                    ctx.log("Confirmed")?;
                } else {
                    ctx.log("Aborted")?;
                }
                Ok(())
            })
        }),
    )
}

fn fail() -> CommandDefinition {
    CommandDefinition::leaf(
        CommandMetadata::new("fail", "Always fails"),
        executor(|_args, _ctx| {
            Box::pin(async move { Err(CliError::from(anyhow!("database connection refused"))) })
        }),
    )
}

fn secret() -> CommandDefinition {
    CommandDefinition::leaf(
        CommandMetadata::new("secret", "Hidden command").hidden(),
        executor(|_args, ctx| {
            Box::pin(async move {
                ctx.log("You found the secret command")?;
                Ok(())
            })
        }),
    )
}

fn explode(reason: &str) -> CliResult<()> {
    panic!("{}", reason)
}

fn crash() -> CommandDefinition {
    CommandDefinition::leaf(
        CommandMetadata::new("crash", "Panics on purpose").hidden(),
        executor(|args, _ctx| Box::pin(async move { explode(args.positional(0).unwrap_or("boom")) })),
    )
}

fn legacy() -> CommandDefinition {
    CommandDefinition::leaf(
        CommandMetadata::new("legacy", "Old entry point").deprecated(),
        executor(|_args, ctx| {
            Box::pin(async move {
                ctx.warn("legacy is deprecated; use greet")?;
                ctx.log("Hello from legacy")?;
                Ok(())
            })
        }),
    )
}

// ============================================================================
// Audit plugin (debug-only trace lines from hooks)
// ============================================================================

struct AuditPlugin;

impl Plugin for AuditPlugin {
    fn name(&self) -> &str {
        "audit"
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn register(&self, cli: &mut Cli) -> CliResult<()> {
        cli.add_hook(
            HookEvent::PreCommand,
            hook(|hctx| {
                Box::pin(async move {
                    let command = hctx.command.clone().unwrap_or_default();
                    hctx.context.debug(&format!("audit: running {}", command))?;
                    Ok(())
                })
            }),
        );
        cli.add_hook(
            HookEvent::PostCommand,
            hook(|hctx| {
                Box::pin(async move {
                    let command = hctx.command.clone().unwrap_or_default();
                    hctx.context.debug(&format!("audit: finished {}", command))?;
                    Ok(())
                })
            }),
        );
        cli.add_hook(
            HookEvent::Error,
            hook(|hctx| {
                Box::pin(async move {
                    if let Some(report) = &hctx.error {
                        let line = format!("audit: failed with {:?}", report.kind);
                        hctx.context.debug(&line)?;
                    }
                    Ok(())
                })
            }),
        );
        Ok(())
    }
}

fn load_config() -> CliConfig {
    match std::env::var_os("CLIFW_CONFIG") {
        Some(path) => CliConfig::load_from_path(Path::new(&path)),
        None => CliConfig::new("clifw-demo", env!("CARGO_PKG_VERSION"))
            .with_description("Demo application for cli-framework"),
    }
}

fn build_cli(config: CliConfig) -> CliResult<Cli> {
    let mut cli = Cli::new(config);
    cli.register_command(Greet);
    cli.register(deploy());
    cli.register_group(Db);
    cli.register(calc());
    cli.register(auth());
    cli.register(report());
    cli.register(confirm());
    cli.register(fail());
    cli.register(secret());
    cli.register(crash());
    cli.register(legacy());
    cli.use_plugin(&AuditPlugin)?;
    Ok(cli)
}

#[tokio::main]
async fn main() {
    install_broken_pipe_handler();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = load_config();
    let (flags, _) = extract_global_flags(&args);
    init_logging(&config, flags.debug);

    let cli = match build_cli(config) {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    };
    cli.run_and_exit(args).await;
}
