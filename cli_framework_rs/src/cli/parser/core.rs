//! Core tokenizer: splits argv into command path, options and positionals.

use tracing::trace;

use super::helpers::is_option_like;
use super::validate::{apply_defaults, validate_options};
use super::values::{extract_value, infer_value};
use crate::cli::command::{OptionValue, OptionsSchema, ParsedArguments};
use crate::error::CliResult;

/// Parse `args` into a [`ParsedArguments`], optionally checked against `schema`.
///
/// 1. Leading tokens not starting with `-` form the command path
/// 2. `--` turns every later token into a positional
/// 3. `--name[=value]` and `-abc` clusters are resolved through the schema,
///    falling back to schema-free inference for undeclared names
/// 4. With a schema, defaults are filled in and every option is validated;
///    all issues are returned together as one validation error
pub fn parse_arguments(args: &[String], schema: Option<&OptionsSchema>) -> CliResult<ParsedArguments> {
    let mut parsed = ParsedArguments::new(args.to_vec());

    let mut i = 0;
    while i < args.len() && !is_option_like(&args[i]) {
        parsed.command.push(args[i].clone());
        i += 1;
    }

    while i < args.len() {
        let arg = &args[i];
        i += 1;

        if arg == "--" {
            parsed.positionals.extend(args[i..].iter().cloned());
            break;
        }

        if let Some(body) = arg.strip_prefix("--") {
            let (name, inline) = match body.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (body, None),
            };
            i = match schema.and_then(|s| s.get(name)) {
                Some(definition) => {
                    extract_value(&mut parsed.options, name, definition, inline, args, i)
                }
                None => infer_value(&mut parsed.options, name, inline, args, i),
            };
            continue;
        }

        if arg.len() > 1 && arg.starts_with('-') {
            for flag in arg.chars().skip(1) {
                match schema.and_then(|s| s.by_alias(flag)) {
                    Some((name, definition)) => {
                        i = extract_value(&mut parsed.options, name, definition, None, args, i);
                    }
                    None => {
                        parsed
                            .options
                            .insert(flag.to_string(), OptionValue::Bool(true));
                    }
                }
            }
            continue;
        }

        parsed.positionals.push(arg.clone());
    }

    if let Some(schema) = schema {
        apply_defaults(&mut parsed.options, schema);
        validate_options(&mut parsed.options, schema)?;
    }

    trace!(
        command = ?parsed.command,
        options = parsed.options.len(),
        positionals = parsed.positionals.len(),
        "parsed arguments"
    );
    Ok(parsed)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::command::{OptionDefinition, OptionType};
    use crate::error::ErrorKind;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn deploy_schema() -> OptionsSchema {
        OptionsSchema::new()
            .option(
                "env",
                OptionDefinition::string()
                    .alias('e')
                    .required()
                    .choices(["dev", "staging", "production"]),
            )
            .option("force", OptionDefinition::boolean().alias('f'))
            .option("replicas", OptionDefinition::number().default_value(1))
            .option("region", OptionDefinition::string().default_value("eu-west-1"))
    }

    #[test]
    fn schema_free_parse_infers_values() {
        let parsed =
            parse_arguments(&args(&["deploy", "--env", "production", "--force"]), None).unwrap();
        assert_eq!(parsed.command, vec!["deploy"]);
        assert_eq!(parsed.string("env"), Some("production"));
        assert!(parsed.flag("force"));
        assert!(parsed.positionals.is_empty());
        assert_eq!(parsed.raw.len(), 4);
    }

    #[test]
    fn separator_stops_option_parsing() {
        let parsed = parse_arguments(
            &args(&["run", "--option", "value", "--", "--not-an-option"]),
            None,
        )
        .unwrap();
        assert_eq!(parsed.string("option"), Some("value"));
        assert_eq!(parsed.positionals, vec!["--not-an-option"]);
    }

    #[test]
    fn path_stops_at_first_flag() {
        let parsed =
            parse_arguments(&args(&["log", "--level", "warn", "Hello from plugin"]), None).unwrap();
        assert_eq!(parsed.command, vec!["log"]);
        assert_eq!(parsed.string("level"), Some("warn"));
        assert_eq!(parsed.positionals, vec!["Hello from plugin"]);
    }

    #[test]
    fn inline_values_and_short_clusters() {
        let parsed = parse_arguments(&args(&["build", "--out=dist", "-xz"]), None).unwrap();
        assert_eq!(parsed.string("out"), Some("dist"));
        assert!(parsed.flag("x"));
        assert!(parsed.flag("z"));
    }

    #[test]
    fn required_option_missing_fails() {
        let err = parse_arguments(&args(&["deploy"]), Some(&deploy_schema())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.issues()[0].message, "Option --env is required");
    }

    #[test]
    fn value_outside_choices_fails() {
        let err = parse_arguments(&args(&["deploy", "--env", "invalid"]), Some(&deploy_schema()))
            .unwrap_err();
        assert_eq!(
            err.issues()[0].message,
            "Option --env must be one of: dev, staging, production"
        );
        assert_eq!(err.issues()[0].value, Some(OptionValue::from("invalid")));
    }

    #[test]
    fn defaults_fill_absent_options() {
        let parsed = parse_arguments(
            &args(&["deploy", "-e", "production"]),
            Some(&deploy_schema()),
        )
        .unwrap();
        assert_eq!(parsed.string("env"), Some("production"));
        assert_eq!(parsed.number("replicas"), Some(1.0));
        assert_eq!(parsed.string("region"), Some("eu-west-1"));
        assert!(!parsed.has("force"));
    }

    #[test]
    fn count_accumulates_across_occurrences() {
        let schema = OptionsSchema::new()
            .option("verbose", OptionDefinition::count().alias('v'))
            .option("number", OptionDefinition::number().alias('n').required());
        let parsed =
            parse_arguments(&args(&["calc", "-n", "42", "-vvv"]), Some(&schema)).unwrap();
        assert_eq!(parsed.number("number"), Some(42.0));
        assert_eq!(parsed.count("verbose"), 3);

        let parsed =
            parse_arguments(&args(&["calc", "-n", "1", "--verbose", "-v"]), Some(&schema)).unwrap();
        assert_eq!(parsed.count("verbose"), 2);
    }

    #[test]
    fn boolean_inline_values() {
        let schema = OptionsSchema::new().option("force", OptionDefinition::boolean());
        let yes = parse_arguments(&args(&["x", "--force=1"]), Some(&schema)).unwrap();
        assert!(yes.flag("force"));
        let no = parse_arguments(&args(&["x", "--force=no"]), Some(&schema)).unwrap();
        assert_eq!(no.get("force"), Some(&OptionValue::Bool(false)));
        // a boolean never consumes the next token
        let bare = parse_arguments(&args(&["x", "--force", "file.txt"]), Some(&schema)).unwrap();
        assert_eq!(bare.positionals, vec!["file.txt"]);
    }

    #[test]
    fn unparseable_number_is_absent() {
        let schema = OptionsSchema::new().option("port", OptionDefinition::number());
        let parsed = parse_arguments(&args(&["serve", "--port", "abc"]), Some(&schema)).unwrap();
        assert!(!parsed.has("port"));
        assert!(parsed.positionals.is_empty());
    }

    #[test]
    fn arrays_split_inline_or_consume_greedily() {
        let schema = OptionsSchema::new()
            .option("tags", OptionDefinition::array().alias('t'))
            .option("force", OptionDefinition::boolean());

        let inline = parse_arguments(&args(&["tag", "--tags=a,b,c"]), Some(&schema)).unwrap();
        assert_eq!(inline.array("tags"), ["a", "b", "c"]);

        let greedy =
            parse_arguments(&args(&["tag", "--tags", "x", "y", "--force", "z"]), Some(&schema))
                .unwrap();
        assert_eq!(greedy.array("tags"), ["x", "y"]);
        assert_eq!(greedy.positionals, vec!["z"]);

        let repeated =
            parse_arguments(&args(&["tag", "-t", "one", "-t", "two"]), Some(&schema)).unwrap();
        assert_eq!(repeated.array("tags"), ["one", "two"]);
    }

    #[test]
    fn all_issues_reported_together() {
        let schema = OptionsSchema::new()
            .option("file", OptionDefinition::string().required())
            .option("destination", OptionDefinition::string().required())
            .option(
                "port",
                OptionDefinition::number().validate(|v: &OptionValue| {
                    let n = v.as_f64().unwrap_or(0.0);
                    if (1.0..=65535.0).contains(&n) {
                        Ok(())
                    } else {
                        Err("Port must be between 1 and 65535".to_string())
                    }
                }),
            );
        let err = parse_arguments(&args(&["copy", "--port", "70000"]), Some(&schema)).unwrap_err();
        let messages: Vec<_> = err.issues().iter().map(|i| i.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Option --file is required",
                "Option --destination is required",
                "Port must be between 1 and 65535",
            ]
        );
    }

    #[test]
    fn type_mismatch_from_schema_free_default() {
        // a string default on a number option surfaces as a type issue
        let schema = OptionsSchema::new()
            .option("port", OptionDefinition::new(OptionType::Number).default_value("80"));
        let err = parse_arguments(&args(&["serve"]), Some(&schema)).unwrap_err();
        assert_eq!(err.issues()[0].message, "Option --port must be of type number");
    }

    #[test]
    fn invalid_verdict_and_coercion() {
        let schema = OptionsSchema::new().option(
            "name",
            OptionDefinition::string()
                .validate(|v: &OptionValue| v.as_str().is_some_and(|s| !s.is_empty()))
                .coerce(|v| match v {
                    OptionValue::String(s) => OptionValue::String(s.to_uppercase()),
                    other => other,
                }),
        );
        let parsed = parse_arguments(&args(&["greet", "--name", "ada"]), Some(&schema)).unwrap();
        assert_eq!(parsed.string("name"), Some("ADA"));

        let err = parse_arguments(&args(&["greet", "--name="]), Some(&schema)).unwrap_err();
        assert_eq!(err.issues()[0].message, "Option --name is invalid");
    }

    #[test]
    fn type_mismatch_does_not_skip_later_checks() {
        let schema = OptionsSchema::new().option(
            "mode",
            OptionDefinition::string()
                .default_value(5)
                .choices(["fast", "safe"])
                .validate(|_: &OptionValue| false),
        );
        let err = parse_arguments(&args(&["run"]), Some(&schema)).unwrap_err();
        let messages: Vec<_> = err.issues().iter().map(|i| i.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Option --mode must be of type string",
                "Option --mode must be one of: fast, safe",
                "Option --mode is invalid",
            ]
        );
    }

    #[test]
    fn count_option_with_numeric_default() {
        let schema = OptionsSchema::new()
            .option("verbose", OptionDefinition::count().alias('v').default_value(0));
        let quiet = parse_arguments(&args(&["calc"]), Some(&schema)).unwrap();
        assert_eq!(quiet.count("verbose"), 0);
        let loud = parse_arguments(&args(&["calc", "-vv"]), Some(&schema)).unwrap();
        assert_eq!(loud.count("verbose"), 2);
    }
}
