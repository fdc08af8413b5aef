//! Defaulting, validation and coercion against an [`OptionsSchema`].

use std::collections::BTreeMap;

use crate::cli::command::{OptionDefinition, OptionValue, OptionsSchema, Verdict};
use crate::error::{CliError, CliResult, ValidationIssue};

pub(super) fn apply_defaults(options: &mut BTreeMap<String, OptionValue>, schema: &OptionsSchema) {
    for (name, definition) in schema.iter() {
        if options.contains_key(name) {
            continue;
        }
        if let Some(default) = &definition.default {
            options.insert(name.to_string(), default.clone());
        }
    }
}

/// Check every declared option in declaration order, collecting all issues.
///
/// Coercion runs for every present value, even one that failed a check.
pub(super) fn validate_options(
    options: &mut BTreeMap<String, OptionValue>,
    schema: &OptionsSchema,
) -> CliResult<()> {
    let mut issues = Vec::new();

    for (name, definition) in schema.iter() {
        let Some(value) = options.get(name).cloned() else {
            if definition.required {
                issues.push(ValidationIssue::new(
                    name,
                    format!("Option --{} is required", name),
                ));
            }
            continue;
        };

        check_value(name, definition, &value, &mut issues);

        if definition.has_coercer() {
            options.insert(name.to_string(), definition.apply_coercion(value));
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(CliError::validation(issues))
    }
}

fn check_value(
    name: &str,
    definition: &OptionDefinition,
    value: &OptionValue,
    issues: &mut Vec<ValidationIssue>,
) {
    let issue = |message: String| {
        ValidationIssue::new(name, message).with_value(Some(value.clone()))
    };

    if !value.matches(definition.kind) {
        issues.push(issue(format!(
            "Option --{} must be of type {}",
            name, definition.kind
        )));
    }

    if !definition.choices.is_empty() && !within_choices(value, &definition.choices) {
        let allowed: Vec<String> = definition.choices.iter().map(ToString::to_string).collect();
        issues.push(issue(format!(
            "Option --{} must be one of: {}",
            name,
            allowed.join(", ")
        )));
    }

    match definition.check(value) {
        None | Some(Verdict::Valid) => {}
        Some(Verdict::Invalid) => issues.push(issue(format!("Option --{} is invalid", name))),
        Some(Verdict::Message(message)) => issues.push(issue(message)),
    }
}

/// Arrays pass when every element is an allowed choice.
fn within_choices(value: &OptionValue, choices: &[OptionValue]) -> bool {
    match value {
        OptionValue::Array(items) => items
            .iter()
            .all(|item| choices.iter().any(|choice| choice.to_string() == *item)),
        other => choices.contains(other),
    }
}
