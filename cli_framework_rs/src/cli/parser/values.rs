//! Per-type value extraction for options declared in a schema.

use std::collections::BTreeMap;

use super::helpers::{is_option_like, parse_number};
use crate::cli::command::{OptionDefinition, OptionType, OptionValue};

/// Apply `definition`'s type rule for one occurrence of `name`.
///
/// `next` is the index of the token after the flag; the returned index is
/// the first token not consumed.
pub(super) fn extract_value(
    options: &mut BTreeMap<String, OptionValue>,
    name: &str,
    definition: &OptionDefinition,
    inline: Option<&str>,
    args: &[String],
    next: usize,
) -> usize {
    let mut next = next;
    match definition.kind {
        OptionType::Boolean => {
            let value = match inline {
                None => true,
                Some(raw) => raw == "true" || raw == "1",
            };
            options.insert(name.to_string(), OptionValue::Bool(value));
        }
        OptionType::Number => {
            match take_value(inline, args, &mut next).as_deref().and_then(parse_number) {
                Some(n) => {
                    options.insert(name.to_string(), OptionValue::Number(n));
                }
                None => {
                    options.remove(name);
                }
            }
        }
        OptionType::String => {
            if let Some(raw) = take_value(inline, args, &mut next) {
                options.insert(name.to_string(), OptionValue::String(raw));
            }
        }
        OptionType::Array => {
            let items: Vec<String> = match inline {
                Some(raw) if raw.contains(',') => raw
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(String::from)
                    .collect(),
                Some(raw) => vec![raw.to_string()],
                None => {
                    let start = next;
                    while next < args.len() && !is_option_like(&args[next]) {
                        next += 1;
                    }
                    args[start..next].to_vec()
                }
            };
            match options.get_mut(name) {
                Some(OptionValue::Array(existing)) => existing.extend(items),
                _ => {
                    options.insert(name.to_string(), OptionValue::Array(items));
                }
            }
        }
        OptionType::Count => {
            let occurrences = match options.get(name) {
                Some(OptionValue::Count(n)) => n + 1,
                _ => 1,
            };
            options.insert(name.to_string(), OptionValue::Count(occurrences));
        }
    }
    next
}

/// Inline value, or the following token unless it is the `--` separator.
fn take_value(inline: Option<&str>, args: &[String], next: &mut usize) -> Option<String> {
    if let Some(raw) = inline {
        return Some(raw.to_string());
    }
    match args.get(*next) {
        Some(token) if token != "--" => {
            *next += 1;
            Some(token.clone())
        }
        _ => None,
    }
}

/// Schema-free rule: `true`, unless an inline value or a plain next token exists.
pub(super) fn infer_value(
    options: &mut BTreeMap<String, OptionValue>,
    name: &str,
    inline: Option<&str>,
    args: &[String],
    next: usize,
) -> usize {
    if let Some(raw) = inline {
        options.insert(name.to_string(), OptionValue::String(raw.to_string()));
        return next;
    }
    match args.get(next) {
        Some(token) if !is_option_like(token) => {
            options.insert(name.to_string(), OptionValue::String(token.clone()));
            next + 1
        }
        _ => {
            options.insert(name.to_string(), OptionValue::Bool(true));
            next
        }
    }
}
