//! ParsedArguments - result of tokenizing and schema-checking argv.

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::options::OptionValue;
use crate::error::{CliError, CliResult, ValidationIssue};

/// Result of parsing command-line arguments.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedArguments {
    /// Leading non-option tokens (the command path).
    pub command: Vec<String>,

    /// Option values keyed by long name (or by the short flag when unknown).
    pub options: BTreeMap<String, OptionValue>,

    /// Everything that is neither path nor option.
    pub positionals: Vec<String>,

    /// The exact tokens handed to the parser.
    pub raw: Vec<String>,
}

impl ParsedArguments {
    pub fn new(raw: Vec<String>) -> Self {
        Self {
            raw,
            ..Default::default()
        }
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(OptionValue::as_str)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(OptionValue::as_f64)
    }

    /// `false` when the flag is absent.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(OptionValue::as_bool).unwrap_or(false)
    }

    /// `0` when the counter is absent.
    pub fn count(&self, name: &str) -> u64 {
        self.get(name).and_then(OptionValue::as_count).unwrap_or(0)
    }

    pub fn array(&self, name: &str) -> &[String] {
        self.get(name).and_then(OptionValue::as_array).unwrap_or(&[])
    }

    pub fn positional(&self, index: usize) -> Option<&str> {
        self.positionals.get(index).map(String::as_str)
    }

    /// Deserialize the option map into a typed struct.
    ///
    /// Option names are used verbatim as field names, so kebab-case options
    /// need `#[serde(rename_all = "kebab-case")]` on the target.
    pub fn deserialize_options<T: DeserializeOwned>(&self) -> CliResult<T> {
        let value = serde_json::to_value(&self.options)
            .map_err(|err| CliError::Failure(anyhow::Error::new(err)))?;
        serde_json::from_value(value).map_err(|err| {
            CliError::validation(vec![ValidationIssue::new(
                "options",
                format!("Invalid options: {}", err),
            )])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "kebab-case")]
    struct ServeOptions {
        port: u16,
        #[serde(default)]
        dry_run: bool,
        #[serde(default)]
        tags: Vec<String>,
    }

    #[test]
    fn typed_getters_fall_back_to_empty() {
        let mut parsed = ParsedArguments::new(vec!["serve".into()]);
        parsed
            .options
            .insert("verbose".into(), OptionValue::Count(2));
        assert_eq!(parsed.count("verbose"), 2);
        assert_eq!(parsed.count("missing"), 0);
        assert!(!parsed.flag("force"));
        assert!(parsed.array("tags").is_empty());
        assert_eq!(parsed.string("verbose"), None);
    }

    #[test]
    fn deserializes_into_typed_options() {
        let mut parsed = ParsedArguments::default();
        parsed.options.insert("port".into(), OptionValue::Number(8080.0));
        parsed.options.insert("dry-run".into(), OptionValue::Bool(true));
        parsed
            .options
            .insert("tags".into(), OptionValue::from(vec!["a", "b"]));

        let opts: ServeOptions = parsed.deserialize_options().unwrap();
        assert_eq!(opts.port, 8080);
        assert!(opts.dry_run);
        assert_eq!(opts.tags, vec!["a", "b"]);
    }

    #[test]
    fn deserialize_failure_is_validation_error() {
        let parsed = ParsedArguments::default();
        let err = parsed.deserialize_options::<ServeOptions>().unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Validation);
    }
}
