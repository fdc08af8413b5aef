//! Option schema types: declared option kinds, parsed values and the
//! ordered schema a command attaches to itself.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

// ============================================================================
// Values
// ============================================================================

/// Declared kind of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    String,
    Number,
    Boolean,
    Array,
    Count,
}

impl OptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::String => "string",
            OptionType::Number => "number",
            OptionType::Boolean => "boolean",
            OptionType::Array => "array",
            OptionType::Count => "count",
        }
    }

    /// Whether the option consumes a value token (shown as `<type>` in help).
    pub fn takes_value(&self) -> bool {
        !matches!(self, OptionType::Boolean | OptionType::Count)
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed option value.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<String>),
    Count(u64),
}

impl OptionValue {
    pub fn type_of(&self) -> OptionType {
        match self {
            OptionValue::Bool(_) => OptionType::Boolean,
            OptionValue::Number(_) => OptionType::Number,
            OptionValue::String(_) => OptionType::String,
            OptionValue::Array(_) => OptionType::Array,
            OptionValue::Count(_) => OptionType::Count,
        }
    }

    pub fn matches(&self, kind: OptionType) -> bool {
        self.type_of() == kind
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            OptionValue::Number(n) => Some(*n),
            OptionValue::Count(c) => Some(*c as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[String]> {
        match self {
            OptionValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_count(&self) -> Option<u64> {
        match self {
            OptionValue::Count(c) => Some(*c),
            _ => None,
        }
    }
}

/// Integral numbers print (and serialize) without a fractional part.
fn integral(n: f64) -> Option<i64> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 {
        Some(n as i64)
    } else {
        None
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Number(n) => match integral(*n) {
                Some(i) => write!(f, "{}", i),
                None => write!(f, "{}", n),
            },
            OptionValue::String(s) => f.write_str(s),
            OptionValue::Array(items) => f.write_str(&items.join(",")),
            OptionValue::Count(c) => write!(f, "{}", c),
        }
    }
}

impl Serialize for OptionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OptionValue::Bool(b) => serializer.serialize_bool(*b),
            OptionValue::Number(n) => match integral(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            OptionValue::String(s) => serializer.serialize_str(s),
            OptionValue::Array(items) => items.serialize(serializer),
            OptionValue::Count(c) => serializer.serialize_u64(*c),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        OptionValue::Number(value)
    }
}

impl From<i32> for OptionValue {
    fn from(value: i32) -> Self {
        OptionValue::Number(f64::from(value))
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::String(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::String(value)
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(value: Vec<String>) -> Self {
        OptionValue::Array(value)
    }
}

impl From<Vec<&str>> for OptionValue {
    fn from(value: Vec<&str>) -> Self {
        OptionValue::Array(value.into_iter().map(String::from).collect())
    }
}

// ============================================================================
// Definitions
// ============================================================================

/// Outcome of a custom validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    /// Reported as "Option --NAME is invalid".
    Invalid,
    /// Reported verbatim.
    Message(String),
}

impl From<bool> for Verdict {
    fn from(ok: bool) -> Self {
        if ok { Verdict::Valid } else { Verdict::Invalid }
    }
}

impl From<String> for Verdict {
    fn from(message: String) -> Self {
        Verdict::Message(message)
    }
}

impl From<&str> for Verdict {
    fn from(message: &str) -> Self {
        Verdict::Message(message.to_string())
    }
}

impl From<Result<(), String>> for Verdict {
    fn from(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Verdict::Valid,
            Err(message) => Verdict::Message(message),
        }
    }
}

pub type Validator = Arc<dyn Fn(&OptionValue) -> Verdict + Send + Sync>;
pub type Coercer = Arc<dyn Fn(OptionValue) -> OptionValue + Send + Sync>;

/// Declaration of one named option.
#[derive(Clone)]
pub struct OptionDefinition {
    pub kind: OptionType,
    /// Single-character short flag.
    pub alias: Option<char>,
    pub description: String,
    pub default: Option<OptionValue>,
    pub required: bool,
    pub choices: Vec<OptionValue>,
    validator: Option<Validator>,
    coercer: Option<Coercer>,
}

impl OptionDefinition {
    pub fn new(kind: OptionType) -> Self {
        Self {
            kind,
            alias: None,
            description: String::new(),
            default: None,
            required: false,
            choices: Vec::new(),
            validator: None,
            coercer: None,
        }
    }

    pub fn string() -> Self {
        Self::new(OptionType::String)
    }

    pub fn number() -> Self {
        Self::new(OptionType::Number)
    }

    pub fn boolean() -> Self {
        Self::new(OptionType::Boolean)
    }

    pub fn array() -> Self {
        Self::new(OptionType::Array)
    }

    pub fn count() -> Self {
        Self::new(OptionType::Count)
    }

    pub fn alias(mut self, alias: char) -> Self {
        self.alias = Some(alias);
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Integral numbers given to a `count` option are stored as counts.
    pub fn default_value(mut self, value: impl Into<OptionValue>) -> Self {
        let value = match (self.kind, value.into()) {
            (OptionType::Count, OptionValue::Number(n)) if n >= 0.0 && n.fract() == 0.0 => {
                OptionValue::Count(n as u64)
            }
            (_, value) => value,
        };
        self.default = Some(value);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn choices<I, V>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<OptionValue>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate<F, R>(mut self, check: F) -> Self
    where
        F: Fn(&OptionValue) -> R + Send + Sync + 'static,
        R: Into<Verdict>,
    {
        self.validator = Some(Arc::new(move |value| check(value).into()));
        self
    }

    pub fn coerce<F>(mut self, transform: F) -> Self
    where
        F: Fn(OptionValue) -> OptionValue + Send + Sync + 'static,
    {
        self.coercer = Some(Arc::new(transform));
        self
    }

    /// `None` when no validator is attached.
    pub fn check(&self, value: &OptionValue) -> Option<Verdict> {
        self.validator.as_ref().map(|validator| validator(value))
    }

    pub fn has_coercer(&self) -> bool {
        self.coercer.is_some()
    }

    pub fn apply_coercion(&self, value: OptionValue) -> OptionValue {
        match &self.coercer {
            Some(coercer) => coercer(value),
            None => value,
        }
    }
}

impl fmt::Debug for OptionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionDefinition")
            .field("kind", &self.kind)
            .field("alias", &self.alias)
            .field("description", &self.description)
            .field("default", &self.default)
            .field("required", &self.required)
            .field("choices", &self.choices)
            .field("validator", &self.validator.is_some())
            .field("coercer", &self.coercer.is_some())
            .finish()
    }
}

/// Options declared by a command, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct OptionsSchema {
    entries: Vec<(String, OptionDefinition)>,
}

impl OptionsSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`OptionsSchema::insert`].
    pub fn option(mut self, name: impl Into<String>, definition: OptionDefinition) -> Self {
        self.insert(name, definition);
        self
    }

    /// Redeclaring a name replaces the definition in place.
    pub fn insert(&mut self, name: impl Into<String>, definition: OptionDefinition) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = definition,
            None => self.entries.push((name, definition)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&OptionDefinition> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, definition)| definition)
    }

    /// Look an option up by its short flag.
    pub fn by_alias(&self, alias: char) -> Option<(&str, &OptionDefinition)> {
        self.entries
            .iter()
            .find(|(_, definition)| definition.alias == Some(alias))
            .map(|(name, definition)| (name.as_str(), definition))
    }

    /// Whether `-<flag>` belongs to this schema, as an alias or a one-letter name.
    pub fn claims_short(&self, flag: char) -> bool {
        self.by_alias(flag).is_some() || self.get(&flag.to_string()).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionDefinition)> {
        self.entries
            .iter()
            .map(|(name, definition)| (name.as_str(), definition))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, OptionDefinition)> for OptionsSchema {
    fn from_iter<T: IntoIterator<Item = (N, OptionDefinition)>>(iter: T) -> Self {
        let mut schema = OptionsSchema::new();
        for (name, definition) in iter {
            schema.insert(name, definition);
        }
        schema
    }
}
