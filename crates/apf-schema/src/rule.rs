//! Typed validation rules for nested configuration documents.
//!
//! A schema is a tree of [`Rule`]s. Every rule validates one node of a
//! [`serde_json::Value`] and, for containers, recurses into its children.
//! Traversal is depth-first and stops at the first violation, which is
//! reported together with the dotted path to the offending node.

use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::{Map, Value};

/// RFC 3986 scheme followed by `:` and a non-empty, whitespace-free remainder.
static URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:\S+$").expect("URI pattern is a valid regex")
});

/// A schema violation found while validating a document.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("at `{path}`: {message}")]
pub struct ValidationError {
    /// Dotted path of property names (and array indices) leading to the
    /// violating node, or `<root>` for the document itself.
    pub path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl ValidationError {
    fn new(path: &Breadcrumb, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

/// Position of a node inside the document being validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Breadcrumb(Vec<String>);

impl Breadcrumb {
    /// The document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Whether this breadcrumb points at the document root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    fn push(&mut self, segment: impl Into<String>) {
        self.0.push(segment.into());
    }

    fn pop(&mut self) {
        self.0.pop();
    }
}

impl fmt::Display for Breadcrumb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "<root>")
        } else {
            write!(f, "{}", self.0.join("."))
        }
    }
}

/// A node in the validation tree.
#[derive(Debug)]
pub enum Rule {
    /// A closed object with declared properties.
    Object(ObjectRule),
    /// A homogeneous array.
    Array(ArrayRule),
    /// A string with optional length, pattern and format constraints.
    String(StringRule),
    /// An integer with optional range and enumeration constraints.
    Integer(IntegerRule),
    /// A boolean.
    Boolean,
    /// Any object; contents are opaque and passed through unchecked.
    AnyObject,
}

impl Rule {
    /// Validate `value` as the root of a document.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found in depth-first order.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let mut path = Breadcrumb::root();
        self.validate_at(value, &mut path)
    }

    /// Validate `value` located at `path`.
    ///
    /// On success `path` is left as it was passed in. On failure it may
    /// point anywhere below the starting node.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found in depth-first order.
    pub fn validate_at(&self, value: &Value, path: &mut Breadcrumb) -> Result<(), ValidationError> {
        match self {
            Rule::Object(rule) => rule.validate_at(value, path),
            Rule::Array(rule) => rule.validate_at(value, path),
            Rule::String(rule) => rule.validate_at(value, path),
            Rule::Integer(rule) => rule.validate_at(value, path),
            Rule::Boolean => {
                if value.is_boolean() {
                    Ok(())
                } else {
                    Err(type_mismatch(value, "boolean", path))
                }
            }
            Rule::AnyObject => {
                if value.is_object() {
                    Ok(())
                } else {
                    Err(type_mismatch(value, "object", path))
                }
            }
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_mismatch(value: &Value, expected: &str, path: &Breadcrumb) -> ValidationError {
    ValidationError::new(path, format!("expected {expected}, found {}", kind(value)))
}

/// Companion fields that become mandatory once `trigger` is present.
#[derive(Debug, Clone)]
pub struct DependentRequired {
    /// Field whose presence activates the requirement.
    pub trigger: &'static str,
    /// Fields that must then also be present.
    pub companions: Vec<&'static str>,
}

/// Closed object: only declared properties may appear.
#[derive(Debug, Default)]
pub struct ObjectRule {
    properties: Vec<(&'static str, Rule)>,
    required: Vec<&'static str>,
    dependent_required: Vec<DependentRequired>,
}

impl ObjectRule {
    /// An object rule with no declared properties (only `{}` validates).
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a property and the rule its value must satisfy.
    pub fn property(mut self, name: &'static str, rule: Rule) -> Self {
        self.properties.push((name, rule));
        self
    }

    /// Mark declared properties as mandatory.
    pub fn required(mut self, names: &[&'static str]) -> Self {
        self.required.extend_from_slice(names);
        self
    }

    /// If `trigger` is present, every field in `companions` must be too.
    pub fn dependent_required(mut self, trigger: &'static str, companions: &[&'static str]) -> Self {
        self.dependent_required.push(DependentRequired {
            trigger,
            companions: companions.to_vec(),
        });
        self
    }

    fn declares(&self, key: &str) -> bool {
        self.properties.iter().any(|(name, _)| *name == key)
    }

    fn validate_at(&self, value: &Value, path: &mut Breadcrumb) -> Result<(), ValidationError> {
        let Some(object) = value.as_object() else {
            return Err(type_mismatch(value, "object", path));
        };

        for name in &self.required {
            if !object.contains_key(*name) {
                return Err(ValidationError::new(
                    path,
                    format!("missing required property `{name}`"),
                ));
            }
        }

        if let Some(unknown) = object.keys().find(|key| !self.declares(key)) {
            return Err(ValidationError::new(
                path,
                format!("unknown property `{unknown}`"),
            ));
        }

        for (name, rule) in &self.properties {
            if let Some(child) = object.get(*name) {
                path.push(*name);
                rule.validate_at(child, path)?;
                path.pop();
            }
        }

        self.check_dependencies(object, path)
    }

    fn check_dependencies(
        &self,
        object: &Map<String, Value>,
        path: &Breadcrumb,
    ) -> Result<(), ValidationError> {
        for dep in &self.dependent_required {
            if !object.contains_key(dep.trigger) {
                continue;
            }
            if let Some(missing) = dep.companions.iter().find(|c| !object.contains_key(**c)) {
                return Err(ValidationError::new(
                    path,
                    format!("`{missing}` is required when `{}` is present", dep.trigger),
                ));
            }
        }
        Ok(())
    }
}

/// Array whose every element satisfies `items`.
#[derive(Debug)]
pub struct ArrayRule {
    items: Box<Rule>,
    min_items: Option<usize>,
    max_items: Option<usize>,
}

impl ArrayRule {
    /// An unbounded array of `items`.
    pub fn of(items: Rule) -> Self {
        Self {
            items: Box::new(items),
            min_items: None,
            max_items: None,
        }
    }

    /// Require at least `n` elements.
    pub fn min_items(mut self, n: usize) -> Self {
        self.min_items = Some(n);
        self
    }

    /// Allow at most `n` elements.
    pub fn max_items(mut self, n: usize) -> Self {
        self.max_items = Some(n);
        self
    }

    fn validate_at(&self, value: &Value, path: &mut Breadcrumb) -> Result<(), ValidationError> {
        let Some(items) = value.as_array() else {
            return Err(type_mismatch(value, "array", path));
        };

        if let Some(min) = self.min_items.filter(|&min| items.len() < min) {
            return Err(ValidationError::new(
                path,
                format!("expected at least {min} items, found {}", items.len()),
            ));
        }
        if let Some(max) = self.max_items.filter(|&max| items.len() > max) {
            return Err(ValidationError::new(
                path,
                format!("expected at most {max} items, found {}", items.len()),
            ));
        }

        for (index, item) in items.iter().enumerate() {
            path.push(index.to_string());
            self.items.validate_at(item, path)?;
            path.pop();
        }
        Ok(())
    }
}

/// Semantic string formats understood by [`StringRule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// An absolute URI (`scheme:rest`).
    Uri,
    /// A calendar date written as `YYYY-MM-DD`.
    Date,
}

impl Format {
    fn accepts(self, s: &str) -> bool {
        match self {
            Format::Uri => URI.is_match(s),
            // chrono tolerates signs, padding and whitespace; only the canonical form passes.
            Format::Date => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .is_ok_and(|date| date.format("%Y-%m-%d").to_string() == s),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Format::Uri => "URI",
            Format::Date => "date",
        }
    }
}

/// String constraints. Lengths count characters, not bytes.
#[derive(Debug, Default)]
pub struct StringRule {
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<Regex>,
    format: Option<Format>,
}

impl StringRule {
    /// Any string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require at least `n` characters.
    pub fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    /// Allow at most `n` characters.
    pub fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    /// Require a regex match somewhere in the string; anchor the pattern
    /// for a full match.
    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Require a semantic format.
    pub fn format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    fn validate_at(&self, value: &Value, path: &mut Breadcrumb) -> Result<(), ValidationError> {
        let Some(s) = value.as_str() else {
            return Err(type_mismatch(value, "string", path));
        };

        let len = s.chars().count();
        if let Some(min) = self.min_length.filter(|&min| len < min) {
            return Err(ValidationError::new(
                path,
                format!("{s:?} is shorter than {min} characters"),
            ));
        }
        if let Some(max) = self.max_length.filter(|&max| len > max) {
            return Err(ValidationError::new(
                path,
                format!("{s:?} is longer than {max} characters"),
            ));
        }

        if let Some(re) = self.pattern.as_ref().filter(|re| !re.is_match(s)) {
            return Err(ValidationError::new(
                path,
                format!("{s:?} does not match pattern `{}`", re.as_str()),
            ));
        }

        if let Some(format) = self.format.filter(|format| !format.accepts(s)) {
            return Err(ValidationError::new(
                path,
                format!("{s:?} is not a valid {}", format.name()),
            ));
        }
        Ok(())
    }
}

/// Integer constraints.
#[derive(Debug, Default)]
pub struct IntegerRule {
    minimum: Option<i64>,
    maximum: Option<i64>,
    allowed: Option<Vec<i64>>,
}

impl IntegerRule {
    /// Any integer representable as `i64`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inclusive lower bound.
    pub fn minimum(mut self, n: i64) -> Self {
        self.minimum = Some(n);
        self
    }

    /// Inclusive upper bound.
    pub fn maximum(mut self, n: i64) -> Self {
        self.maximum = Some(n);
        self
    }

    /// Restrict the value to an exact set.
    pub fn one_of(mut self, values: &[i64]) -> Self {
        self.allowed = Some(values.to_vec());
        self
    }

    fn validate_at(&self, value: &Value, path: &mut Breadcrumb) -> Result<(), ValidationError> {
        let n = match value.as_i64() {
            Some(n) => n,
            None if value.is_u64() => {
                return Err(ValidationError::new(path, format!("{value} is out of range")));
            }
            None => return Err(type_mismatch(value, "integer", path)),
        };

        if let Some(allowed) = self.allowed.as_ref().filter(|allowed| !allowed.contains(&n)) {
            return Err(ValidationError::new(
                path,
                format!("{n} is not one of {allowed:?}"),
            ));
        }
        if let Some(min) = self.minimum.filter(|&min| n < min) {
            return Err(ValidationError::new(
                path,
                format!("{n} is less than the minimum of {min}"),
            ));
        }
        if let Some(max) = self.maximum.filter(|&max| n > max) {
            return Err(ValidationError::new(
                path,
                format!("{n} is greater than the maximum of {max}"),
            ));
        }
        Ok(())
    }
}
