//! Request field validation
//!
//! Declarative per-field rules checked against a loosely typed value bag
//! (JSON body or multipart text fields). The outcome is either a sanitized
//! [`Validated`] bag with normalized values, or a field -> messages map.
//!
//! ```ignore
//! let mut check = Validator::new(&input)
//!     .rule("num", &[Rule::Required, Rule::Integer])
//!     .rule("status", &[Rule::Required, Rule::Boolean])
//!     .run();
//! // async lookups can add more errors before finishing
//! let data = check.finish()?;
//! let num = data.int("num");
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Number, Value};

use crate::utils::{AppError, AppResult, FieldErrors};

/// Raw request fields
pub type Input = Map<String, Value>;

/// A single field rule
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Must be present and non-empty
    Required,
    /// Only validated when present
    Sometimes,
    /// Empty values are accepted and skip the remaining rules
    Nullable,
    String,
    Integer,
    Numeric,
    /// true / false / 1 / 0 and their string forms
    Boolean,
    /// Numeric lower bound
    Min(f64),
    /// Numeric upper bound
    Max(f64),
    /// Character count lower bound
    MinLen(usize),
    /// Character count upper bound
    MaxLen(usize),
    /// Value must be one of the listed strings
    In(&'static [&'static str]),
    /// Custom format check; failing reports "The {field} format is invalid."
    Format(fn(&str) -> bool),
}

/// Normalized values of fields that passed validation
#[derive(Debug, Clone, Default)]
pub struct Validated {
    values: Map<String, Value>,
}

impl Validated {
    /// Whether the field was supplied and passed
    pub fn has(&self, field: &str) -> bool {
        self.values.get(field).is_some_and(|v| !v.is_null())
    }

    pub fn str(&self, field: &str) -> Option<&str> {
        self.values.get(field).and_then(Value::as_str)
    }

    pub fn string(&self, field: &str) -> Option<String> {
        self.str(field).map(str::to_string)
    }

    pub fn int(&self, field: &str) -> Option<i64> {
        self.values.get(field).and_then(Value::as_i64)
    }

    /// Integer of a `Nullable` field: `None` when absent, `Some(None)` when sent empty
    pub fn nullable_int(&self, field: &str) -> Option<Option<i64>> {
        self.values.get(field).map(Value::as_i64)
    }

    pub fn float(&self, field: &str) -> Option<f64> {
        self.values.get(field).and_then(Value::as_f64)
    }

    pub fn bool(&self, field: &str) -> Option<bool> {
        self.values.get(field).and_then(Value::as_bool)
    }

    /// Value of a `Required` field
    pub fn required<T>(&self, field: &str, get: impl Fn(&Self, &str) -> Option<T>) -> AppResult<T> {
        get(self, field).ok_or_else(|| {
            AppError::validation(format!("The {} field is required.", attribute(field)))
        })
    }
}

/// Builder collecting rules per field
pub struct Validator<'a> {
    input: &'a Input,
    rules: Vec<(&'static str, &'a [Rule])>,
}

impl<'a> Validator<'a> {
    pub fn new(input: &'a Input) -> Self {
        Self {
            input,
            rules: Vec::new(),
        }
    }

    pub fn rule(mut self, field: &'static str, rules: &'a [Rule]) -> Self {
        self.rules.push((field, rules));
        self
    }

    /// Check every field, collecting all failures
    pub fn run(self) -> Validation {
        let mut validation = Validation::default();
        for (field, rules) in self.rules {
            match check_field(field, self.input.get(field), rules) {
                Ok(Some(value)) => {
                    validation.data.values.insert(field.to_string(), value);
                }
                Ok(None) => {}
                Err(message) => validation.fail(field, message),
            }
        }
        validation
    }

    /// Shortcut for `run().finish()`
    pub fn validate(self) -> AppResult<Validated> {
        self.run().finish()
    }
}

/// Result of a validation run that may still receive extra errors
#[derive(Debug, Default)]
pub struct Validation {
    data: Validated,
    errors: FieldErrors,
}

impl Validation {
    pub fn data(&self) -> &Validated {
        &self.data
    }

    /// Whether `field` was supplied and passed its rules so far
    pub fn passed(&self, field: &str) -> bool {
        self.data.has(field) && !self.errors.contains_key(field)
    }

    /// Record an additional failure for `field`
    pub fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.data.values.remove(field);
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Validated bag, or a `ValidationFailed` error carrying the field map
    pub fn finish(self) -> AppResult<Validated> {
        if self.errors.is_empty() {
            Ok(self.data)
        } else {
            Err(AppError::invalid_fields(self.errors))
        }
    }
}

/// Human readable attribute name: `category_id` -> `category id`
pub fn attribute(field: &str) -> String {
    field.replace('_', " ")
}

fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        _ => false,
    }
}

/// Returns the normalized value, `None` when the field is skipped, or the first failure
fn check_field(field: &str, value: Option<&Value>, rules: &[Rule]) -> Result<Option<Value>, String> {
    let name = attribute(field);
    let required = rules.iter().any(|r| matches!(r, Rule::Required));
    let sometimes = rules.iter().any(|r| matches!(r, Rule::Sometimes));
    let nullable = rules.iter().any(|r| matches!(r, Rule::Nullable));

    if value.is_none() && sometimes {
        return Ok(None);
    }
    if is_empty(value) {
        if required {
            return Err(format!("The {name} field is required."));
        }
        return Ok(if nullable && value.is_some() {
            Some(Value::Null)
        } else {
            None
        });
    }
    let Some(raw) = value else {
        return Ok(None);
    };

    let mut normalized = raw.clone();
    let numeric = rules
        .iter()
        .any(|r| matches!(r, Rule::Integer | Rule::Numeric));

    for rule in rules {
        match *rule {
            Rule::Required | Rule::Sometimes | Rule::Nullable => {}
            Rule::String => {
                if !raw.is_string() {
                    return Err(format!("The {name} must be a string."));
                }
            }
            Rule::Integer => {
                let n = as_integer(raw).ok_or_else(|| format!("The {name} must be an integer."))?;
                normalized = Value::Number(n.into());
            }
            Rule::Numeric => {
                let n = as_number(raw).ok_or_else(|| format!("The {name} must be a number."))?;
                normalized = Number::from_f64(n)
                    .map(Value::Number)
                    .ok_or_else(|| format!("The {name} must be a number."))?;
            }
            Rule::Boolean => {
                let b = as_boolean(raw)
                    .ok_or_else(|| format!("The {name} field must be true or false."))?;
                normalized = Value::Bool(b);
            }
            Rule::Min(min) => {
                if numeric {
                    if normalized.as_f64().is_some_and(|n| n < min) {
                        return Err(format!("The {name} must be at least {min}."));
                    }
                } else if char_len(raw) < min as usize {
                    return Err(format!("The {name} must be at least {min} characters."));
                }
            }
            Rule::Max(max) => {
                if numeric {
                    if normalized.as_f64().is_some_and(|n| n > max) {
                        return Err(format!("The {name} may not be greater than {max}."));
                    }
                } else if char_len(raw) > max as usize {
                    return Err(format!(
                        "The {name} may not be greater than {max} characters."
                    ));
                }
            }
            Rule::MinLen(min) => {
                if char_len(raw) < min {
                    return Err(format!("The {name} must be at least {min} characters."));
                }
            }
            Rule::MaxLen(max) => {
                if char_len(raw) > max {
                    return Err(format!(
                        "The {name} may not be greater than {max} characters."
                    ));
                }
            }
            Rule::In(allowed) => {
                let ok = raw.as_str().is_some_and(|s| allowed.contains(&s));
                if !ok {
                    return Err(format!("The selected {name} is invalid."));
                }
            }
            Rule::Format(check) => {
                let ok = raw.as_str().is_some_and(check);
                if !ok {
                    return Err(format!("The {name} format is invalid."));
                }
            }
        }
    }

    Ok(Some(normalized))
}

fn char_len(value: &Value) -> usize {
    match value {
        Value::String(s) => s.chars().count(),
        other => other.to_string().chars().count(),
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

fn as_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim() {
            "1" | "true" => Some(true),
            "0" | "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

// ── Domain formats ──────────────────────────────────────────────────

/// Letters, whitespace, apostrophes and ampersands, ending with a letter
static MEAL_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\s'&]*\p{L}$").expect("valid meal name pattern"));

/// At least one non-whitespace character, surrounding whitespace tolerated
static NON_BLANK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\s*\S(?:.*\S)?\s*$").expect("valid non-blank pattern"));

/// Meal names carry between 3 and 50 letters
pub const MEAL_NAME_MIN_LETTERS: usize = 3;
pub const MEAL_NAME_MAX_LETTERS: usize = 50;

pub fn is_meal_name(value: &str) -> bool {
    let letters = value.chars().filter(|c| c.is_alphabetic()).count();
    MEAL_NAME.is_match(value)
        && (MEAL_NAME_MIN_LETTERS..=MEAL_NAME_MAX_LETTERS).contains(&letters)
}

pub fn is_non_blank(value: &str) -> bool {
    NON_BLANK.is_match(value)
}
