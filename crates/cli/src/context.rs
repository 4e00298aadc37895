//! Parsed arguments for one input line.

use serde::Serialize;
use std::fmt;

use crate::error::{CliError, Result};

/// A single argument value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArgValue {
    String(String),
    Bool(bool),
    Number(f64),
    List(Vec<String>),
}

impl ArgValue {
    /// Name of the stored variant, used in type errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            ArgValue::String(_) => "a string",
            ArgValue::Bool(_) => "a boolean",
            ArgValue::Number(_) => "a number",
            ArgValue::List(_) => "a list",
        }
    }

    /// Empty strings, `false`, zero and NaN are falsy; lists are always truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            ArgValue::String(s) => !s.is_empty(),
            ArgValue::Bool(b) => *b,
            ArgValue::Number(n) => *n != 0.0 && !n.is_nan(),
            ArgValue::List(_) => true,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ArgValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ArgValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Lenient list view: strings are split on commas, scalars become one item.
    pub fn to_list(&self) -> Vec<String> {
        match self {
            ArgValue::List(items) => items.clone(),
            ArgValue::String(s) => s
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            other => vec![other.to_string()],
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::String(s) => f.write_str(s),
            ArgValue::Bool(b) => write!(f, "{b}"),
            ArgValue::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            ArgValue::Number(n) => write!(f, "{n}"),
            ArgValue::List(items) => f.write_str(&items.join(",")),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::String(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::String(value)
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Bool(value)
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        ArgValue::Number(value)
    }
}

impl From<Vec<String>> for ArgValue {
    fn from(value: Vec<String>) -> Self {
        ArgValue::List(value)
    }
}

/// Arguments of one input line plus the line itself.
///
/// Keys keep their first insertion position; inserting an existing key
/// replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandContext {
    args: Vec<(String, ArgValue)>,
    raw_input: String,
}

impl CommandContext {
    pub fn new(raw_input: impl Into<String>) -> Self {
        Self {
            args: Vec::new(),
            raw_input: raw_input.into(),
        }
    }

    /// Builder-style insert, handy for tests.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ArgValue>) {
        let key = key.into();
        let value = value.into();
        match self.args.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.args.push((key, value)),
        }
    }

    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.args.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Arguments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.args.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Positional argument `index`.
    pub fn positional(&self, index: usize) -> Option<&ArgValue> {
        self.get(&index.to_string())
    }

    /// First truthy value among `keys`, e.g. `["priority", "p"]`.
    pub fn first_of(&self, keys: &[&str]) -> Option<&ArgValue> {
        keys.iter()
            .filter_map(|k| self.get(k))
            .find(|v| v.is_truthy())
    }

    /// The value under `key`, or `MissingArgument`.
    pub fn required(&self, key: &str) -> Result<&ArgValue> {
        self.get(key).ok_or_else(|| CliError::missing_argument(key))
    }

    /// String under `key`; `ArgumentType` when another variant is stored.
    pub fn string(&self, key: &str) -> Result<Option<&str>> {
        self.typed(key, "a string", ArgValue::as_str)
    }

    /// Number under `key`; `ArgumentType` when another variant is stored.
    pub fn number(&self, key: &str) -> Result<Option<f64>> {
        self.typed(key, "a number", ArgValue::as_number)
    }

    /// Boolean under `key`; `ArgumentType` when another variant is stored.
    pub fn flag(&self, key: &str) -> Result<Option<bool>> {
        self.typed(key, "a boolean", ArgValue::as_bool)
    }

    /// List under `key`; `ArgumentType` when another variant is stored.
    pub fn list(&self, key: &str) -> Result<Option<&[String]>> {
        self.typed(key, "a list", ArgValue::as_list)
    }

    /// Whole number under `key`. Numbers must be integral; strings are read
    /// by their leading integer (`"12"` and `"12abc"` give 12).
    pub fn integer(&self, key: &str) -> Result<Option<i64>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        integer_value(key, value).map(Some)
    }

    fn typed<'a, T>(
        &'a self,
        key: &str,
        expected: &'static str,
        extract: impl Fn(&'a ArgValue) -> Option<T>,
    ) -> Result<Option<T>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => extract(value)
                .map(Some)
                .ok_or_else(|| CliError::argument_type(key, expected, value.type_name())),
        }
    }
}

/// Reads `value` as a whole number, see [`CommandContext::integer`].
pub fn integer_value(key: &str, value: &ArgValue) -> Result<i64> {
    match value {
        ArgValue::Number(n) if n.is_finite() && n.fract() == 0.0 => Ok(*n as i64),
        ArgValue::Number(n) => Err(CliError::invalid_argument(
            key,
            format!("{key} must be a whole number, got {n}"),
        )),
        ArgValue::String(s) => leading_integer(s).ok_or_else(|| {
            CliError::invalid_argument(key, format!("{key} must be a number, got '{s}'"))
        }),
        other => Err(CliError::argument_type(key, "a number", other.type_name())),
    }
}

/// Leading base-10 integer of `s` after optional whitespace and sign.
pub fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits: &str = &rest[..rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len())];
    if digits.is_empty() {
        return None;
    }
    let magnitude: i64 = digits.parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut ctx = CommandContext::new("x");
        ctx.insert("a", "1");
        ctx.insert("b", true);
        ctx.insert("a", "2");

        let keys: Vec<&str> = ctx.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(ctx.get("a"), Some(&ArgValue::from("2")));
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn test_typed_accessors_reject_wrong_variant() {
        let ctx = CommandContext::new("x").with("n", 3.0).with("s", "hi");

        assert_eq!(ctx.number("n").unwrap(), Some(3.0));
        assert_eq!(ctx.string("missing").unwrap(), None);

        let err = ctx.number("s").unwrap_err();
        assert!(matches!(
            err,
            CliError::ArgumentType {
                expected: "a number",
                found: "a string",
                ..
            }
        ));
        assert_eq!(err.to_string(), "Argument 's' is a string, expected a number");
    }

    #[test]
    fn test_first_of_skips_falsy_values() {
        let ctx = CommandContext::new("x")
            .with("title", "")
            .with("0", "Fallback");
        assert_eq!(ctx.first_of(&["title", "0"]), Some(&ArgValue::from("Fallback")));
        assert_eq!(ctx.first_of(&["nope"]), None);
    }

    #[test]
    fn test_integer_reads_numbers_and_numeric_strings() {
        let ctx = CommandContext::new("x")
            .with("a", 42.0)
            .with("b", "17")
            .with("c", "12abc")
            .with("d", "abc")
            .with("e", 1.5)
            .with("f", true);

        assert_eq!(ctx.integer("a").unwrap(), Some(42));
        assert_eq!(ctx.integer("b").unwrap(), Some(17));
        assert_eq!(ctx.integer("c").unwrap(), Some(12));
        assert!(ctx.integer("d").is_err());
        assert!(ctx.integer("e").is_err());
        assert!(matches!(
            ctx.integer("f"),
            Err(CliError::ArgumentType { .. })
        ));
        assert_eq!(ctx.integer("zzz").unwrap(), None);
    }

    #[test]
    fn test_leading_integer() {
        assert_eq!(leading_integer("  -5x"), Some(-5));
        assert_eq!(leading_integer("+8"), Some(8));
        assert_eq!(leading_integer("x8"), None);
        assert_eq!(leading_integer(""), None);
    }

    #[test]
    fn test_to_list_is_lenient() {
        assert_eq!(
            ArgValue::from("a, b").to_list(),
            vec!["a".to_string(), "b".to_string()]
        );
        assert_eq!(ArgValue::from(3.0).to_list(), vec!["3".to_string()]);
    }
}
