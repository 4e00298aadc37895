//! Input line tokenizer and argument parser.
//!
//! Grammar: `["/"] <command> [<subcommand>] [(--key[=value] | -k[=value] | "quoted" | bare)]*`
//!
//! Tokenizing fails on a line without a command token. Argument parsing never
//! fails: flag tokens that do not fit the grammar are dropped, and argument
//! validation is left to the commands.

use crate::context::{ArgValue, CommandContext};
use crate::error::{CliError, Result};

/// A tokenized and parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCommand {
    pub command: String,
    pub subcommand: Option<String>,
    pub context: CommandContext,
}

impl ParsedCommand {
    /// Dispatch key: `<command>-<subcommand>` or `<command>`.
    pub fn full_name(&self) -> String {
        match &self.subcommand {
            Some(sub) => format!("{}-{}", self.command, sub),
            None => self.command.clone(),
        }
    }
}

/// Parses a full input line.
///
/// The second token is a subcommand unless it starts with `-`; arguments are
/// parsed from the token after the command (and subcommand).
///
/// # Errors
///
/// `CliError::EmptyCommand` when the line holds no token.
pub fn parse_command(input: &str) -> Result<ParsedCommand> {
    let tokens = tokenize(input)?;

    let command = tokens[0].clone();
    let subcommand = tokens.get(1).filter(|t| !t.starts_with('-')).cloned();
    let start_index = if subcommand.is_some() { 2 } else { 1 };

    let mut context = CommandContext::new(input);
    parse_into(&mut context, &tokens, start_index);

    Ok(ParsedCommand {
        command,
        subcommand,
        context,
    })
}

/// Splits a line into tokens.
///
/// A single leading `/` is ignored. A token is a run of non-whitespace,
/// non-quote characters and complete `"..."` spans; quotes stay in the token.
/// An unmatched `"` is skipped.
///
/// # Errors
///
/// `CliError::EmptyCommand` when no token remains.
pub fn tokenize(raw: &str) -> Result<Vec<String>> {
    let trimmed = raw.trim();
    let line = trimmed.strip_prefix('/').unwrap_or(trimmed);

    let tokens = scan(line);
    match tokens.first() {
        Some(first) if !first.is_empty() => Ok(tokens),
        _ => Err(CliError::EmptyCommand),
    }
}

fn scan(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let start = i;
        loop {
            match chars.get(i) {
                Some('"') => match chars[i + 1..].iter().position(|c| *c == '"') {
                    Some(offset) => i += offset + 2,
                    None => break,
                },
                Some(c) if !c.is_whitespace() => i += 1,
                _ => break,
            }
        }

        if i > start {
            tokens.push(chars[start..i].iter().collect());
        } else {
            i += 1;
        }
    }

    tokens
}

/// Parses `tokens[start_index..]` into an argument map.
pub fn parse_args(tokens: &[String], start_index: usize) -> CommandContext {
    let mut context = CommandContext::default();
    parse_into(&mut context, tokens, start_index);
    context
}

fn parse_into(context: &mut CommandContext, tokens: &[String], start_index: usize) {
    let mut positional = 0usize;
    let mut i = start_index;

    while i < tokens.len() {
        let token = tokens[i].as_str();

        if let Some(body) = token.strip_prefix("--") {
            if let Some((key, value)) = long_option(body) {
                match value {
                    Some(value) => context.insert(key, parse_value(value)),
                    None => context.insert(key, true),
                }
            }
        } else if token.starts_with('-') {
            if let Some((key, value)) = short_option(token) {
                match value {
                    Some(value) => context.insert(key, parse_value(value)),
                    None => match tokens.get(i + 1).filter(|next| !next.starts_with('-')) {
                        Some(next) => {
                            context.insert(key, parse_value(next));
                            i += 1;
                        }
                        None => context.insert(key, true),
                    },
                }
            }
        } else {
            context.insert(positional.to_string(), strip_quotes(token));
            positional += 1;
        }

        i += 1;
    }
}

/// `key` or `key=value` after `--`; both parts non-empty, no line breaks.
fn long_option(body: &str) -> Option<(&str, Option<&str>)> {
    if body.contains(is_line_terminator) {
        return None;
    }
    match body.split_once('=') {
        Some((key, value)) if !key.is_empty() && !value.is_empty() => Some((key, Some(value))),
        Some(_) => None,
        None if !body.is_empty() => Some((body, None)),
        None => None,
    }
}

/// `-x` or `-x=value` with a single ASCII letter.
fn short_option(token: &str) -> Option<(&str, Option<&str>)> {
    let rest = token.strip_prefix('-')?;
    let letter = rest.chars().next().filter(|c| c.is_ascii_alphabetic())?;
    let key = &rest[..letter.len_utf8()];
    let tail = &rest[letter.len_utf8()..];

    if tail.is_empty() {
        return Some((key, None));
    }
    let value = tail.strip_prefix('=')?;
    if value.is_empty() || value.contains(is_line_terminator) {
        return None;
    }
    Some((key, Some(value)))
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Removes one pair of surrounding double quotes.
fn strip_quotes(s: &str) -> &str {
    if s.starts_with('"') && s.ends_with('"') {
        if s.len() >= 2 {
            &s[1..s.len() - 1]
        } else {
            ""
        }
    } else {
        s
    }
}

/// Types a flag value.
///
/// Quotes are stripped; a comma makes a trimmed list; a canonical decimal
/// number becomes a number; anything else stays a trimmed string.
pub fn parse_value(value: &str) -> ArgValue {
    let cleaned = strip_quotes(value);

    if cleaned.contains(',') {
        return ArgValue::List(cleaned.split(',').map(|v| v.trim().to_string()).collect());
    }

    match canonical_number(cleaned) {
        Some(n) => ArgValue::Number(n),
        None => ArgValue::String(cleaned.trim().to_string()),
    }
}

/// The number `s` denotes, if formatting that number gives back `s` exactly.
///
/// Formatting follows the shortest round-trip decimal form, which switches
/// to exponent notation outside `[1e-6, 1e21)`; such inputs never round-trip.
/// Infinities are spelled `Infinity` and `-Infinity`.
fn canonical_number(s: &str) -> Option<f64> {
    match s {
        "Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    let n: f64 = s.parse().ok()?;
    if !n.is_finite() || (n == 0.0 && n.is_sign_negative()) {
        return None;
    }
    let magnitude = n.abs();
    if magnitude != 0.0 && !(1e-6..1e21).contains(&magnitude) {
        return None;
    }
    (n.to_string() == s).then_some(n)
}
