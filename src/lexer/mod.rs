//! Rule-driven tokenizer.
//!
//! A [`TokenRule`] pairs a kind name with a regular expression. Rules are
//! tried strictly in declaration order and the first one that matches at the
//! current offset produces the next token; there is no longest-match logic,
//! so the order of the rule list is part of the grammar.
//!
//! Whitespace is not special here. Grammars that want to ignore it have to
//! skip the whitespace tokens themselves.

mod rules;

use std::fmt;

use regex::Regex;
use thiserror::Error;

pub use rules::{kind, standard_rules};

/// Longest snippet shown in an [`TokenizeError::UnknownToken`].
const SNIPPET_LENGTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TokenizeError {
    #[error("[{line}:{column}] Unknown token at {snippet}")]
    UnknownToken {
        snippet: String,
        line: usize,
        column: usize,
    },
    #[error("invalid pattern for token rule '{name}': {source}")]
    InvalidRule {
        name: String,
        #[source]
        source: regex::Error,
    },
}

/// The value carried by a token after coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Text(String),
    Number(f64),
}

impl TokenValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            TokenValue::Number(number) => Some(*number),
            TokenValue::Text(_) => None,
        }
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::Text(text) => f.write_str(text),
            TokenValue::Number(number) => write!(f, "{number}"),
        }
    }
}

impl From<&str> for TokenValue {
    fn from(value: &str) -> Self {
        TokenValue::Text(value.to_string())
    }
}

impl From<f64> for TokenValue {
    fn from(value: f64) -> Self {
        TokenValue::Number(value)
    }
}

type Coercion = fn(&str) -> TokenValue;

#[derive(Debug, Clone)]
pub struct TokenRule {
    name: String,
    pattern: Regex,
    coerce: Option<Coercion>,
}

impl TokenRule {
    /// Compile a rule. The pattern is anchored at the current offset, so it
    /// must not start with `^` itself.
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, TokenizeError> {
        let name = name.into();
        let pattern = Regex::new(&format!("^(?:{pattern})"))
            .map_err(|source| TokenizeError::InvalidRule {
                name: name.clone(),
                source,
            })?;

        Ok(Self {
            name,
            pattern,
            coerce: None,
        })
    }

    /// Attach a value coercion applied to the matched text.
    pub fn with_value(mut self, coerce: Coercion) -> Self {
        self.coerce = Some(coerce);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Try this rule at the start of `input`. Empty matches never count.
    fn apply(&self, input: &str) -> Option<(String, String, TokenValue)> {
        let captures = self.pattern.captures(input)?;
        let whole = captures.get(0)?;
        if whole.as_str().is_empty() {
            return None;
        }

        let text = captures
            .get(1)
            .map(|group| group.as_str())
            .unwrap_or_else(|| whole.as_str());
        let value = match self.coerce {
            Some(coerce) => coerce(text),
            None => TokenValue::Text(text.to_string()),
        };

        Some((text.to_string(), whole.as_str().to_string(), value))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Name of the rule that produced this token.
    pub kind: String,
    /// Capture group 1 when the rule has one, the whole match otherwise.
    pub text: String,
    /// The whole match, exactly as it appeared in the source.
    pub raw: String,
    pub value: TokenValue,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    /// Returns a human-readable description of the token
    pub fn describe(&self) -> String {
        format!("{} {}", self.kind, self.value)
    }
}

/// Split `source` into tokens using `rules` in priority order.
pub fn tokenize(source: &str, rules: &[TokenRule]) -> Result<Vec<Token>, TokenizeError> {
    tracing::debug!(length = source.len(), rules = rules.len(), "tokenizing");

    let mut tokens = Vec::new();
    let mut rest = source;
    let mut line = 1;
    let mut column = 1;

    while !rest.is_empty() {
        let Some((rule, (text, raw, value))) = rules
            .iter()
            .find_map(|rule| rule.apply(rest).map(|matched| (rule, matched)))
        else {
            return Err(unknown_token(rest, line, column));
        };

        let (next_line, next_column) = advance(&raw, line, column);
        rest = &rest[raw.len()..];

        tokens.push(Token {
            kind: rule.name.clone(),
            text,
            raw,
            value,
            line,
            column,
        });

        line = next_line;
        column = next_column;
    }

    Ok(tokens)
}

/// Rebuild the source text a token stream was produced from.
pub fn tokens_to_string(tokens: &[Token]) -> String {
    tokens.iter().map(|token| token.raw.as_str()).collect()
}

fn advance(raw: &str, line: usize, column: usize) -> (usize, usize) {
    let newlines = raw.matches('\n').count();
    if newlines == 0 {
        return (line, column + raw.chars().count());
    }

    let after_last = raw
        .rsplit('\n')
        .next()
        .map(|tail| tail.chars().count())
        .unwrap_or(0);
    (line + newlines, after_last + 1)
}

fn unknown_token(rest: &str, line: usize, column: usize) -> TokenizeError {
    let snippet: String = rest
        .split('\n')
        .next()
        .unwrap_or(rest)
        .chars()
        .take(SNIPPET_LENGTH)
        .collect();

    TokenizeError::UnknownToken {
        snippet,
        line,
        column,
    }
}
