use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::lexer::Token;

use super::history::{HistoryNode, HistoryStack};

/// A failed parse attempt.
///
/// The error owns a snapshot of the parser state at the point of failure.
/// The snapshot is never modified afterwards; `choice` compares snapshots
/// of competing alternatives to find the one that got furthest.
///
/// A fatal error stops backtracking: no alternative is tried after it and
/// repetitions propagate it instead of ending quietly.
#[derive(Debug, Clone)]
pub struct ParseError {
    expected: Vec<String>,
    snapshot: ParseState,
    fatal: bool,
}

impl ParseError {
    pub fn new(state: &ParseState, expected: impl Into<String>) -> Self {
        Self {
            expected: vec![expected.into()],
            snapshot: state.clone(),
            fatal: false,
        }
    }

    /// An error that no alternative may recover from.
    pub fn fatal(state: &ParseState, expected: impl Into<String>) -> Self {
        Self {
            fatal: true,
            ..Self::new(state, expected)
        }
    }

    /// Same failure point, different description. Fatal errors keep theirs.
    pub fn relabel(self, expected: impl Into<String>) -> Self {
        if self.fatal {
            return self;
        }
        Self {
            expected: vec![expected.into()],
            ..self
        }
    }

    /// Add the alternatives of `other` that this error does not list yet.
    pub fn merge(mut self, other: ParseError) -> Self {
        for label in other.expected {
            if !self.expected.contains(&label) {
                self.expected.push(label);
            }
        }
        self
    }

    /// What the parser was looking for, joined as `"a, b or c"`.
    pub fn expected(&self) -> String {
        join_alternatives(&self.expected)
    }

    /// The individual alternatives behind [`ParseError::expected`].
    pub fn alternatives(&self) -> &[String] {
        &self.expected
    }

    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    /// The state the parser was in when it gave up.
    pub fn snapshot(&self) -> &ParseState {
        &self.snapshot
    }

    /// Number of tokens left unconsumed at the failure point.
    pub fn remaining(&self) -> usize {
        self.snapshot.remaining()
    }

    /// The token the parser stumbled over, `None` at end of input.
    pub fn found(&self) -> Option<&Token> {
        self.snapshot.peek()
    }
}

fn join_alternatives(expected: &[String]) -> String {
    match expected.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, init)) => format!("{} or {}", init.join(", "), last),
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.found() {
            Some(token) => write!(
                f,
                "[{}:{}] Unexpected {} expected {}",
                token.line,
                token.column,
                token.describe(),
                self.expected()
            ),
            None => write!(f, "Unexpected EOF expected {}", self.expected()),
        }
    }
}

impl std::error::Error for ParseError {}

pub type ParseResult<T> = Result<T, ParseError>;

/// The state of one in-flight parse: the token stream, how far into it we
/// are, and the diagnostic history recorded so far.
///
/// Cloning is cheap. The token slice is shared and the history uses
/// persistent vectors, which is what makes clone-then-commit backtracking
/// affordable.
#[derive(Debug, Clone)]
pub struct ParseState {
    tokens: Arc<[Token]>,
    index: usize,
    depth: usize,
    furthest: Option<Rc<ParseError>>,
    history: HistoryStack,
}

impl ParseState {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into(),
            index: 0,
            depth: 0,
            furthest: None,
            history: HistoryStack::new(),
        }
    }

    pub fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned()?;
        self.index += 1;
        Some(token)
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    pub fn has_next(&self) -> bool {
        self.index < self.tokens.len()
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn remaining(&self) -> usize {
        self.tokens.len().saturating_sub(self.index)
    }

    /// Build an error anchored at the current position.
    ///
    /// A failure swallowed earlier on this path that got further than the
    /// current position is reported in its place.
    pub fn error(&self, expected: impl Into<String>) -> ParseError {
        match &self.furthest {
            Some(furthest) if furthest.remaining() < self.remaining() => (**furthest).clone(),
            _ => ParseError::new(self, expected),
        }
    }

    /// Run `body` against a copy of this state and commit the copy only if it
    /// succeeds. On failure `self` is left exactly as it was.
    pub fn transaction<T>(
        &mut self,
        body: impl FnOnce(&mut ParseState) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let mut trial = self.clone();
        let result = body(&mut trial)?;
        *self = trial;
        Ok(result)
    }

    pub fn attempt<T>(&mut self, parser: &impl Parser<T>) -> ParseResult<T> {
        self.transaction(|trial| parser.parse(trial))
    }

    /// Like [`ParseState::attempt`], for callers that carry on without the
    /// result. The failure is remembered for later error reports, and only
    /// fatal failures are returned.
    pub fn maybe<T>(&mut self, parser: &impl Parser<T>) -> ParseResult<Option<T>> {
        match self.attempt(parser) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_fatal() => Err(err),
            Err(err) => {
                self.remember(err);
                Ok(None)
            }
        }
    }

    /// Keep `err` for later reports if it got further than anything so far.
    pub(crate) fn remember(&mut self, err: ParseError) {
        let deeper = self
            .furthest
            .as_ref()
            .map_or(true, |furthest| err.remaining() < furthest.remaining());
        if deeper {
            self.furthest = Some(Rc::new(err));
        }
    }

    /// Run `parser` one nesting level deeper, failing fatally beyond `limit`.
    pub fn nest<T>(&mut self, limit: usize, parser: &impl Parser<T>) -> ParseResult<T> {
        if self.depth >= limit {
            return Err(ParseError::fatal(
                self,
                format!("at most {limit} levels of nesting"),
            ));
        }
        self.depth += 1;
        let result = parser.parse(self);
        self.depth -= 1;
        result
    }

    pub(crate) fn history_mut(&mut self) -> &mut HistoryStack {
        &mut self.history
    }

    /// The history tree recorded so far, rooted at `root`.
    pub fn history(&self) -> HistoryNode {
        self.history.snapshot()
    }
}

pub trait Parser<T> {
    fn parse(&self, state: &mut ParseState) -> ParseResult<T>;
}

impl<T, F: Fn(&mut ParseState) -> ParseResult<T>> Parser<T> for F {
    fn parse(&self, state: &mut ParseState) -> ParseResult<T> {
        self(state)
    }
}
