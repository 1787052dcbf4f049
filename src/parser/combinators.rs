use std::cell::OnceCell;
use std::ops::{Add, BitOr, Mul, Shr, Sub};
use std::rc::{Rc, Weak};

use crate::lexer::{Token, TokenValue};

use super::state::{ParseError, ParseResult, ParseState, Parser};

type ParserFn<T> = Rc<dyn Fn(&mut ParseState) -> ParseResult<T>>;
type WeakParserFn<T> = Weak<dyn Fn(&mut ParseState) -> ParseResult<T>>;

// === Boxed Parser for type erasure ===

pub struct BoxedParser<T> {
    parser: ParserFn<T>,
}

impl<T> Clone for BoxedParser<T> {
    fn clone(&self) -> Self {
        BoxedParser {
            parser: Rc::clone(&self.parser),
        }
    }
}

impl<T: 'static> BoxedParser<T> {
    pub fn new<P: Parser<T> + 'static>(parser: P) -> Self {
        BoxedParser {
            parser: Rc::new(move |state| parser.parse(state)),
        }
    }
}

impl<T> Parser<T> for BoxedParser<T> {
    fn parse(&self, state: &mut ParseState) -> ParseResult<T> {
        (self.parser)(state)
    }
}

// === Combinators as methods ===
//
// Every combinator that can fail after consuming input runs inside a
// transaction, so a failed parser never leaves a half-consumed state behind.

impl<T: 'static> BoxedParser<T> {
    /// Sequence: parse self then other, return (T, U)
    pub fn seq<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<(T, U)> {
        BoxedParser::new(move |state: &mut ParseState| {
            state.transaction(|state| {
                let a = self.parse(state)?;
                let b = other.parse(state)?;
                Ok((a, b))
            })
        })
    }

    /// Keep left: parse self then other, discard other's result
    pub fn skip<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<T> {
        self.seq(other).map(|(a, _)| a)
    }

    /// Keep right: parse self then other, discard self's result
    pub fn skip_left<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<U> {
        self.seq(other).map(|(_, b)| b)
    }

    /// Map: transform result. The mapping itself cannot fail.
    pub fn map<U: 'static, F: Fn(T) -> U + 'static>(self, f: F) -> BoxedParser<U> {
        BoxedParser::new(move |state: &mut ParseState| {
            let a = self.parse(state)?;
            Ok(f(a))
        })
    }

    /// Choice: try self, if fails try other
    pub fn or(self, other: BoxedParser<T>) -> BoxedParser<T> {
        choice(vec![self, other])
    }

    /// Reject results that fail `predicate`, reporting `expected` at the
    /// position where this parser started.
    pub fn verify<F: Fn(&T) -> bool + 'static>(
        self,
        predicate: F,
        expected: &'static str,
    ) -> BoxedParser<T> {
        BoxedParser::new(move |state: &mut ParseState| {
            let start = state.clone();
            state.transaction(|state| {
                let value = self.parse(state)?;
                if predicate(&value) {
                    Ok(value)
                } else {
                    Err(start.error(expected))
                }
            })
        })
    }

    /// Add a label to this parser for better error messages
    pub fn label(self, name: &'static str) -> BoxedParser<T> {
        BoxedParser::new(move |state: &mut ParseState| {
            self.parse(state).map_err(|err| err.relabel(name))
        })
    }
}

// === Operator Overloading ===

/// `+` for sequence: A + B -> (A, B)
impl<T: 'static, U: 'static> Add<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<(T, U)>;

    fn add(self, rhs: BoxedParser<U>) -> Self::Output {
        self.seq(rhs)
    }
}

/// `-` for keep left: A - B -> A (parse B, discard result)
impl<T: 'static, U: 'static> Sub<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<T>;

    fn sub(self, rhs: BoxedParser<U>) -> Self::Output {
        self.skip(rhs)
    }
}

/// `*` for keep right: A * B -> B (parse A, discard result)
impl<T: 'static, U: 'static> Mul<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<U>;

    fn mul(self, rhs: BoxedParser<U>) -> Self::Output {
        self.skip_left(rhs)
    }
}

/// `|` for choice: A | B -> A or B
impl<T: 'static> BitOr<BoxedParser<T>> for BoxedParser<T> {
    type Output = BoxedParser<T>;

    fn bitor(self, rhs: BoxedParser<T>) -> Self::Output {
        self.or(rhs)
    }
}

/// `>>` for map: A >> fn -> B
impl<T: 'static, U: 'static, F: Fn(T) -> U + 'static> Shr<F> for BoxedParser<T> {
    type Output = BoxedParser<U>;

    fn shr(self, f: F) -> Self::Output {
        self.map(f)
    }
}

// === Primitive Parsers ===

fn token_matching<F: Fn(&Token) -> bool + 'static>(
    predicate: F,
    expected: String,
) -> BoxedParser<Token> {
    BoxedParser::new(move |state: &mut ParseState| match state.peek() {
        Some(tok) if predicate(tok) => state.advance().ok_or_else(|| state.error(&expected)),
        _ => Err(state.error(&expected)),
    })
}

/// Consume one token of the given kind.
pub fn token(kind: &str) -> BoxedParser<Token> {
    let kind = kind.to_string();
    let expected = kind.clone();
    token_matching(move |tok| tok.kind == kind, expected)
}

/// Consume one token of the given kind carrying exactly `value`.
pub fn token_value(kind: &str, value: impl Into<TokenValue>) -> BoxedParser<Token> {
    let kind = kind.to_string();
    let value = value.into();
    let expected = value.to_string();
    token_matching(move |tok| tok.kind == kind && tok.value == value, expected)
}

/// Consume one token of the given kind and yield its value.
pub fn value_of(kind: &str) -> BoxedParser<TokenValue> {
    token(kind) >> |tok: Token| tok.value
}

/// Succeeds without consuming anything.
pub fn nothing() -> BoxedParser<()> {
    BoxedParser::new(|_: &mut ParseState| Ok(()))
}

/// Succeeds only when every token has been consumed.
pub fn eof() -> BoxedParser<()> {
    BoxedParser::new(|state: &mut ParseState| {
        if state.has_next() {
            Err(state.error("EOF"))
        } else {
            Ok(())
        }
    })
}

/// Defer building a parser until it runs. The parser is rebuilt on every
/// run; large recursive rules should use [`recursive`] instead.
pub fn lazy<T: 'static, F: Fn() -> BoxedParser<T> + 'static>(build: F) -> BoxedParser<T> {
    BoxedParser::new(move |state: &mut ParseState| build().parse(state))
}

/// Build a self-referencing parser once.
///
/// `build` receives a handle that runs the parser being built. The handle
/// holds only a weak reference, so the finished parser owns itself without
/// a reference cycle; a handle that outlives it fails.
pub fn recursive<T: 'static, F: FnOnce(BoxedParser<T>) -> BoxedParser<T>>(
    build: F,
) -> BoxedParser<T> {
    let slot: Rc<OnceCell<WeakParserFn<T>>> = Rc::new(OnceCell::new());
    let handle = {
        let slot = Rc::clone(&slot);
        BoxedParser::new(move |state: &mut ParseState| {
            match slot.get().and_then(Weak::upgrade) {
                Some(parser) => parser(state),
                None => Err(ParseError::fatal(state, "a live recursive parser")),
            }
        })
    };

    let parser = build(handle);
    // the slot is fresh, so this is its only initialization
    let _ = slot.set(Rc::downgrade(&parser.parser));
    parser
}

/// Count `parser` as one nesting level. Going deeper than `limit` levels is
/// a fatal error rather than unbounded recursion.
pub fn nested<T: 'static>(limit: usize, parser: BoxedParser<T>) -> BoxedParser<T> {
    BoxedParser::new(move |state: &mut ParseState| state.nest(limit, &parser))
}

// === Structural combinators ===

/// Run all parsers in order. Either all of them succeed or the state is
/// left untouched.
pub fn sequence<T: 'static>(parsers: Vec<BoxedParser<T>>) -> BoxedParser<Vec<T>> {
    BoxedParser::new(move |state: &mut ParseState| {
        state.transaction(|state| parsers.iter().map(|parser| parser.parse(state)).collect())
    })
}

/// Ordered choice with backtracking.
///
/// Each alternative runs against its own copy of the state and the first
/// success is committed. If every alternative fails, the failures that got
/// furthest (fewest tokens left) win; their alternatives are deduplicated
/// and joined as `"a, b or c"`, anchored at the first of them. When a later
/// alternative succeeds, the furthest earlier failure is remembered for
/// error reporting. A fatal failure ends the choice at once.
pub fn choice<T: 'static>(parsers: Vec<BoxedParser<T>>) -> BoxedParser<T> {
    BoxedParser::new(move |state: &mut ParseState| {
        if let [only] = parsers.as_slice() {
            return only.parse(state);
        }

        let mut errors = Vec::with_capacity(parsers.len());
        for parser in &parsers {
            match state.attempt(parser) {
                Ok(value) => {
                    if let Some(err) = deepest_error(errors) {
                        state.remember(err);
                    }
                    return Ok(value);
                }
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    tracing::trace!(
                        expected = err.expected(),
                        remaining = err.remaining(),
                        "alternative failed"
                    );
                    errors.push(err);
                }
            }
        }

        Err(deepest_error(errors).unwrap_or_else(|| state.error("nothing")))
    })
}

fn deepest_error(errors: Vec<ParseError>) -> Option<ParseError> {
    let fewest = errors.iter().map(ParseError::remaining).min()?;
    let mut deepest = errors.into_iter().filter(|err| err.remaining() == fewest);
    let first = deepest.next()?;
    Some(deepest.fold(first, ParseError::merge))
}

/// Repeat a parser until it fails.
///
/// With `may_be_empty == false`, failing on the very first attempt
/// propagates that failure instead of yielding an empty list. The failure
/// that ends the repetition is remembered, so a later error can report it
/// when it got further.
pub fn repeat<T: 'static>(parser: BoxedParser<T>, may_be_empty: bool) -> BoxedParser<Vec<T>> {
    BoxedParser::new(move |state: &mut ParseState| {
        let mut results = Vec::new();
        loop {
            let before = state.position();
            let item = if results.is_empty() && !may_be_empty {
                state.attempt(&parser)?
            } else {
                match state.maybe(&parser)? {
                    Some(item) => item,
                    None => break,
                }
            };
            results.push(item);
            // a parser that consumes nothing would match forever
            if state.position() == before {
                break;
            }
        }
        Ok(results)
    })
}

/// Parse zero or more occurrences
pub fn many<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<Vec<T>> {
    repeat(parser, true)
}

/// Parse one or more occurrences
pub fn many1<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<Vec<T>> {
    repeat(parser, false)
}

/// Optional: parse zero or one
pub fn optional<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<Option<T>> {
    BoxedParser::new(move |state: &mut ParseState| state.maybe(&parser))
}

/// `open inner close`, yielding only the inner result.
pub fn group<T: 'static, O: 'static, C: 'static>(
    inner: BoxedParser<T>,
    open: BoxedParser<O>,
    close: BoxedParser<C>,
) -> BoxedParser<T> {
    open * inner - close
}

/// An entry of a list parsed with its delimiters kept.
#[derive(Debug, Clone, PartialEq)]
pub enum Interleaved<T, D> {
    Item(T),
    Delimiter(D),
}

/// `open (element (delimiter element)*)? close`, keeping the delimiters.
///
/// Once a delimiter has been consumed an element must follow.
pub fn list_with_delimiters<T: 'static, D: 'static, O: 'static, C: 'static>(
    element: BoxedParser<T>,
    delimiter: BoxedParser<D>,
    open: BoxedParser<O>,
    close: BoxedParser<C>,
    may_be_empty: bool,
) -> BoxedParser<Vec<Interleaved<T, D>>> {
    let body = BoxedParser::new(move |state: &mut ParseState| {
        let mut items = Vec::new();

        if may_be_empty {
            match state.maybe(&element)? {
                Some(first) => items.push(Interleaved::Item(first)),
                None => return Ok(items),
            }
        } else {
            items.push(Interleaved::Item(element.parse(state)?));
        }

        while let Some(delim) = state.maybe(&delimiter)? {
            items.push(Interleaved::Delimiter(delim));
            items.push(Interleaved::Item(element.parse(state)?));
        }

        Ok(items)
    });

    group(body, open, close)
}

/// `open (element (delimiter element)*)? close`, keeping only the elements.
pub fn list<T: 'static, D: 'static, O: 'static, C: 'static>(
    element: BoxedParser<T>,
    delimiter: BoxedParser<D>,
    open: BoxedParser<O>,
    close: BoxedParser<C>,
    may_be_empty: bool,
) -> BoxedParser<Vec<T>> {
    list_with_delimiters(element, delimiter, open, close, may_be_empty).map(|items| {
        items
            .into_iter()
            .filter_map(|item| match item {
                Interleaved::Item(value) => Some(value),
                Interleaved::Delimiter(_) => None,
            })
            .collect()
    })
}

// === Binary operators ===

type BuildFn<T> = Rc<dyn Fn(T, T, T) -> T>;

/// One entry of an operator table for [`binary`].
pub struct BinaryOperator<T> {
    /// Higher values bind looser: the highest precedence present becomes
    /// the root of the folded tree.
    pub precedence: u32,
    pub operator: BoxedParser<T>,
    build: BuildFn<T>,
}

impl<T> Clone for BinaryOperator<T> {
    fn clone(&self) -> Self {
        Self {
            precedence: self.precedence,
            operator: self.operator.clone(),
            build: Rc::clone(&self.build),
        }
    }
}

impl<T: 'static> BinaryOperator<T> {
    /// `build(lhs, rhs, operator)` combines two operands.
    pub fn new<F: Fn(T, T, T) -> T + 'static>(
        precedence: u32,
        operator: BoxedParser<T>,
        build: F,
    ) -> Self {
        Self {
            precedence,
            operator,
            build: Rc::new(build),
        }
    }
}

/// Parse `operand (operator operand)*` and fold it into a tree.
///
/// The fold picks the highest precedence value in the flat list, splits at
/// its rightmost occurrence and recurses into both halves. Equal
/// precedences therefore nest to the left: `a - b - c` folds as
/// `(a - b) - c`. Without any operator the single operand is returned.
pub fn binary<T: 'static>(
    operand: BoxedParser<T>,
    operators: Vec<BinaryOperator<T>>,
) -> BoxedParser<T> {
    let table: Rc<[BinaryOperator<T>]> = operators.into();
    let tagged = choice(
        table
            .iter()
            .enumerate()
            .map(|(index, op)| op.operator.clone() >> move |parsed: T| (index, parsed))
            .collect(),
    );

    BoxedParser::new(move |state: &mut ParseState| {
        state.transaction(|state| {
            let first = operand.parse(state)?;
            let mut rest = Vec::new();
            // an operator commits the chain to another operand
            while let Some((index, operator)) = state.maybe(&tagged)? {
                let rhs = operand.parse(state)?;
                rest.push((index, operator, rhs));
            }
            Ok(fold_binary(first, rest, &table))
        })
    })
}

fn fold_binary<T>(first: T, mut rest: Vec<(usize, T, T)>, table: &[BinaryOperator<T>]) -> T {
    let Some(highest) = rest.iter().map(|(index, _, _)| table[*index].precedence).max() else {
        return first;
    };
    let Some(split) = rest
        .iter()
        .rposition(|(index, _, _)| table[*index].precedence == highest)
    else {
        return first;
    };

    let right = rest.split_off(split + 1);
    let Some((index, operator, pivot)) = rest.pop() else {
        return first;
    };

    let lhs = fold_binary(first, rest, table);
    let rhs = fold_binary(pivot, right, table);
    (table[index].build)(lhs, rhs, operator)
}

// === History ===

/// Record `label` as a history node around `parser`, whether it succeeds
/// or not.
pub fn add_history<T: 'static>(label: &'static str, parser: BoxedParser<T>) -> BoxedParser<T> {
    BoxedParser::new(move |state: &mut ParseState| {
        state.history_mut().enter(label);
        let result = parser.parse(state);
        state.history_mut().leave();
        result
    })
}

/// Like [`add_history`], but when `keep` rejects the result the node is
/// dropped and its children are handed to the enclosing rule.
pub fn add_history_when<T: 'static, F: Fn(&T) -> bool + 'static>(
    label: &'static str,
    parser: BoxedParser<T>,
    keep: F,
) -> BoxedParser<T> {
    BoxedParser::new(move |state: &mut ParseState| {
        state.history_mut().enter(label);
        let result = parser.parse(state);
        match &result {
            Ok(value) if !keep(value) => state.history_mut().leave_spliced(),
            _ => state.history_mut().leave(),
        }
        result
    })
}

/// Record a leaf in the history under the rule currently being parsed.
pub fn note_history(state: &mut ParseState, label: impl Into<String>) {
    state.history_mut().note(label);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_single_operand() {
        let table: Vec<BinaryOperator<String>> = vec![];
        assert_eq!(fold_binary("x".to_string(), vec![], &table), "x");
    }

    fn table() -> Vec<BinaryOperator<String>> {
        let build = |l: String, r: String, op: String| format!("({l}{op}{r})");
        vec![
            BinaryOperator::new(1, nothing() >> |_: ()| String::new(), build),
            BinaryOperator::new(2, nothing() >> |_: ()| String::new(), build),
        ]
    }

    fn s(text: &str) -> String {
        text.to_string()
    }

    #[test]
    fn test_fold_equal_precedence_nests_left() {
        let rest = vec![(1, s("-"), s("b")), (1, s("-"), s("c"))];
        assert_eq!(fold_binary(s("a"), rest, &table()), "((a-b)-c)");
    }

    #[test]
    fn test_fold_highest_value_becomes_root() {
        let rest = vec![(0, s("*"), s("b")), (1, s("+"), s("c")), (0, s("*"), s("d"))];
        assert_eq!(fold_binary(s("a"), rest, &table()), "((a*b)+(c*d))");
    }

    #[test]
    fn test_fold_splits_at_rightmost_highest() {
        let rest = vec![
            (1, s("+"), s("b")),
            (0, s("*"), s("c")),
            (1, s("+"), s("d")),
        ];
        assert_eq!(fold_binary(s("a"), rest, &table()), "((a+(b*c))+d)");
    }
}
