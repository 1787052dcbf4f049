use juxt::lexer::{kind, standard_rules, tokenize, Token, TokenValue};
use juxt::parser::{
    add_history, binary, choice, eof, group, lazy, list, list_with_delimiters, many, nested,
    nothing, optional, parse_tokens, recursive, repeat, sequence, symbol, token, value_of,
    BinaryOperator, BoxedParser, Interleaved, ParseError, ParseState, Parser,
};

fn lex(source: &str) -> Vec<Token> {
    tokenize(source, standard_rules().unwrap()).unwrap()
}

fn parse_state(source: &str) -> ParseState {
    ParseState::new(lex(source))
}

fn number() -> BoxedParser<f64> {
    value_of(kind::NUMBER) >> |value: TokenValue| value.as_number().unwrap_or(f64::NAN)
}

#[test]
fn token_reports_kind_when_missing() {
    let mut state = parse_state("+");
    let err = token(kind::NUMBER).parse(&mut state).unwrap_err();
    assert_eq!(err.expected(), "number");
    assert_eq!(err.to_string(), "[1:1] Unexpected symbol + expected number");
    assert_eq!(state.position(), 0);
}

#[test]
fn token_at_end_of_input() {
    let mut state = ParseState::new(vec![]);
    let err = symbol(")").parse(&mut state).unwrap_err();
    assert_eq!(err.to_string(), "Unexpected EOF expected )");
    assert!(err.found().is_none());
}

#[test]
fn deepest_failure_wins() {
    // "+-*/%!" is six single-symbol tokens
    let shallow = sequence(vec![symbol("+"), symbol("-"), symbol("x")]);
    let deep = sequence(vec![
        symbol("+"),
        symbol("-"),
        symbol("*"),
        symbol("/"),
        symbol("%"),
        symbol("?"),
    ]);

    for alternatives in [
        vec![shallow.clone(), deep.clone()],
        vec![deep.clone(), shallow.clone()],
    ] {
        let mut state = parse_state("+-*/%!");
        let err = choice(alternatives).parse(&mut state).unwrap_err();
        assert_eq!(err.expected(), "?");
        assert_eq!(err.remaining(), 1);
        assert_eq!(err.to_string(), "[1:6] Unexpected symbol ! expected ?");
        assert_eq!(state.position(), 0);
    }
}

#[test]
fn equally_deep_failures_are_joined() {
    let mut state = parse_state("+");
    let parser = choice(vec![symbol("a"), symbol("b"), symbol("a"), symbol("c")]);
    let err = parser.parse(&mut state).unwrap_err();
    assert_eq!(err.expected(), "a, b or c");
    assert_eq!(err.to_string(), "[1:1] Unexpected symbol + expected a, b or c");
}

#[test]
fn nested_alternatives_are_flattened() {
    let mut state = parse_state("+");
    let inner = choice(vec![symbol("a"), symbol("b")]);
    let parser = choice(vec![inner, symbol("c"), symbol("b")]);
    let err = parser.parse(&mut state).unwrap_err();
    assert_eq!(err.alternatives(), ["a", "b", "c"]);
    assert_eq!(err.expected(), "a, b or c");
}

fn halt() -> BoxedParser<Token> {
    BoxedParser::new(|state: &mut ParseState| Err(ParseError::fatal(state, "halt")))
}

#[test]
fn fatal_failure_stops_backtracking() {
    let mut state = parse_state("+");

    let err = choice(vec![halt(), symbol("+")]).parse(&mut state).unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(err.expected(), "halt");

    assert!(many(halt()).parse(&mut state).is_err());
    assert!(optional(halt()).parse(&mut state).is_err());
    assert!((halt() | symbol("+")).label("plus").parse(&mut state).is_err());
    assert_eq!(state.position(), 0);
}

#[test]
fn repetition_reports_its_deepest_failure() {
    let parser = many(symbol("+") - symbol("-")) - eof();
    let err = parse_tokens(&parser, lex("+-+*")).unwrap_err();
    assert_eq!(err.message, "[1:4] Unexpected symbol * expected -");

    let parser = optional(symbol("+") - symbol("-")) - eof();
    let err = parse_tokens(&parser, lex("+*")).unwrap_err();
    assert_eq!(err.expected, "-");
}

#[test]
fn first_success_is_committed() {
    let mut state = parse_state("+-");
    let parser = choice(vec![
        sequence(vec![symbol("+"), symbol("*")]),
        sequence(vec![symbol("+")]),
        sequence(vec![symbol("+"), symbol("-")]),
    ]);
    let matched = parser.parse(&mut state).unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(state.position(), 1);
}

#[test]
fn failed_sequence_leaves_state_untouched() {
    let mut state = parse_state("+-");
    let result = sequence(vec![symbol("+"), symbol("x")]).parse(&mut state);
    assert!(result.is_err());
    assert_eq!(state.position(), 0);
}

#[test]
fn operators_sequence_and_skip() {
    let mut state = parse_state("(1)");
    let parser = symbol("(") * number() - symbol(")");
    assert_eq!(parser.parse(&mut state).unwrap(), 1.0);
    assert!(!state.has_next());

    let mut state = parse_state("1,2");
    let pair = number() + (symbol(",") * number());
    assert_eq!(pair.parse(&mut state).unwrap(), (1.0, 2.0));
}

#[test]
fn repeat_until_failure() {
    let mut state = parse_state("++-");
    let plus = repeat(symbol("+"), true).parse(&mut state).unwrap();
    assert_eq!(plus.len(), 2);
    assert_eq!(state.position(), 2);

    let err = repeat(symbol("*"), false).parse(&mut state).unwrap_err();
    assert_eq!(err.expected(), "*");
    assert_eq!(state.position(), 2);

    let none = many(symbol("*")).parse(&mut state).unwrap();
    assert!(none.is_empty());
}

#[test]
fn repeat_stops_on_empty_success() {
    let mut state = parse_state("+");
    let results = repeat(nothing(), true).parse(&mut state).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(state.position(), 0);
}

#[test]
fn optional_never_fails() {
    let mut state = parse_state("+");
    assert_eq!(optional(symbol("-")).parse(&mut state).unwrap(), None);
    assert!(optional(symbol("+")).parse(&mut state).unwrap().is_some());
}

#[test]
fn verify_rejects_at_start() {
    let mut state = parse_state("2");
    let one = number().verify(|n: &f64| *n == 1.0, "one");
    let err = one.parse(&mut state).unwrap_err();
    assert_eq!(err.to_string(), "[1:1] Unexpected number 2 expected one");
    assert_eq!(state.position(), 0);
}

#[test]
fn label_renames_expectation() {
    let mut state = parse_state("+");
    let err = number().label("operand").parse(&mut state).unwrap_err();
    assert_eq!(err.expected(), "operand");
}

#[test]
fn group_returns_inner() {
    let parser = group(value_of(kind::IDENTIFIER), symbol("("), symbol(")"));
    let value = parse_tokens(&parser, lex("(x)")).unwrap();
    assert_eq!(value, TokenValue::Text("x".to_string()));
}

fn numbers(may_be_empty: bool) -> BoxedParser<Vec<f64>> {
    list(number(), symbol(","), symbol("["), symbol("]"), may_be_empty)
}

#[test]
fn list_of_elements() {
    assert_eq!(
        parse_tokens(&numbers(false), lex("[1,2,3]")).unwrap(),
        vec![1.0, 2.0, 3.0]
    );
    assert_eq!(parse_tokens(&numbers(true), lex("[]")).unwrap(), vec![]);
    assert!(parse_tokens(&numbers(false), lex("[]")).is_err());
}

#[test]
fn list_requires_element_after_delimiter() {
    let err = parse_tokens(&numbers(true), lex("[1,]")).unwrap_err();
    assert_eq!(err.expected, "number");
    assert_eq!((err.line, err.column), (Some(1), Some(4)));
}

#[test]
fn list_can_keep_delimiters() {
    let parser = list_with_delimiters(
        number(),
        symbol(",") >> |token: Token| token.text,
        symbol("["),
        symbol("]"),
        false,
    );
    let items = parse_tokens(&parser, lex("[1,2]")).unwrap();
    assert_eq!(
        items,
        vec![
            Interleaved::Item(1.0),
            Interleaved::Delimiter(",".to_string()),
            Interleaved::Item(2.0),
        ]
    );
}

#[test]
fn eof_requires_empty_input() {
    assert!(parse_tokens(&eof(), vec![]).is_ok());

    let err = parse_tokens(&eof(), lex("+")).unwrap_err();
    assert_eq!(err.message, "[1:1] Unexpected symbol + expected EOF");
}

fn arithmetic() -> BoxedParser<String> {
    let operand = number() >> |n: f64| n.to_string();
    let build = |lhs: String, rhs: String, op: String| format!("({lhs}{op}{rhs})");
    let operator = |text: &'static str| symbol(text) >> |token: Token| token.text;
    binary(
        operand,
        vec![
            BinaryOperator::new(1, operator("*"), build),
            BinaryOperator::new(2, operator("+"), build),
        ],
    )
}

#[test]
fn binary_folds_by_precedence() {
    let folded = parse_tokens(&arithmetic(), lex("1+2*3+4")).unwrap();
    assert_eq!(folded, "((1+(2*3))+4)");

    let folded = parse_tokens(&arithmetic(), lex("1*2+3*4")).unwrap();
    assert_eq!(folded, "((1*2)+(3*4))");
}

#[test]
fn binary_equal_precedence_nests_left() {
    let folded = parse_tokens(&arithmetic(), lex("1+2+3")).unwrap();
    assert_eq!(folded, "((1+2)+3)");
}

#[test]
fn binary_single_operand() {
    assert_eq!(parse_tokens(&arithmetic(), lex("7")).unwrap(), "7");
}

#[test]
fn binary_requires_operand_after_operator() {
    let mut state = parse_state("1+2+");
    assert!(arithmetic().parse(&mut state).is_err());
    assert_eq!(state.position(), 0);
}

#[test]
fn history_records_nested_rules() {
    let mut state = parse_state("+");
    add_history("outer", add_history("inner", symbol("+")))
        .parse(&mut state)
        .unwrap();
    assert_eq!(state.history().to_flat_string(), "root(outer(inner))");
}

#[test]
fn history_of_discarded_alternatives_is_dropped() {
    let mut state = parse_state("+");
    let parser = choice(vec![
        add_history("first", symbol("x")),
        add_history("second", symbol("+")),
    ]);
    parser.parse(&mut state).unwrap();
    assert_eq!(state.history().to_flat_string(), "root(second)");
}

#[test]
fn history_is_recorded_on_failure() {
    let mut state = parse_state("+");
    assert!(add_history("failed", symbol("x")).parse(&mut state).is_err());
    assert_eq!(state.history().to_flat_string(), "root(failed)");
}

/// Counts balanced parentheses: "(())" is 2.
fn depth_of(parens: BoxedParser<usize>) -> BoxedParser<usize> {
    choice(vec![
        group(parens, symbol("("), symbol(")")) >> |depth: usize| depth + 1,
        nothing() >> |_: ()| 0,
    ])
}

#[test]
fn lazy_defers_construction() {
    fn parens() -> BoxedParser<usize> {
        depth_of(lazy(parens))
    }
    let mut state = parse_state("(())");
    assert_eq!(parens().parse(&mut state).unwrap(), 2);
    assert!(!state.has_next());
}

#[test]
fn recursive_parser_refers_to_itself() {
    let parens = recursive(depth_of);
    let mut state = parse_state("((()))");
    assert_eq!(parens.parse(&mut state).unwrap(), 3);
    assert!(!state.has_next());

    let err = parse_tokens(&(parens - eof()), lex("(()")).unwrap_err();
    assert_eq!(err.message, "Unexpected EOF expected )");
}

#[test]
fn nesting_beyond_limit_is_fatal() {
    let parens = recursive(|parens| depth_of(nested(2, parens)));

    let mut state = parse_state("(())");
    assert_eq!(parens.parse(&mut state).unwrap(), 2);

    let mut state = parse_state("((()))");
    let err = parens.parse(&mut state).unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(err.expected(), "at most 2 levels of nesting");
    assert_eq!(
        err.to_string(),
        "[1:4] Unexpected symbol ) expected at most 2 levels of nesting"
    );
    assert_eq!(state.position(), 0);
}
