use juxt::lexer::{kind, standard_rules, tokenize, tokens_to_string, Token, TokenRule, TokenValue, TokenizeError};

fn lex(source: &str) -> Vec<Token> {
    tokenize(source, standard_rules().expect("standard rules compile")).expect("lexing failed")
}

fn kinds(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(|token| token.kind.as_str()).collect()
}

#[test]
fn lex_let_binding() {
    let tokens = lex("let x = 1");
    assert_eq!(
        kinds(&tokens),
        vec![
            kind::IDENTIFIER,
            kind::SPACE,
            kind::IDENTIFIER,
            kind::SPACE,
            kind::SYMBOL,
            kind::SPACE,
            kind::NUMBER,
        ]
    );
    assert_eq!(tokens[6].value, TokenValue::Number(1.0));
}

#[test]
fn lex_numbers() {
    let tokens = lex("0 -2.5 126.2367");
    let numbers: Vec<f64> = tokens
        .iter()
        .filter(|token| token.is(kind::NUMBER))
        .filter_map(|token| token.value.as_number())
        .collect();
    assert_eq!(numbers, vec![0.0, -2.5, 126.2367]);
}

#[test]
fn lex_string_keeps_contents_and_raw_text() {
    let tokens = lex("`hi there`");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].text, "hi there");
    assert_eq!(tokens[0].raw, "`hi there`");
    assert_eq!(tokens[0].value, TokenValue::Text("hi there".to_string()));
}

#[test]
fn lex_tracks_lines_and_columns() {
    let tokens = lex("a\n  b");
    let b = tokens.last().unwrap();
    assert_eq!(b.text, "b");
    assert_eq!((b.line, b.column), (2, 3));

    let endline = &tokens[1];
    assert_eq!(endline.kind, kind::ENDLINE);
    assert_eq!((endline.line, endline.column), (1, 2));
}

#[test]
fn lex_symbols_are_single_characters() {
    let tokens = lex("==");
    assert_eq!(kinds(&tokens), vec![kind::SYMBOL, kind::SYMBOL]);
}

#[test]
fn earlier_rule_wins_over_longer_match() {
    let rules = vec![
        TokenRule::new("keyword", "let").unwrap(),
        TokenRule::new("word", "[a-z]+").unwrap(),
    ];
    let tokens = tokenize("letter", &rules).unwrap();
    assert_eq!(kinds(&tokens), vec!["keyword", "word"]);
    assert_eq!(tokens[1].text, "ter");

    let reversed = vec![
        TokenRule::new("word", "[a-z]+").unwrap(),
        TokenRule::new("keyword", "let").unwrap(),
    ];
    let tokens = tokenize("letter", &reversed).unwrap();
    assert_eq!(kinds(&tokens), vec!["word"]);
}

#[test]
fn value_coercion() {
    let rules = vec![TokenRule::new("digits", "[0-9]+")
        .unwrap()
        .with_value(|text| TokenValue::Number(text.len() as f64))];
    let tokens = tokenize("12345", &rules).unwrap();
    assert_eq!(tokens[0].value, TokenValue::Number(5.0));
}

#[test]
fn unknown_token_reports_snippet_and_position() {
    let err = tokenize("1 # comment\nnext", standard_rules().unwrap()).unwrap_err();
    assert_eq!(
        err,
        TokenizeError::UnknownToken {
            snippet: "# comment".to_string(),
            line: 1,
            column: 3,
        }
    );
    assert_eq!(err.to_string(), "[1:3] Unknown token at # comment");
}

#[test]
fn unknown_token_snippet_is_truncated() {
    let source = format!("#{}", "x".repeat(100));
    let err = tokenize(&source, standard_rules().unwrap()).unwrap_err();
    match err {
        TokenizeError::UnknownToken { snippet, .. } => assert_eq!(snippet.chars().count(), 50),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn invalid_rule_pattern() {
    let err = TokenRule::new("broken", "(").unwrap_err();
    assert!(matches!(err, TokenizeError::InvalidRule { ref name, .. } if name == "broken"));
}

#[test]
fn tokens_rebuild_source() {
    let source = "let f = (\\x -> x)\n  in f `hello`";
    assert_eq!(tokens_to_string(&lex(source)), source);
}
