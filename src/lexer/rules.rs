use std::sync::OnceLock;

use super::{TokenRule, TokenValue, TokenizeError};

/// Token kind names produced by [`standard_rules`].
pub mod kind {
    pub const SPACE: &str = "white-space-space";
    pub const ENDLINE: &str = "white-space-endline";
    pub const OTHER_WHITESPACE: &str = "white-space-other";
    pub const NUMBER: &str = "number";
    pub const STRING: &str = "string";
    pub const IDENTIFIER: &str = "identifier";
    pub const SYMBOL: &str = "symbol";
}

fn number_value(text: &str) -> TokenValue {
    text.parse::<f64>()
        .map(TokenValue::Number)
        .unwrap_or_else(|_| TokenValue::Text(text.to_string()))
}

fn build() -> Result<Vec<TokenRule>, TokenizeError> {
    Ok(vec![
        TokenRule::new(kind::SPACE, " +")?,
        TokenRule::new(kind::ENDLINE, r"\n+")?,
        TokenRule::new(kind::OTHER_WHITESPACE, r"\s")?,
        TokenRule::new(kind::NUMBER, r"-?(?:0|[1-9][0-9]*)(?:\.[0-9]+)?")?.with_value(number_value),
        TokenRule::new(kind::STRING, r"`([^`]*)`")?,
        TokenRule::new(kind::IDENTIFIER, r"[A-Za-z_][A-Za-z0-9_]*")?,
        TokenRule::new(kind::SYMBOL, r"[\[\]\(\)\{\}!?&\^\-+*$\\/,.=<>:;%|]")?,
    ])
}

/// The rule set of the expression language, in priority order.
///
/// Numbers come before symbols, so `-1` is a single negative number token
/// while `- 1` is a symbol followed by a number.
pub fn standard_rules() -> Result<&'static [TokenRule], TokenizeError> {
    static RULES: OnceLock<Result<Vec<TokenRule>, TokenizeError>> = OnceLock::new();

    RULES.get_or_init(build).as_deref().map_err(Clone::clone)
}
