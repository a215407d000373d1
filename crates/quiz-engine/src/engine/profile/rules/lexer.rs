use super::RuleError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Number(f64),
    Ident(String),
    Symbol(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

/// Operator symbols, longest first so `>=` wins over `>`.
const SYMBOLS: &[&str] = &[
    "&&", "||", "==", "!=", "<=", ">=", "+", "-", "*", "/", "<", ">", "(", ")",
];

pub(crate) fn tokenize(source: &str) -> Result<Vec<Token>, RuleError> {
    let mut tokens = Vec::new();
    let mut rest = source;
    let mut position = 0;

    while let Some(ch) = rest.chars().next() {
        if ch.is_whitespace() {
            let width = ch.len_utf8();
            rest = &rest[width..];
            position += width;
            continue;
        }

        let (kind, width) = if ch.is_ascii_digit() || ch == '.' {
            let width = rest
                .find(|c: char| !(c.is_ascii_digit() || c == '.'))
                .unwrap_or(rest.len());
            let literal = &rest[..width];
            let value = literal
                .parse::<f64>()
                .map_err(|_| RuleError::InvalidNumber {
                    literal: literal.to_string(),
                    position,
                })?;
            (TokenKind::Number(value), width)
        } else if ch.is_ascii_alphabetic() || ch == '_' {
            let width = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(rest.len());
            (TokenKind::Ident(rest[..width].to_string()), width)
        } else if let Some(symbol) = SYMBOLS.iter().find(|symbol| rest.starts_with(**symbol)) {
            (TokenKind::Symbol(*symbol), symbol.len())
        } else {
            return Err(RuleError::UnexpectedCharacter { ch, position });
        };

        tokens.push(Token { kind, position });
        rest = &rest[width..];
        position += width;
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .expect("source tokenizes")
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn prefers_two_character_operators() {
        assert_eq!(
            kinds("plan>=spont"),
            vec![
                TokenKind::Ident("plan".to_string()),
                TokenKind::Symbol(">="),
                TokenKind::Ident("spont".to_string()),
            ]
        );
    }

    #[test]
    fn reads_decimal_literals_and_positions() {
        let tokens = tokenize("  1.5 + x_2").expect("tokenizes");
        assert_eq!(tokens[0].kind, TokenKind::Number(1.5));
        assert_eq!(tokens[0].position, 2);
        assert_eq!(tokens[1].kind, TokenKind::Symbol("+"));
        assert_eq!(tokens[2].kind, TokenKind::Ident("x_2".to_string()));
    }

    #[test]
    fn rejects_stray_characters() {
        assert_eq!(
            tokenize("plan & spont"),
            Err(RuleError::UnexpectedCharacter { ch: '&', position: 5 })
        );
        assert!(matches!(
            tokenize("1.2.3 > plan"),
            Err(RuleError::InvalidNumber { .. })
        ));
    }
}
