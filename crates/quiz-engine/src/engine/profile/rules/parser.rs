//! Precedence-climbing parser. Binding strength, loosest first:
//! `||`, `&&`, `== !=`, `< <= > >=`, `+ -`, `* /`, unary `-`.

use super::lexer::{Token, TokenKind};
use super::{BinaryOp, Expr, RuleError};

/// Deepest nesting of parentheses and unary minus a rule may use.
pub(crate) const MAX_NESTING: usize = 64;

/// Longest rule, in tokens. Caps the depth of long operator chains, which
/// parse iteratively but still build a left-leaning tree.
pub(crate) const MAX_TOKENS: usize = 1024;

pub(crate) struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
    depth: usize,
}

impl Parser {
    pub(crate) fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            cursor: 0,
            depth: 0,
        }
    }

    pub(crate) fn parse(mut self) -> Result<Expr, RuleError> {
        if self.tokens.is_empty() {
            return Err(RuleError::Empty);
        }
        if self.tokens.len() > MAX_TOKENS {
            return Err(RuleError::TooLong {
                tokens: self.tokens.len(),
                limit: MAX_TOKENS,
            });
        }
        let expr = self.binary(0)?;
        if self.cursor < self.tokens.len() {
            return Err(self.unexpected_here());
        }
        Ok(expr)
    }

    fn binary(&mut self, level: usize) -> Result<Expr, RuleError> {
        let Some(operators) = LEVELS.get(level) else {
            return self.unary();
        };

        let mut lhs = self.binary(level + 1)?;
        while let Some(op) = self.peek_operator(operators) {
            self.cursor += 1;
            let rhs = self.binary(level + 1)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, RuleError> {
        if self.eat_symbol("-") {
            let operand = self.nested(Self::unary)?;
            return Ok(Expr::Negate(Box::new(operand)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, RuleError> {
        if self.eat_symbol("(") {
            let inner = self.nested(|parser| parser.binary(0))?;
            if self.eat_symbol(")") {
                return Ok(inner);
            }
            return Err(self.unexpected_here());
        }

        let token = self.tokens.get(self.cursor).ok_or(RuleError::UnexpectedEnd)?;
        let expr = match &token.kind {
            TokenKind::Number(value) => Expr::Literal(*value),
            TokenKind::Ident(name) => Expr::AxisRef(name.clone()),
            TokenKind::Symbol(_) => return Err(unexpected(token)),
        };
        self.cursor += 1;
        Ok(expr)
    }

    fn nested(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<Expr, RuleError>,
    ) -> Result<Expr, RuleError> {
        if self.depth >= MAX_NESTING {
            return Err(RuleError::TooDeep { limit: MAX_NESTING });
        }
        self.depth += 1;
        let expr = parse(self);
        self.depth -= 1;
        expr
    }

    fn unexpected_here(&self) -> RuleError {
        match self.tokens.get(self.cursor) {
            Some(token) => unexpected(token),
            None => RuleError::UnexpectedEnd,
        }
    }

    fn peek_operator(&self, operators: &[(&str, BinaryOp)]) -> Option<BinaryOp> {
        let token = self.tokens.get(self.cursor)?;
        let TokenKind::Symbol(symbol) = &token.kind else {
            return None;
        };
        operators
            .iter()
            .find(|(candidate, _)| candidate == symbol)
            .map(|(_, op)| *op)
    }

    fn eat_symbol(&mut self, expected: &str) -> bool {
        match self.tokens.get(self.cursor) {
            Some(Token {
                kind: TokenKind::Symbol(symbol),
                ..
            }) if *symbol == expected => {
                self.cursor += 1;
                true
            }
            _ => false,
        }
    }
}

const LEVELS: &[&[(&str, BinaryOp)]] = &[
    &[("||", BinaryOp::Or)],
    &[("&&", BinaryOp::And)],
    &[("==", BinaryOp::Eq), ("!=", BinaryOp::Ne)],
    &[
        ("<", BinaryOp::Lt),
        ("<=", BinaryOp::Le),
        (">", BinaryOp::Gt),
        (">=", BinaryOp::Ge),
    ],
    &[("+", BinaryOp::Add), ("-", BinaryOp::Sub)],
    &[("*", BinaryOp::Mul), ("/", BinaryOp::Div)],
];

fn unexpected(token: &Token) -> RuleError {
    let found = match &token.kind {
        TokenKind::Number(value) => value.to_string(),
        TokenKind::Ident(name) => name.clone(),
        TokenKind::Symbol(symbol) => (*symbol).to_string(),
    };
    RuleError::UnexpectedToken {
        found,
        position: token.position,
    }
}
