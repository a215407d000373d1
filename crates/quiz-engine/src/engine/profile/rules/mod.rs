//! Profile rule language.
//!
//! Rules are small boolean expressions over axis names, e.g.
//! `plan >= spont && ((city + foodie) >= (nature + active))`. Source text is
//! tokenized, parsed into an [`Expr`] tree once, and interpreted against an
//! [`AxisScores`] snapshot. Supported: numeric literals, axis names,
//! `+ - * /`, `< <= > >= == !=`, `&& ||`, unary minus, parentheses.

mod lexer;
mod parser;

use super::domain::AxisScores;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    #[error("rule is empty")]
    Empty,
    #[error("unexpected character '{ch}' at offset {position}")]
    UnexpectedCharacter { ch: char, position: usize },
    #[error("invalid number '{literal}' at offset {position}")]
    InvalidNumber { literal: String, position: usize },
    #[error("unexpected '{found}' at offset {position}")]
    UnexpectedToken { found: String, position: usize },
    #[error("rule ends unexpectedly")]
    UnexpectedEnd,
    #[error("rule nests deeper than {limit} levels")]
    TooDeep { limit: usize },
    #[error("rule has {tokens} tokens, more than the limit of {limit}")]
    TooLong { tokens: usize, limit: usize },
    #[error("unknown axis '{0}'")]
    UnknownAxis(String),
    #[error("operator '{op}' expects {expected} operands")]
    TypeMismatch { op: BinaryOp, expected: &'static str },
    #[error("rule evaluates to a number, not a condition")]
    NotBoolean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(f64),
    AxisRef(String),
    Negate(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

/// Result of evaluating a sub-expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Number(f64),
    Bool(bool),
}

impl Value {
    fn number(self, op: BinaryOp) -> Result<f64, RuleError> {
        match self {
            Value::Number(value) => Ok(value),
            Value::Bool(_) => Err(RuleError::TypeMismatch {
                op,
                expected: "numeric",
            }),
        }
    }

    fn boolean(self, op: BinaryOp) -> Result<bool, RuleError> {
        match self {
            Value::Bool(value) => Ok(value),
            Value::Number(_) => Err(RuleError::TypeMismatch {
                op,
                expected: "boolean",
            }),
        }
    }
}

impl Expr {
    pub fn parse(source: &str) -> Result<Self, RuleError> {
        let tokens = lexer::tokenize(source)?;
        parser::Parser::new(tokens).parse()
    }

    pub fn evaluate(&self, scores: &AxisScores) -> Result<Value, RuleError> {
        match self {
            Expr::Literal(value) => Ok(Value::Number(*value)),
            Expr::AxisRef(name) => scores
                .get(name)
                .map(Value::Number)
                .ok_or_else(|| RuleError::UnknownAxis(name.clone())),
            Expr::Negate(operand) => {
                let value = operand.evaluate(scores)?.number(BinaryOp::Sub)?;
                Ok(Value::Number(-value))
            }
            Expr::Binary { op, lhs, rhs } => {
                let op = *op;
                let left = lhs.evaluate(scores)?;

                // `&&` and `||` short-circuit.
                match op {
                    BinaryOp::And if !left.boolean(op)? => return Ok(Value::Bool(false)),
                    BinaryOp::Or if left.boolean(op)? => return Ok(Value::Bool(true)),
                    BinaryOp::And | BinaryOp::Or => {
                        return rhs.evaluate(scores)?.boolean(op).map(Value::Bool);
                    }
                    _ => {}
                }

                let right = rhs.evaluate(scores)?;
                match (op, left, right) {
                    (BinaryOp::Eq, Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(a == b)),
                    (BinaryOp::Ne, Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(a != b)),
                    _ => {
                        let a = left.number(op)?;
                        let b = right.number(op)?;
                        Ok(apply_numeric(op, a, b))
                    }
                }
            }
        }
    }

    /// Axis names referenced anywhere in the expression.
    pub fn axes(&self) -> BTreeSet<&str> {
        let mut axes = BTreeSet::new();
        self.collect_axes(&mut axes);
        axes
    }

    fn collect_axes<'a>(&'a self, axes: &mut BTreeSet<&'a str>) {
        match self {
            Expr::Literal(_) => {}
            Expr::AxisRef(name) => {
                axes.insert(name.as_str());
            }
            Expr::Negate(operand) => operand.collect_axes(axes),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_axes(axes);
                rhs.collect_axes(axes);
            }
        }
    }
}

#[allow(clippy::float_cmp)]
fn apply_numeric(op: BinaryOp, a: f64, b: f64) -> Value {
    match op {
        BinaryOp::Add => Value::Number(a + b),
        BinaryOp::Sub => Value::Number(a - b),
        BinaryOp::Mul => Value::Number(a * b),
        BinaryOp::Div => Value::Number(a / b),
        BinaryOp::Lt => Value::Bool(a < b),
        BinaryOp::Le => Value::Bool(a <= b),
        BinaryOp::Gt => Value::Bool(a > b),
        BinaryOp::Ge => Value::Bool(a >= b),
        BinaryOp::Eq => Value::Bool(a == b),
        BinaryOp::Ne => Value::Bool(a != b),
        BinaryOp::And | BinaryOp::Or => unreachable!("logical operators are handled before"),
    }
}

/// A parsed rule together with its source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    source: String,
    expr: Expr,
}

impl Rule {
    pub fn parse(source: &str) -> Result<Self, RuleError> {
        Ok(Self {
            source: source.to_string(),
            expr: Expr::parse(source)?,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Evaluates the rule; a top-level numeric result is an error.
    pub fn evaluate(&self, scores: &AxisScores) -> Result<bool, RuleError> {
        match self.expr.evaluate(scores)? {
            Value::Bool(matched) => Ok(matched),
            Value::Number(_) => Err(RuleError::NotBoolean),
        }
    }

    /// Fail-closed evaluation: any error counts as "no match".
    pub fn matches(&self, scores: &AxisScores) -> bool {
        self.evaluate(scores).unwrap_or(false)
    }
}
