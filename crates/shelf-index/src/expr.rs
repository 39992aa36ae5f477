//! Parser and evaluator for the index filter grammar.
//!
//! ```text
//! expr    := and ("OR" and)*
//! and     := primary ("AND" primary)*
//! primary := "(" expr ")" | clause
//! clause  := ident op value
//! op      := "=" | ">=" | "<="
//! value   := "\"" chars "\"" | number
//! ```
//!
//! `AND` binds tighter than `OR`, so the price group
//! `(price >= 0 AND price <= 100)` is a single conjunction. Keywords are
//! case-sensitive. String literals run to the next double quote; there are no
//! escapes, matching what the builder emits.

use serde_json::{Map, Value};
use shelf_core::{FilterValue, Operator};

/// Parsed filter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Clause {
        field: String,
        op: Operator,
        value: FilterValue,
    },
}

impl Expr {
    /// Parse a rendered filter expression.
    pub fn parse(input: &str) -> Result<Expr, String> {
        let tokens = tokenize(input)?;
        let mut parser = Parser { tokens, pos: 0 };
        let expr = parser.or()?;
        match parser.peek() {
            None => Ok(expr),
            Some(tok) => Err(format!("unexpected token {tok:?} after expression")),
        }
    }

    /// Evaluate against one record's metadata. A missing field or a type
    /// mismatch makes the clause false.
    pub fn matches(&self, metadata: &Map<String, Value>) -> bool {
        match self {
            Expr::And(parts) => parts.iter().all(|p| p.matches(metadata)),
            Expr::Or(parts) => parts.iter().any(|p| p.matches(metadata)),
            Expr::Clause { field, op, value } => metadata
                .get(field)
                .is_some_and(|actual| compare(actual, *op, value)),
        }
    }
}

fn compare(actual: &Value, op: Operator, expected: &FilterValue) -> bool {
    match (actual, expected) {
        (Value::String(a), FilterValue::Str(e)) => op == Operator::Eq && a == e,
        (Value::Number(a), FilterValue::Number(e)) => {
            let Some(a) = a.as_f64() else { return false };
            match op {
                Operator::Eq => a == *e,
                Operator::Gte => a >= *e,
                Operator::Lte => a <= *e,
            }
        }
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Token {
    LParen,
    RParen,
    And,
    Or,
    Op(Operator),
    Ident(String),
    Str(String),
    Number(f64),
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '=' => {
                chars.next();
                tokens.push(Token::Op(Operator::Eq));
            }
            '>' | '<' => {
                chars.next();
                match chars.next() {
                    Some((_, '=')) => tokens.push(Token::Op(if c == '>' {
                        Operator::Gte
                    } else {
                        Operator::Lte
                    })),
                    _ => return Err(format!("expected '=' after '{c}' at {start}")),
                }
            }
            '"' => {
                chars.next();
                let mut literal = String::new();
                loop {
                    match chars.next() {
                        Some((_, '"')) => break,
                        Some((_, ch)) => literal.push(ch),
                        None => return Err(format!("unterminated string starting at {start}")),
                    }
                }
                tokens.push(Token::Str(literal));
            }
            c if c.is_ascii_digit() || c == '-' || c == '.' => {
                let mut end = start;
                while let Some(&(i, ch)) = chars.peek() {
                    if ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.' | 'e' | 'E') {
                        end = i + ch.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let text = &input[start..end];
                let n = text
                    .parse::<f64>()
                    .map_err(|_| format!("invalid number {text:?} at {start}"))?;
                tokens.push(Token::Number(n));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut end = start;
                while let Some(&(i, ch)) = chars.peek() {
                    if ch.is_alphanumeric() || ch == '_' || ch == '.' {
                        end = i + ch.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(match &input[start..end] {
                    "AND" => Token::And,
                    "OR" => Token::Or,
                    ident => Token::Ident(ident.to_string()),
                });
            }
            other => return Err(format!("unexpected character {other:?} at {start}")),
        }
    }

    Ok(tokens)
}

// ---------------------------------------------------------------------------
// Recursive-descent parser
// ---------------------------------------------------------------------------

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    fn or(&mut self) -> Result<Expr, String> {
        let mut parts = Vec::new();
        loop {
            match self.and()? {
                Expr::Or(inner) => parts.extend(inner),
                other => parts.push(other),
            }
            if self.peek() != Some(&Token::Or) {
                break;
            }
            self.pos += 1;
        }
        Ok(collapse(parts, Expr::Or))
    }

    fn and(&mut self) -> Result<Expr, String> {
        let mut parts = Vec::new();
        loop {
            match self.primary()? {
                Expr::And(inner) => parts.extend(inner),
                other => parts.push(other),
            }
            if self.peek() != Some(&Token::And) {
                break;
            }
            self.pos += 1;
        }
        Ok(collapse(parts, Expr::And))
    }

    fn primary(&mut self) -> Result<Expr, String> {
        match self.next() {
            Some(Token::LParen) => {
                let inner = self.or()?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    other => Err(format!("expected ')', found {other:?}")),
                }
            }
            Some(Token::Ident(field)) => {
                let op = match self.next() {
                    Some(Token::Op(op)) => op,
                    other => return Err(format!("expected operator after {field:?}, found {other:?}")),
                };
                let value = match self.next() {
                    Some(Token::Str(s)) => FilterValue::Str(s),
                    Some(Token::Number(n)) => FilterValue::Number(n),
                    other => return Err(format!("expected value after {field:?} {op}, found {other:?}")),
                };
                Ok(Expr::Clause { field, op, value })
            }
            other => Err(format!("expected clause or '(', found {other:?}")),
        }
    }
}

/// Single-element conjunctions and disjunctions are just their element.
fn collapse(mut parts: Vec<Expr>, wrap: fn(Vec<Expr>) -> Expr) -> Expr {
    if parts.len() == 1 {
        parts.remove(0)
    } else {
        wrap(parts)
    }
}
