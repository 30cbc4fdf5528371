//! Parser for the catalog's formula language
//!
//! Grammar:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := '-' unary | primary
//! primary := NUMBER | IDENT | FUNC '(' expr (',' expr)* ')' | '(' expr ')'
//! FUNC    := max | min | avg
//! ```
//!
//! Division is accepted only by a numeric literal (`avg`-style scaling such as
//! `(Qz1 + Qz2) / 2`).

use super::Expr;
use std::fmt;

/// Syntax error in a formula, with the byte offset where it was detected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaError {
    /// Byte offset into the formula text
    pub offset: usize,
    /// What went wrong
    pub message: String,
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at offset {}: {}", self.offset, self.message)
    }
}

impl std::error::Error for FormulaError {}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "number {n}"),
            Self::Ident(id) => write!(f, "'{id}'"),
            Self::Plus => f.write_str("'+'"),
            Self::Minus => f.write_str("'-'"),
            Self::Star => f.write_str("'*'"),
            Self::Slash => f.write_str("'/'"),
            Self::LParen => f.write_str("'('"),
            Self::RParen => f.write_str("')'"),
            Self::Comma => f.write_str("','"),
        }
    }
}

fn error(offset: usize, message: impl Into<String>) -> FormulaError {
    FormulaError {
        offset,
        message: message.into(),
    }
}

/// Split formula text into tokens with their byte offsets
fn tokenize(text: &str) -> Result<Vec<(usize, Token)>, FormulaError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        let token = match c {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            c if c.is_ascii_digit() || c == '.' => {
                let mut end = start;
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        end = i + d.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let literal = &text[start..end];
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| error(start, format!("invalid number '{literal}'")))?;
                tokens.push((start, Token::Number(value)));
                continue;
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut end = start;
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_ascii_alphanumeric() || d == '_' {
                        end = i + d.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push((start, Token::Ident(text[start..end].to_string())));
                continue;
            }
            other => return Err(error(start, format!("unexpected character '{other}'"))),
        };
        tokens.push((start, token));
        chars.next();
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |(o, _)| *o)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(_, t)| t.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, wanted: &Token) -> Result<(), FormulaError> {
        let offset = self.offset();
        match self.advance() {
            Some(ref t) if t == wanted => Ok(()),
            Some(t) => Err(error(offset, format!("expected {wanted}, found {t}"))),
            None => Err(error(offset, format!("expected {wanted}, found end of formula"))),
        }
    }

    fn expr(&mut self) -> Result<Expr, FormulaError> {
        let mut terms = vec![self.term()?];
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    terms.push(self.term()?);
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    terms.push(negate(self.term()?));
                }
                _ => break,
            }
        }
        Ok(collapse(terms, Expr::Sum))
    }

    fn term(&mut self) -> Result<Expr, FormulaError> {
        let mut factors = Vec::new();
        push_factor(&mut factors, self.unary()?);
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    push_factor(&mut factors, self.unary()?);
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let offset = self.offset();
                    match self.unary()? {
                        Expr::Const(d) if d != 0.0 => factors.push(Expr::Const(1.0 / d)),
                        Expr::Const(_) => return Err(error(offset, "division by zero")),
                        _ => return Err(error(offset, "can only divide by a number")),
                    }
                }
                _ => break,
            }
        }
        Ok(collapse(factors, Expr::Product))
    }

    fn unary(&mut self) -> Result<Expr, FormulaError> {
        if matches!(self.peek(), Some(Token::Minus)) {
            self.pos += 1;
            return Ok(negate(self.unary()?));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, FormulaError> {
        let offset = self.offset();
        match self.advance() {
            Some(Token::Number(n)) => Ok(Expr::Const(n)),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Ident(name)) => {
                if matches!(self.peek(), Some(Token::LParen)) {
                    self.call(&name, offset)
                } else {
                    Ok(Expr::Field(name))
                }
            }
            Some(t) => Err(error(offset, format!("unexpected {t}"))),
            None => Err(error(offset, "unexpected end of formula")),
        }
    }

    fn call(&mut self, name: &str, offset: usize) -> Result<Expr, FormulaError> {
        let build: fn(Vec<Expr>) -> Expr = match name.to_ascii_lowercase().as_str() {
            "max" => Expr::Max,
            "min" => Expr::Min,
            "avg" => Expr::Avg,
            _ => return Err(error(offset, format!("unknown function '{name}'"))),
        };
        self.expect(&Token::LParen)?;
        let mut args = vec![self.expr()?];
        while matches!(self.peek(), Some(Token::Comma)) {
            self.pos += 1;
            args.push(self.expr()?);
        }
        self.expect(&Token::RParen)?;
        Ok(build(args))
    }
}

fn collapse(mut items: Vec<Expr>, wrap: fn(Vec<Expr>) -> Expr) -> Expr {
    if items.len() == 1 {
        items.remove(0)
    } else {
        wrap(items)
    }
}

/// Flatten nested products so `0.5*(2*F)` stays a single product
fn push_factor(factors: &mut Vec<Expr>, factor: Expr) {
    match factor {
        Expr::Product(inner) => factors.extend(inner),
        other => factors.push(other),
    }
}

fn negate(expr: Expr) -> Expr {
    match expr {
        Expr::Const(c) => Expr::Const(-c),
        Expr::Product(mut factors) => {
            factors.insert(0, Expr::Const(-1.0));
            Expr::Product(factors)
        }
        other => Expr::Product(vec![Expr::Const(-1.0), other]),
    }
}

/// Parse formula text into an expression tree
///
/// # Errors
/// Returns a [`FormulaError`] describing the first syntax problem found.
///
/// # Examples
/// ```
/// use gradepoint::core::formula::parse;
/// let expr = parse("0.15*Qz1 + 0.4*F + 0.25*max(PE1, PE2) + 0.2*min(PE1, PE2)").unwrap();
/// assert_eq!(expr.fields(), vec!["Qz1", "F", "PE1", "PE2"]);
/// ```
pub fn parse(text: &str) -> Result<Expr, FormulaError> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(error(0, "empty formula"));
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: text.len(),
    };
    let expr = parser.expr()?;
    if let Some(t) = parser.peek().cloned() {
        return Err(error(parser.offset(), format!("unexpected {t} after expression")));
    }
    Ok(expr)
}
