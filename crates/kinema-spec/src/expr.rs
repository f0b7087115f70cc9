//! Whitelisted arithmetic expression language for rotation angles and
//! parametric curve coordinates.
//!
//! Supports numeric literals, the named constants `PI`/`TAU` (and their
//! `math.`-qualified forms), the operators `+ - * / % **`, parentheses,
//! a fixed table of math functions, and at most one free variable bound
//! at evaluation time. Anything outside the whitelist is an error; this
//! is deliberately not a general-purpose evaluator.

use crate::document::AngleSpec;
use kinema_core::{KinemaError, KinemaResult};

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    LeftParen,
    RightParen,
    Comma,
    Dot,
    Eof,
}

struct Lexer {
    source: Vec<char>,
    pos: usize,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            pos: 0,
        }
    }

    fn tokenize(&mut self) -> KinemaResult<Vec<TokenKind>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.source.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.source.get(self.pos).copied()?;
        self.pos += 1;
        Some(ch)
    }

    fn next_token(&mut self) -> KinemaResult<TokenKind> {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }

        let ch = match self.peek() {
            Some(ch) => ch,
            None => return Ok(TokenKind::Eof),
        };

        let kind = match ch {
            '+' => {
                self.advance();
                TokenKind::Plus
            }
            '-' => {
                self.advance();
                TokenKind::Minus
            }
            '*' => {
                self.advance();
                if self.peek() == Some('*') {
                    self.advance();
                    TokenKind::StarStar
                } else {
                    TokenKind::Star
                }
            }
            '/' => {
                self.advance();
                TokenKind::Slash
            }
            '%' => {
                self.advance();
                TokenKind::Percent
            }
            '(' => {
                self.advance();
                TokenKind::LeftParen
            }
            ')' => {
                self.advance();
                TokenKind::RightParen
            }
            ',' => {
                self.advance();
                TokenKind::Comma
            }
            '.' if !matches!(self.peek_next(), Some(c) if c.is_ascii_digit()) => {
                self.advance();
                TokenKind::Dot
            }
            c if c.is_ascii_digit() || c == '.' => {
                let num_str = self.read_while(|c| c.is_ascii_digit() || c == '.');
                match num_str.parse::<f64>() {
                    Ok(value) => TokenKind::Number(value),
                    Err(_) => {
                        return Err(KinemaError::expr(format!("invalid number: {}", num_str)))
                    }
                }
            }
            c if c.is_alphabetic() || c == '_' => {
                let ident = self.read_while(|c| c.is_alphanumeric() || c == '_');
                TokenKind::Ident(ident)
            }
            _ => {
                return Err(KinemaError::expr(format!(
                    "unexpected character: '{}'",
                    ch
                )));
            }
        };

        Ok(kind)
    }

    fn read_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let mut result = String::new();
        while let Some(ch) = self.peek() {
            if predicate(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Number(f64),
    Ident(String),
    Call { name: String, args: Vec<Expr> },
    Neg(Box<Expr>),
    BinOp {
        op: Op,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

struct Parser {
    tokens: Vec<TokenKind>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<TokenKind>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn parse(&mut self) -> KinemaResult<Expr> {
        let expr = self.parse_additive()?;
        match self.peek() {
            TokenKind::Eof => Ok(expr),
            other => Err(KinemaError::expr(format!(
                "unexpected trailing token: {:?}",
                other
            ))),
        }
    }

    fn peek(&self) -> TokenKind {
        self.tokens.get(self.pos).cloned().unwrap_or(TokenKind::Eof)
    }

    fn advance(&mut self) -> TokenKind {
        let token = self.tokens.get(self.pos).cloned().unwrap_or(TokenKind::Eof);
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind) -> KinemaResult<()> {
        let token = self.advance();
        if token == kind {
            Ok(())
        } else {
            Err(KinemaError::expr(format!(
                "expected {:?}, found {:?}",
                kind, token
            )))
        }
    }

    fn parse_additive(&mut self) -> KinemaResult<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                TokenKind::Plus => Op::Add,
                TokenKind::Minus => Op::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expr::BinOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> KinemaResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                TokenKind::Star => Op::Mul,
                TokenKind::Slash => Op::Div,
                TokenKind::Percent => Op::Rem,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::BinOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> KinemaResult<Expr> {
        match self.peek() {
            TokenKind::Minus => {
                self.advance();
                Ok(Expr::Neg(Box::new(self.parse_unary()?)))
            }
            TokenKind::Plus => {
                self.advance();
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> KinemaResult<Expr> {
        let base = self.parse_atom()?;
        if self.peek() == TokenKind::StarStar {
            self.advance();
            // Right-associative; the exponent may itself be signed.
            let exponent = self.parse_unary()?;
            return Ok(Expr::BinOp {
                op: Op::Pow,
                left: Box::new(base),
                right: Box::new(exponent),
            });
        }
        Ok(base)
    }

    fn parse_atom(&mut self) -> KinemaResult<Expr> {
        match self.advance() {
            TokenKind::Number(value) => Ok(Expr::Number(value)),
            TokenKind::Ident(first) => {
                let mut name = first;
                while self.peek() == TokenKind::Dot {
                    self.advance();
                    match self.advance() {
                        TokenKind::Ident(part) => {
                            name.push('.');
                            name.push_str(&part);
                        }
                        other => {
                            return Err(KinemaError::expr(format!(
                                "expected identifier after '.', found {:?}",
                                other
                            )));
                        }
                    }
                }

                if self.peek() == TokenKind::LeftParen {
                    self.advance();
                    let mut args = Vec::new();
                    if self.peek() != TokenKind::RightParen {
                        loop {
                            args.push(self.parse_additive()?);
                            if self.peek() == TokenKind::Comma {
                                self.advance();
                            } else {
                                break;
                            }
                        }
                    }
                    self.expect(TokenKind::RightParen)?;
                    return Ok(Expr::Call { name, args });
                }

                Ok(Expr::Ident(name))
            }
            TokenKind::LeftParen => {
                let expr = self.parse_additive()?;
                self.expect(TokenKind::RightParen)?;
                Ok(expr)
            }
            other => Err(KinemaError::expr(format!(
                "unexpected token: {:?}",
                other
            ))),
        }
    }
}

fn constant(name: &str) -> Option<f64> {
    match name {
        "PI" | "pi" | "math.pi" => Some(std::f64::consts::PI),
        "TAU" | "tau" | "math.tau" => Some(std::f64::consts::TAU),
        "math.e" => Some(std::f64::consts::E),
        _ => None,
    }
}

fn apply(name: &str, args: &[f64]) -> KinemaResult<f64> {
    let bare = name.strip_prefix("math.").unwrap_or(name);
    match (bare, args.len()) {
        ("sin", 1) => Ok(args[0].sin()),
        ("cos", 1) => Ok(args[0].cos()),
        ("tan", 1) => Ok(args[0].tan()),
        ("asin", 1) => Ok(args[0].asin()),
        ("acos", 1) => Ok(args[0].acos()),
        ("atan", 1) => Ok(args[0].atan()),
        ("atan2", 2) => Ok(args[0].atan2(args[1])),
        ("sqrt", 1) => Ok(args[0].sqrt()),
        ("abs", 1) => Ok(args[0].abs()),
        ("floor", 1) => Ok(args[0].floor()),
        ("ceil", 1) => Ok(args[0].ceil()),
        ("exp", 1) => Ok(args[0].exp()),
        ("log", 1) => Ok(args[0].ln()),
        ("pow", 2) => Ok(args[0].powf(args[1])),
        ("radians", 1) => Ok(args[0].to_radians()),
        ("degrees", 1) => Ok(args[0].to_degrees()),
        (_, n) => Err(KinemaError::expr(format!(
            "unknown function '{}' with {} argument(s)",
            name, n
        ))),
    }
}

fn eval_node(expr: &Expr, var: Option<(&str, f64)>) -> KinemaResult<f64> {
    match expr {
        Expr::Number(value) => Ok(*value),
        Expr::Ident(name) => {
            if let Some((var_name, value)) = var {
                if name == var_name {
                    return Ok(value);
                }
            }
            constant(name)
                .ok_or_else(|| KinemaError::expr(format!("unknown identifier '{}'", name)))
        }
        Expr::Call { name, args } => {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(eval_node(arg, var)?);
            }
            apply(name, &values)
        }
        Expr::Neg(inner) => Ok(-eval_node(inner, var)?),
        Expr::BinOp { op, left, right } => {
            let l = eval_node(left, var)?;
            let r = eval_node(right, var)?;
            Ok(match op {
                Op::Add => l + r,
                Op::Sub => l - r,
                Op::Mul => l * r,
                Op::Div => l / r,
                Op::Rem => l % r,
                Op::Pow => l.powf(r),
            })
        }
    }
}

/// A parsed arithmetic expression, ready for repeated evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpr {
    root: Expr,
}

impl CompiledExpr {
    /// Parse an expression from source text.
    pub fn parse(source: &str) -> KinemaResult<Self> {
        let tokens = Lexer::new(source).tokenize()?;
        let root = Parser::new(tokens).parse()?;
        Ok(Self { root })
    }

    /// Evaluate with no free variable bound.
    pub fn eval(&self) -> KinemaResult<f64> {
        eval_node(&self.root, None)
    }

    /// Evaluate with one free variable bound, e.g. `t` for curve
    /// coordinates.
    pub fn eval_with(&self, var: &str, value: f64) -> KinemaResult<f64> {
        eval_node(&self.root, Some((var, value)))
    }
}

/// Resolve an angle field to radians. Literal numbers pass through;
/// expression strings are parsed and evaluated, and any failure
/// (including a non-finite result) falls back to zero.
pub fn angle_value(angle: &AngleSpec) -> f64 {
    match angle {
        AngleSpec::Literal(value) => *value,
        AngleSpec::Expression(source) => {
            match CompiledExpr::parse(source).and_then(|e| e.eval()) {
                Ok(value) if value.is_finite() => value,
                Ok(value) => {
                    tracing::debug!("angle expression '{}' is non-finite: {}", source, value);
                    0.0
                }
                Err(err) => {
                    tracing::debug!("angle expression '{}' failed: {}", source, err);
                    0.0
                }
            }
        }
    }
}
