//! Allow-listed arithmetic expressions in one variable.
//!
//! Plot requests carry a definition such as `f(x) = sin(x) + x^2`. Only the
//! right-hand side is evaluated, and only a fixed vocabulary is accepted: the
//! variable `x`, the constants `pi` and `e`, the unary functions listed in
//! [`Function`], the operators `+ - * / %`, and exponentiation written either
//! `^` or `**`. Names may carry an `np.` prefix (`np.sin(x)`).
//!
//! Exponentiation is right associative and binds tighter than unary minus, so
//! `-x^2` is `-(x^2)` and `2^-1` is `0.5`.
//!
//! Evaluation never fails: domain errors produce NaN or infinities, exactly
//! like element-wise floating point evaluation would.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ExprError;

static DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"f\(x\)\s*=\s*(.+)").expect("definition pattern is valid")
});

/// Returns the right-hand side of the first `f(x) = ...` definition in `text`.
pub fn definition_rhs(text: &str) -> Option<&str> {
    DEFINITION
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|rhs| !rhs.is_empty())
}

/// Whether `text` contains an `f(x) = ...` definition.
pub fn is_definition(text: &str) -> bool {
    definition_rhs(text).is_some()
}

/// Deepest nesting of parentheses, calls, signs and powers accepted by
/// [`Expr::parse`]. Parsing, evaluation and drop all recurse over the tree.
pub const MAX_DEPTH: usize = 256;

/// Longest expression accepted by [`Expr::parse`], in tokens. Bounds the depth
/// of left-associative chains such as `x+x+...+x`.
pub const MAX_TOKENS: usize = 2048;

/// Allow-listed unary functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Exp,
    /// Base 10 logarithm.
    Log,
    /// Natural logarithm.
    Ln,
    Sqrt,
    Abs,
    Arcsin,
    Arccos,
    Arctan,
    Sinh,
    Cosh,
    Tanh,
}

impl Function {
    pub const ALL: [Function; 14] = [
        Function::Sin,
        Function::Cos,
        Function::Tan,
        Function::Exp,
        Function::Log,
        Function::Ln,
        Function::Sqrt,
        Function::Abs,
        Function::Arcsin,
        Function::Arccos,
        Function::Arctan,
        Function::Sinh,
        Function::Cosh,
        Function::Tanh,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Exp => "exp",
            Function::Log => "log",
            Function::Ln => "ln",
            Function::Sqrt => "sqrt",
            Function::Abs => "abs",
            Function::Arcsin => "arcsin",
            Function::Arccos => "arccos",
            Function::Arctan => "arctan",
            Function::Sinh => "sinh",
            Function::Cosh => "cosh",
            Function::Tanh => "tanh",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    pub fn apply(self, v: f64) -> f64 {
        match self {
            Function::Sin => v.sin(),
            Function::Cos => v.cos(),
            Function::Tan => v.tan(),
            Function::Exp => v.exp(),
            Function::Log => v.log10(),
            Function::Ln => v.ln(),
            Function::Sqrt => v.sqrt(),
            Function::Abs => v.abs(),
            Function::Arcsin => v.asin(),
            Function::Arccos => v.acos(),
            Function::Arctan => v.atan(),
            Function::Sinh => v.sinh(),
            Function::Cosh => v.cosh(),
            Function::Tanh => v.tanh(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    /// Floored modulo: the result takes the sign of the divisor.
    Rem,
    Pow,
}

impl BinaryOp {
    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
            BinaryOp::Rem => {
                let r = lhs % rhs;
                if r != 0.0 && (r < 0.0) != (rhs < 0.0) {
                    r + rhs
                } else {
                    r
                }
            }
            BinaryOp::Pow => lhs.powf(rhs),
        }
    }
}

/// Parsed expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    /// The free variable `x`.
    Var,
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        func: Function,
        arg: Box<Expr>,
    },
}

impl Expr {
    /// Parses an expression in `x`.
    pub fn parse(src: &str) -> Result<Expr, ExprError> {
        let tokens = tokenize(src)?;
        if tokens.is_empty() {
            return Err(ExprError::Empty);
        }
        if tokens.len() > MAX_TOKENS {
            return Err(ExprError::TooLong { max: MAX_TOKENS });
        }
        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
        };
        let expr = parser.expression()?;
        match parser.peek() {
            None => Ok(expr),
            Some(tok) => Err(ExprError::UnexpectedToken {
                found: tok.kind.to_string(),
                pos: tok.pos,
            }),
        }
    }

    /// Evaluates the expression at `x`.
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            Expr::Number(v) => *v,
            Expr::Var => x,
            Expr::Neg(inner) => -inner.eval(x),
            Expr::Binary { op, lhs, rhs } => op.apply(lhs.eval(x), rhs.eval(x)),
            Expr::Call { func, arg } => func.apply(arg.eval(x)),
        }
    }

    /// Evaluates the expression on `n` evenly spaced points of `[start, end]`.
    pub fn sample(&self, start: f64, end: f64, n: usize) -> Samples {
        let xs = linspace(start, end, n);
        let ys = xs.iter().map(|&x| self.eval(x)).collect();
        Samples { xs, ys }
    }
}

/// `n` evenly spaced values from `start` to `end`, both included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let last = (n - 1) as f64;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        return end;
                    }
                    // Interpolated so `end - start` never overflows.
                    let t = i as f64 / last;
                    start * (1.0 - t) + end * t
                })
                .collect()
        }
    }
}

/// Sampled function values. `xs` and `ys` always have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct Samples {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl Samples {
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Smallest and largest finite `y`, or `None` when no sample is finite.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        self.ys
            .iter()
            .copied()
            .filter(|y| y.is_finite())
            .fold(None, |acc, y| match acc {
                None => Some((y, y)),
                Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
            })
    }

    /// Runs of consecutive finite points, split wherever `y` is NaN or infinite.
    pub fn finite_segments(&self) -> Vec<Vec<(f64, f64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for (&x, &y) in self.xs.iter().zip(&self.ys) {
            if y.is_finite() {
                current.push((x, y));
            } else if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Pow,
    LParen,
    RParen,
    Comma,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(v) => write!(f, "{}", v),
            TokenKind::Ident(name) => write!(f, "{}", name),
            TokenKind::Plus => f.write_str("+"),
            TokenKind::Minus => f.write_str("-"),
            TokenKind::Star => f.write_str("*"),
            TokenKind::Slash => f.write_str("/"),
            TokenKind::Percent => f.write_str("%"),
            TokenKind::Pow => f.write_str("^"),
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::Comma => f.write_str(","),
        }
    }
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    pos: usize,
}

fn tokenize(src: &str) -> Result<Vec<Token>, ExprError> {
    let chars: Vec<char> = src.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let start = i;
        let kind = match c {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '0'..='9' | '.' => {
                i = scan_number(&chars, i);
                let text: String = chars[start..i].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| ExprError::InvalidNumber { text, pos: start })?;
                tokens.push(Token {
                    kind: TokenKind::Number(value),
                    pos: start,
                });
                continue;
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                i = scan_ident(&chars, i);
                // `np.sin` style qualified names
                if i + 1 < chars.len()
                    && chars[i] == '.'
                    && (chars[i + 1].is_ascii_alphabetic() || chars[i + 1] == '_')
                {
                    i = scan_ident(&chars, i + 1);
                }
                let name: String = chars[start..i].iter().collect();
                tokens.push(Token {
                    kind: TokenKind::Ident(name),
                    pos: start,
                });
                continue;
            }
            '*' if chars.get(i + 1) == Some(&'*') => {
                i += 1;
                TokenKind::Pow
            }
            '^' => TokenKind::Pow,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            other => return Err(ExprError::UnexpectedChar { ch: other, pos: start }),
        };
        i += 1;
        tokens.push(Token { kind, pos: start });
    }

    Ok(tokens)
}

fn scan_number(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
        i += 1;
    }
    // Exponent only when digits follow, so `2*e` and `2e` stay distinguishable.
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            j += 1;
        }
        if j < chars.len() && chars[j].is_ascii_digit() {
            i = j;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
        }
    }
    i
}

fn scan_ident(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
        i += 1;
    }
    i
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// What an identifier resolves to.
enum Name {
    Var,
    Constant(f64),
    Function(Function),
}

fn resolve(name: &str) -> Result<Name, ExprError> {
    let bare = name.strip_prefix("np.").unwrap_or(name);
    match bare {
        "x" => Ok(Name::Var),
        "pi" => Ok(Name::Constant(std::f64::consts::PI)),
        "e" => Ok(Name::Constant(std::f64::consts::E)),
        other => Function::from_name(other)
            .map(Name::Function)
            .ok_or_else(|| ExprError::UnknownName {
                name: name.to_string(),
            }),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Current `unary` nesting; every recursive path goes through `unary`.
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek().is_some_and(|t| &t.kind == kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), ExprError> {
        match self.next() {
            Some(tok) if &tok.kind == kind => Ok(()),
            Some(tok) => Err(ExprError::UnexpectedToken {
                found: tok.kind.to_string(),
                pos: tok.pos,
            }),
            None => Err(ExprError::UnexpectedEnd),
        }
    }

    // expression := term (('+' | '-') term)*
    fn expression(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.term()?;
        loop {
            let op = if self.eat(&TokenKind::Plus) {
                BinaryOp::Add
            } else if self.eat(&TokenKind::Minus) {
                BinaryOp::Sub
            } else {
                return Ok(lhs);
            };
            let rhs = self.term()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    // term := unary (('*' | '/' | '%') unary)*
    fn term(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.unary()?;
        loop {
            let op = if self.eat(&TokenKind::Star) {
                BinaryOp::Mul
            } else if self.eat(&TokenKind::Slash) {
                BinaryOp::Div
            } else if self.eat(&TokenKind::Percent) {
                BinaryOp::Rem
            } else {
                return Ok(lhs);
            };
            let rhs = self.unary()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    // unary := ('-' | '+') unary | power
    fn unary(&mut self) -> Result<Expr, ExprError> {
        if self.depth >= MAX_DEPTH {
            return Err(ExprError::TooDeep { max: MAX_DEPTH });
        }
        self.depth += 1;
        let expr = self.signed();
        self.depth -= 1;
        expr
    }

    fn signed(&mut self) -> Result<Expr, ExprError> {
        if self.eat(&TokenKind::Minus) {
            return Ok(Expr::Neg(Box::new(self.unary()?)));
        }
        if self.eat(&TokenKind::Plus) {
            return self.unary();
        }
        self.power()
    }

    // power := atom ('^' unary)?
    fn power(&mut self) -> Result<Expr, ExprError> {
        let base = self.atom()?;
        if self.eat(&TokenKind::Pow) {
            let exponent = self.unary()?;
            return Ok(binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Expr, ExprError> {
        let tok = self.next().ok_or(ExprError::UnexpectedEnd)?;
        match tok.kind {
            TokenKind::Number(v) => Ok(Expr::Number(v)),
            TokenKind::LParen => {
                let inner = self.expression()?;
                self.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Ident(name) => {
                let resolved = resolve(&name)?;
                let called = self.peek().is_some_and(|t| t.kind == TokenKind::LParen);
                match (resolved, called) {
                    (Name::Function(func), true) => {
                        self.pos += 1;
                        let mut args = self.arguments()?;
                        if args.len() != 1 {
                            return Err(ExprError::Arity {
                                name: func.name().to_string(),
                                got: args.len(),
                            });
                        }
                        let arg = args.remove(0);
                        Ok(Expr::Call {
                            func,
                            arg: Box::new(arg),
                        })
                    }
                    (Name::Function(_), false) => Err(ExprError::MissingCall { name }),
                    (_, true) => Err(ExprError::NotCallable { name }),
                    (Name::Var, false) => Ok(Expr::Var),
                    (Name::Constant(v), false) => Ok(Expr::Number(v)),
                }
            }
            other => Err(ExprError::UnexpectedToken {
                found: other.to_string(),
                pos: tok.pos,
            }),
        }
    }

    /// Parses a comma separated argument list after the opening parenthesis.
    fn arguments(&mut self) -> Result<Vec<Expr>, ExprError> {
        let mut args = Vec::new();
        if self.eat(&TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.expression()?);
            if self.eat(&TokenKind::Comma) {
                continue;
            }
            self.expect(&TokenKind::RParen)?;
            return Ok(args);
        }
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn eval(src: &str, x: f64) -> f64 {
        Expr::parse(src).unwrap().eval(x)
    }

    #[test]
    fn extracts_definition_rhs() {
        assert_eq!(definition_rhs("f(x) = x^2"), Some("x^2"));
        assert_eq!(definition_rhs("plot f(x)=sin(x)  "), Some("sin(x)"));
        assert_eq!(definition_rhs("g(x) = x"), None);
        assert_eq!(definition_rhs("f(x) =   "), None);
        assert!(!is_definition("x^2"));
    }

    #[test]
    fn caret_and_double_star_are_power() {
        assert_eq!(eval("x^2", 3.0), 9.0);
        assert_eq!(eval("x**2", 3.0), 9.0);
        assert_eq!(eval("2^3^2", 0.0), 512.0);
    }

    #[test]
    fn power_binds_tighter_than_unary_minus() {
        assert_eq!(eval("-x^2", 3.0), -9.0);
        assert_eq!(eval("2^-1", 0.0), 0.5);
        assert_eq!(eval("(-x)^2", 3.0), 9.0);
    }

    #[test]
    fn precedence_and_parentheses() {
        assert_eq!(eval("1 + 2 * x", 3.0), 7.0);
        assert_eq!(eval("(1 + 2) * x", 3.0), 9.0);
        assert_eq!(eval("x / 2 - 1", 4.0), 1.0);
        assert_eq!(eval("x^2-5", 2.0), -1.0);
    }

    #[test]
    fn modulo_takes_sign_of_divisor() {
        assert_eq!(eval("x % 3", 7.0), 1.0);
        assert_eq!(eval("x % 3", -7.0), 2.0);
        assert_eq!(eval("x % -3", 7.0), -2.0);
    }

    #[test]
    fn constants_and_functions() {
        assert!((eval("sin(pi/2)", 0.0) - 1.0).abs() < 1e-12);
        assert!((eval("ln(e)", 0.0) - 1.0).abs() < 1e-12);
        assert!((eval("log(1000)", 0.0) - 3.0).abs() < 1e-12);
        assert_eq!(eval("abs(x)", -4.0), 4.0);
        assert_eq!(eval("sqrt(x)", 16.0), 4.0);
        assert!((eval("np.exp(x+1)", -1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn scientific_notation() {
        assert_eq!(eval("1e3 * x", 2.0), 2000.0);
        assert_eq!(eval("2.5E-1", 0.0), 0.25);
        assert_eq!(eval(".5 + x", 1.0), 1.5);
    }

    #[test]
    fn domain_errors_are_nan_not_failures() {
        assert!(eval("sqrt(x)", -1.0).is_nan());
        assert!(eval("ln(x)", -1.0).is_nan());
        assert!(eval("1/x", 0.0).is_infinite());
    }

    #[test]
    fn rejects_names_outside_allow_list() {
        assert_eq!(
            Expr::parse("__import__(x)"),
            Err(ExprError::UnknownName {
                name: "__import__".to_string()
            })
        );
        assert_eq!(
            Expr::parse("y + 1"),
            Err(ExprError::UnknownName {
                name: "y".to_string()
            })
        );
        assert!(matches!(
            Expr::parse("os.system(x)"),
            Err(ExprError::UnknownName { .. })
        ));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(Expr::parse("   "), Err(ExprError::Empty));
        assert_eq!(Expr::parse("x +"), Err(ExprError::UnexpectedEnd));
        assert!(matches!(
            Expr::parse("x ) 2"),
            Err(ExprError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            Expr::parse("x; 2"),
            Err(ExprError::UnexpectedChar { ch: ';', .. })
        ));
        assert!(matches!(
            Expr::parse("2e"),
            Err(ExprError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            Expr::parse("1.2.3"),
            Err(ExprError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn call_shape_is_checked() {
        assert_eq!(
            Expr::parse("sin(x, 2)"),
            Err(ExprError::Arity {
                name: "sin".to_string(),
                got: 2
            })
        );
        assert_eq!(
            Expr::parse("sin"),
            Err(ExprError::MissingCall {
                name: "sin".to_string()
            })
        );
        assert_eq!(
            Expr::parse("pi(2)"),
            Err(ExprError::NotCallable {
                name: "pi".to_string()
            })
        );
    }

    #[test]
    fn nesting_is_bounded() {
        let deep_parens = format!("{}x{}", "(".repeat(100_000), ")".repeat(100_000));
        assert!(Expr::parse(&deep_parens).is_err());
        assert!(Expr::parse(&format!("{}x", "-".repeat(100_000))).is_err());

        let parens = |n: usize| format!("{}x{}", "(".repeat(n), ")".repeat(n));
        assert_eq!(
            Expr::parse(&parens(MAX_DEPTH + 1)),
            Err(ExprError::TooDeep { max: MAX_DEPTH })
        );
        assert_eq!(
            Expr::parse(&format!("{}x", "-".repeat(MAX_DEPTH + 1))),
            Err(ExprError::TooDeep { max: MAX_DEPTH })
        );
        assert_eq!(
            Expr::parse(&format!("2{}", "^2".repeat(MAX_DEPTH + 1))),
            Err(ExprError::TooDeep { max: MAX_DEPTH })
        );
        assert_eq!(
            Expr::parse(&format!("{}x{}", "sin(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1))),
            Err(ExprError::TooDeep { max: MAX_DEPTH })
        );

        assert_eq!(eval(&parens(MAX_DEPTH - 2), 3.0), 3.0);
        assert_eq!(eval(&format!("{}x", "-".repeat(100)), 3.0), 3.0);
    }

    #[test]
    fn long_chains_are_bounded() {
        let chain = |n: usize| vec!["x"; n].join("+");
        assert_eq!(
            Expr::parse(&chain(MAX_TOKENS)),
            Err(ExprError::TooLong { max: MAX_TOKENS })
        );
        assert_eq!(eval(&chain(1000), 1.0), 1000.0);
    }

    #[test]
    fn linspace_includes_both_ends() {
        let xs = linspace(-1.0, 1.0, 1000);
        assert_eq!(xs.len(), 1000);
        assert_eq!(xs[0], -1.0);
        assert_eq!(xs[999], 1.0);
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
    }

    #[test]
    fn linspace_spans_the_whole_float_range() {
        let xs = linspace(-1.7e308, 1.7e308, 1000);
        assert_eq!(xs[0], -1.7e308);
        assert_eq!(xs[999], 1.7e308);
        assert!(xs.iter().all(|x| x.is_finite()));
        assert!(xs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn square_sampled_pointwise() {
        let samples = Expr::parse("x^2").unwrap().sample(-1.0, 1.0, 1000);
        assert_eq!(samples.len(), 1000);
        for (x, y) in samples.xs.iter().zip(&samples.ys) {
            assert!((y - x * x).abs() < 1e-12, "x={} y={}", x, y);
        }
    }

    #[test]
    fn segments_split_on_non_finite_values() {
        let samples = Samples {
            xs: vec![0.0, 1.0, 2.0, 3.0, 4.0],
            ys: vec![1.0, f64::NAN, 2.0, 3.0, f64::INFINITY],
        };
        let segments = samples.finite_segments();
        assert_eq!(segments, vec![vec![(0.0, 1.0)], vec![(2.0, 2.0), (3.0, 3.0)]]);
        assert_eq!(samples.finite_range(), Some((1.0, 3.0)));
    }

    proptest! {
        #[test]
        fn polynomial_matches_direct_computation(a in -10.0f64..10.0, b in -10.0f64..10.0, x in -100.0f64..100.0) {
            let src = format!("({a}) * x^2 + ({b}) * x - 3");
            let got = Expr::parse(&src).unwrap().eval(x);
            let want = a * x.powf(2.0) + b * x - 3.0;
            prop_assert!((got - want).abs() <= 1e-9 * want.abs().max(1.0));
        }

        #[test]
        fn parser_never_panics(src in "[x0-9+*/%^().a-z -]{0,24}") {
            let _ = Expr::parse(&src);
        }
    }
}
