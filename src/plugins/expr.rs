//! Restricted arithmetic expressions for the calculator.
//!
//! Grammar (lowest to highest precedence):
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary (('^' | '**') unary)?
//! primary := NUMBER | FUNC '(' expr ')' | '(' expr ')'
//! FUNC    := sqrt | log | sin | cos | tan
//! ```
//!
//! `^` is right-associative and binds tighter than a leading minus, so
//! `-2^2` is `-4` and `2^3^2` is `512`. `log` is base 10 and the
//! trigonometric functions take degrees.

use std::fmt;
use thiserror::Error;

/// Decimal places kept in a calculator result.
pub const RESULT_PRECISION: i32 = 5;

/// Deepest expression tree the parser will build. Parsing, evaluation and
/// drop all recurse over the tree.
pub const MAX_NESTING: usize = 256;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    #[error("Division by zero.")]
    DivisionByZero,
    #[error("Invalid math domain: {0}")]
    Domain(String),
    #[error("Invalid expression: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    Sqrt,
    Log,
    Sin,
    Cos,
    Tan,
}

impl Func {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "sqrt" => Some(Func::Sqrt),
            "log" => Some(Func::Log),
            "sin" => Some(Func::Sin),
            "cos" => Some(Func::Cos),
            "tan" => Some(Func::Tan),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Func::Sqrt => "sqrt",
            Func::Log => "log",
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
        }
    }

    fn apply(&self, x: f64) -> Result<f64, ExprError> {
        match self {
            Func::Sqrt if x < 0.0 => Err(ExprError::Domain(format!("sqrt({})", x))),
            Func::Sqrt => Ok(x.sqrt()),
            Func::Log if x <= 0.0 => Err(ExprError::Domain(format!("log({})", x))),
            Func::Log => Ok(x.log10()),
            Func::Sin => Ok(x.to_radians().sin()),
            Func::Cos => Ok(x.to_radians().cos()),
            Func::Tan => Ok(x.to_radians().tan()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Neg(Box<Expr>),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        func: Func,
        arg: Box<Expr>,
    },
}

impl Expr {
    pub fn eval(&self) -> Result<f64, ExprError> {
        let value = match self {
            Expr::Number(n) => *n,
            Expr::Neg(inner) => -inner.eval()?,
            Expr::Call { func, arg } => func.apply(arg.eval()?)?,
            Expr::Binary { op, lhs, rhs } => {
                let l = lhs.eval()?;
                let r = rhs.eval()?;
                match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => {
                        if r == 0.0 {
                            return Err(ExprError::DivisionByZero);
                        }
                        l / r
                    }
                    BinOp::Pow => {
                        if l == 0.0 && r < 0.0 {
                            return Err(ExprError::DivisionByZero);
                        }
                        if l < 0.0 && r.fract() != 0.0 {
                            return Err(ExprError::Domain(format!("{}^{}", l, r)));
                        }
                        l.powf(r)
                    }
                }
            }
        };
        if !value.is_finite() {
            return Err(ExprError::Domain("result out of range".to_string()));
        }
        Ok(value)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Neg(inner) => write!(f, "(-{})", inner),
            Expr::Call { func, arg } => write!(f, "{}({})", func.name(), arg),
            Expr::Binary { op, lhs, rhs } => {
                let sym = match op {
                    BinOp::Add => "+",
                    BinOp::Sub => "-",
                    BinOp::Mul => "*",
                    BinOp::Div => "/",
                    BinOp::Pow => "^",
                };
                write!(f, "({} {} {})", lhs, sym, rhs)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, ExprError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' if chars.get(i + 1) == Some(&'*') => {
                tokens.push(Token::Caret);
                i += 2;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '^' => {
                tokens.push(Token::Caret);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // Optional exponent, only when digits follow.
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        while j < chars.len() && chars[j].is_ascii_digit() {
                            j += 1;
                        }
                        i = j;
                    }
                }
                let text: String = chars[start..i].iter().collect();
                let n: f64 = text
                    .parse()
                    .map_err(|_| ExprError::Invalid(format!("bad number '{}'", text)))?;
                tokens.push(Token::Number(n));
            }
            c if c.is_ascii_alphabetic() => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_alphabetic() {
                    i += 1;
                }
                let name: String = chars[start..i].iter().collect();
                tokens.push(Token::Ident(name.to_lowercase()));
            }
            other => {
                return Err(ExprError::Invalid(format!("unexpected character '{}'", other)));
            }
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
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

    fn expect(&mut self, want: Token) -> Result<(), ExprError> {
        match self.next() {
            Some(tok) if tok == want => Ok(()),
            Some(tok) => Err(ExprError::Invalid(format!(
                "expected {:?}, found {:?}",
                want, tok
            ))),
            None => Err(ExprError::Invalid(format!(
                "expected {:?}, found end of input",
                want
            ))),
        }
    }

    fn expr(&mut self) -> Result<Expr, ExprError> {
        // Each operand in a chain nests the tree one level deeper.
        let base = self.depth;
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => {
                    self.depth = base;
                    return Ok(lhs);
                }
            };
            self.pos += 1;
            self.descend()?;
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn term(&mut self) -> Result<Expr, ExprError> {
        let base = self.depth;
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                _ => {
                    self.depth = base;
                    return Ok(lhs);
                }
            };
            self.pos += 1;
            self.descend()?;
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    /// One level deeper into the tree.
    fn descend(&mut self) -> Result<(), ExprError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(ExprError::Invalid(
                "expression nested too deeply".to_string(),
            ));
        }
        Ok(())
    }

    /// Parentheses, calls, signs and exponents all recurse through here.
    fn unary(&mut self) -> Result<Expr, ExprError> {
        self.descend()?;
        let parsed = self.unary_inner();
        self.depth -= 1;
        parsed
    }

    fn unary_inner(&mut self) -> Result<Expr, ExprError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(Expr::Neg(Box::new(self.unary()?)))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Expr, ExprError> {
        let base = self.primary()?;
        if let Some(Token::Caret) = self.peek() {
            self.pos += 1;
            let exponent = self.unary()?;
            return Ok(Expr::Binary {
                op: BinOp::Pow,
                lhs: Box::new(base),
                rhs: Box::new(exponent),
            });
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr, ExprError> {
        match self.next() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Ident(name)) => {
                let func = Func::from_name(&name)
                    .ok_or_else(|| ExprError::Invalid(format!("unknown function '{}'", name)))?;
                self.expect(Token::LParen)?;
                let arg = self.expr()?;
                self.expect(Token::RParen)?;
                Ok(Expr::Call {
                    func,
                    arg: Box::new(arg),
                })
            }
            Some(tok) => Err(ExprError::Invalid(format!("unexpected {:?}", tok))),
            None => Err(ExprError::Invalid("unexpected end of input".to_string())),
        }
    }
}

/// Parse `input` into an expression tree.
pub fn parse(input: &str) -> Result<Expr, ExprError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ExprError::Invalid("empty expression".to_string()));
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.expr()?;
    if let Some(tok) = parser.peek() {
        return Err(ExprError::Invalid(format!("unexpected {:?}", tok)));
    }
    Ok(expr)
}

/// Parse and evaluate, rounding to [`RESULT_PRECISION`] decimal places.
pub fn evaluate(input: &str) -> Result<f64, ExprError> {
    let value = parse(input)?.eval()?;
    let scale = 10f64.powi(RESULT_PRECISION);
    let scaled = value * scale;
    // Values this large carry no fractional digits to round away.
    if !scaled.is_finite() {
        return Ok(value);
    }
    let rounded = scaled.round() / scale;
    // Avoid reporting -0 for tiny negative results such as cos(90).
    Ok(if rounded == 0.0 { 0.0 } else { rounded })
}
