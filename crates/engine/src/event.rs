//! Symbolic key events – the only input the calculator accepts.
//!
//! Presentation layers translate clicks and key presses into [`Event`]s.
//! Symbols cover the keypad glyphs, plain ASCII spellings and the keyboard
//! bindings of a desktop calculator (Return, BackSpace, Escape, ...).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl BinaryOp {
    /// Glyph shown after the left operand while the operator is pending.
    pub fn display_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "×",
            BinaryOp::Div => "÷",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "^",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryFn {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Log10,
    Ln,
    Sqrt,
    Square,
    Cube,
    Pow10,
    Reciprocal,
    Factorial,
    Abs,
}

impl UnaryFn {
    pub fn name(self) -> &'static str {
        match self {
            UnaryFn::Sin => "sin",
            UnaryFn::Cos => "cos",
            UnaryFn::Tan => "tan",
            UnaryFn::Asin => "asin",
            UnaryFn::Acos => "acos",
            UnaryFn::Atan => "atan",
            UnaryFn::Log10 => "log10",
            UnaryFn::Ln => "ln",
            UnaryFn::Sqrt => "sqrt",
            UnaryFn::Square => "square",
            UnaryFn::Cube => "cube",
            UnaryFn::Pow10 => "pow10",
            UnaryFn::Reciprocal => "reciprocal",
            UnaryFn::Factorial => "factorial",
            UnaryFn::Abs => "abs",
        }
    }

    /// sin, cos, tan: the argument is an angle.
    pub fn is_trig(self) -> bool {
        matches!(self, UnaryFn::Sin | UnaryFn::Cos | UnaryFn::Tan)
    }

    /// asin, acos, atan: the result is an angle.
    pub fn is_inverse_trig(self) -> bool {
        matches!(self, UnaryFn::Asin | UnaryFn::Acos | UnaryFn::Atan)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    /// Full-precision decimal text written into the input buffer.
    pub fn literal(self) -> &'static str {
        match self {
            Constant::Pi => "3.141592653589793",
            Constant::E => "2.718281828459045",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Paren {
    Open,
    Close,
}

impl Paren {
    pub fn as_char(self) -> char {
        match self {
            Paren::Open => '(',
            Paren::Close => ')',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleMode {
    #[default]
    Degrees,
    Radians,
}

impl AngleMode {
    pub fn toggled(self) -> Self {
        match self {
            AngleMode::Degrees => AngleMode::Radians,
            AngleMode::Radians => AngleMode::Degrees,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AngleMode::Degrees => "DEG",
            AngleMode::Radians => "RAD",
        }
    }
}

impl FromStr for AngleMode {
    type Err = ParseEventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "deg" | "degrees" => Ok(AngleMode::Degrees),
            "rad" | "radians" => Ok(AngleMode::Radians),
            _ => Err(ParseEventError::Unknown(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Event {
    Digit(u8),
    Decimal,
    Operator(BinaryOp),
    Unary(UnaryFn),
    Constant(Constant),
    Paren(Paren),
    Equals,
    Clear,
    Backspace,
    ToggleAngleMode,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseEventError {
    #[error("unknown key: {0}")]
    Unknown(String),
    #[error("empty key")]
    Empty,
}

impl FromStr for Event {
    type Err = ParseEventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseEventError::Empty);
        }

        // Glyphs and case-sensitive bindings first: "e" is Euler's number,
        // "C" and "c" both clear.
        let event = match s {
            "0" | "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9" => {
                Event::Digit(s.as_bytes()[0] - b'0')
            }
            "." | "," => Event::Decimal,
            "+" => Event::Operator(BinaryOp::Add),
            "-" | "−" => Event::Operator(BinaryOp::Sub),
            "*" | "×" | "x" => Event::Operator(BinaryOp::Mul),
            "/" | "÷" => Event::Operator(BinaryOp::Div),
            "%" => Event::Operator(BinaryOp::Mod),
            "^" | "**" => Event::Operator(BinaryOp::Pow),
            "√" => Event::Unary(UnaryFn::Sqrt),
            "x²" => Event::Unary(UnaryFn::Square),
            "x³" => Event::Unary(UnaryFn::Cube),
            "10^x" => Event::Unary(UnaryFn::Pow10),
            "1/x" => Event::Unary(UnaryFn::Reciprocal),
            "x!" | "!" => Event::Unary(UnaryFn::Factorial),
            "|x|" => Event::Unary(UnaryFn::Abs),
            "π" => Event::Constant(Constant::Pi),
            "e" => Event::Constant(Constant::E),
            "(" => Event::Paren(Paren::Open),
            ")" => Event::Paren(Paren::Close),
            "=" => Event::Equals,
            "C" | "c" => Event::Clear,
            "⌫" => Event::Backspace,
            "DEG/RAD" => Event::ToggleAngleMode,
            _ => return parse_word(s),
        };
        Ok(event)
    }
}

fn parse_word(s: &str) -> Result<Event, ParseEventError> {
    let event = match s.to_ascii_lowercase().as_str() {
        "sin" => Event::Unary(UnaryFn::Sin),
        "cos" => Event::Unary(UnaryFn::Cos),
        "tan" => Event::Unary(UnaryFn::Tan),
        "asin" => Event::Unary(UnaryFn::Asin),
        "acos" => Event::Unary(UnaryFn::Acos),
        "atan" => Event::Unary(UnaryFn::Atan),
        "log" | "log10" => Event::Unary(UnaryFn::Log10),
        "ln" => Event::Unary(UnaryFn::Ln),
        "sqrt" => Event::Unary(UnaryFn::Sqrt),
        "sq" | "square" => Event::Unary(UnaryFn::Square),
        "cube" => Event::Unary(UnaryFn::Cube),
        "pow10" => Event::Unary(UnaryFn::Pow10),
        "recip" | "reciprocal" => Event::Unary(UnaryFn::Reciprocal),
        "fact" | "factorial" => Event::Unary(UnaryFn::Factorial),
        "abs" => Event::Unary(UnaryFn::Abs),
        "pi" => Event::Constant(Constant::Pi),
        "mod" => Event::Operator(BinaryOp::Mod),
        "pow" => Event::Operator(BinaryOp::Pow),
        "return" | "enter" => Event::Equals,
        "clear" | "escape" | "delete" => Event::Clear,
        "backspace" => Event::Backspace,
        "mode" | "deg/rad" => Event::ToggleAngleMode,
        _ => return Err(ParseEventError::Unknown(s.to_string())),
    };
    Ok(event)
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Digit(d) => write!(f, "{}", d),
            Event::Decimal => f.write_str("."),
            Event::Operator(op) => f.write_str(op.display_symbol()),
            Event::Unary(fun) => f.write_str(fun.name()),
            Event::Constant(Constant::Pi) => f.write_str("π"),
            Event::Constant(Constant::E) => f.write_str("e"),
            Event::Paren(p) => write!(f, "{}", p.as_char()),
            Event::Equals => f.write_str("="),
            Event::Clear => f.write_str("C"),
            Event::Backspace => f.write_str("⌫"),
            Event::ToggleAngleMode => f.write_str("DEG/RAD"),
        }
    }
}

/// Split a key line into events.
///
/// Keys are separated by whitespace; a token made only of digits and decimal
/// points is expanded into one event per character, so `"3.5 + 2 ="` yields
/// `3 . 5 + 2 =`.
pub fn tokenize_keys(line: &str) -> Result<Vec<Event>, ParseEventError> {
    let mut events = Vec::new();
    for token in line.split_whitespace() {
        let numeric = token.len() > 1 && token.chars().all(|c| c.is_ascii_digit() || c == '.');
        if numeric {
            for c in token.chars() {
                let mut buf = [0u8; 4];
                events.push(c.encode_utf8(&mut buf).parse()?);
            }
        } else {
            events.push(token.parse()?);
        }
    }
    Ok(events)
}

/// Every canonical key symbol, in keypad order.
pub fn key_symbols() -> Vec<&'static str> {
    vec![
        "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", ".", "+", "-", "×", "÷", "%", "^", "=",
        "C", "⌫", "sin", "cos", "tan", "asin", "acos", "atan", "log", "ln", "√", "x²", "x³",
        "10^x", "1/x", "x!", "|x|", "π", "e", "(", ")", "DEG/RAD",
    ]
}
