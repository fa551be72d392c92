//! Human-readable function signature grammar.
//!
//! ```text
//! signature  := name "(" paramlist? ")"
//! paramlist  := param ("," param)*
//! param      := type modifier* name?
//! modifier   := "memory" | "calldata" | "storage" | "indexed"
//! type       := elementary | type "[" digits? "]" | "(" paramlist ")"
//! elementary := "uint" digits? | "int" digits? | "address" | "bool"
//!             | "bytes" digits? | "string"
//! ```
//!
//! ASCII whitespace is allowed between tokens but never inside one.
//! Parameter names are kept for display and ignored for typing. Nothing is
//! coerced: unknown keywords, bad widths, zero-length arrays, unbalanced
//! parentheses and trailing text all fail with a [`SyntaxError`].

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::{
    error::SyntaxError,
    selector::Selector,
    types::{ParamType, TupleField},
};

/// Tuples and arrays nested deeper than this are rejected.
pub const MAX_NESTING: usize = 64;

const MODIFIERS: &[&str] = &["memory", "calldata", "storage", "indexed"];

/// A parsed function signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub name: String,
    pub parameters: Vec<ParamType>,
    /// Optional parameter names, index-aligned with `parameters`.
    #[serde(default)]
    pub param_names: Vec<Option<String>>,
}

impl Signature {
    /// Canonical text: `name(t1,t2,...)` without names or whitespace.
    pub fn canonical(&self) -> String {
        self.to_string()
    }

    /// The 4-byte selector derived from the canonical text.
    pub fn selector(&self) -> Selector {
        Selector::from_signature_text(&self.canonical())
    }

    /// Name of the parameter at `index`, if the source text carried one.
    pub fn param_name(&self, index: usize) -> Option<&str> {
        self.param_names.get(index)?.as_deref()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, ty) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{ty}")?;
        }
        write!(f, ")")
    }
}

impl FromStr for Signature {
    type Err = SyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Parse a textual function signature.
pub fn parse(text: &str) -> Result<Signature, SyntaxError> {
    let mut parser = Parser::new(text);
    parser.skip_ws();
    let name_start = parser.pos;
    let name = parser.identifier();
    if name.is_empty() {
        return Err(parser.error_at(name_start, "expected a function name"));
    }
    if name.as_bytes()[0].is_ascii_digit() {
        return Err(parser.error_span(name_start, parser.pos, "function name cannot start with a digit"));
    }
    let name = name.to_string();

    parser.skip_ws();
    parser.expect(b'(')?;
    let fields = parser.param_list(0, true)?;
    parser.skip_ws();
    if parser.pos < text.len() {
        let reason = if parser.peek() == Some(b')') {
            "unbalanced parentheses"
        } else {
            "trailing characters after the closing parenthesis"
        };
        return Err(parser.error_span(parser.pos, text.len(), reason));
    }

    let (param_names, parameters) = fields.into_iter().map(|f| (f.name, f.ty)).unzip();
    Ok(Signature {
        name,
        parameters,
        param_names,
    })
}

/// Parse a single type expression such as `(uint256,bytes)[]`.
pub fn parse_type(text: &str) -> Result<ParamType, SyntaxError> {
    let mut parser = Parser::new(text);
    parser.skip_ws();
    let ty = parser.ty(0)?;
    parser.skip_ws();
    if parser.pos < text.len() {
        return Err(parser.error_span(parser.pos, text.len(), "trailing characters after type"));
    }
    Ok(ty)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, want: u8) -> Result<(), SyntaxError> {
        match self.peek() {
            Some(b) if b == want => {
                self.pos += 1;
                Ok(())
            }
            Some(_) => Err(self.error_here(&format!("expected '{}'", want as char))),
            None => Err(self.error_here(&format!(
                "unexpected end of input, expected '{}'",
                want as char
            ))),
        }
    }

    /// Consume `[A-Za-z0-9_$]*` and return it.
    fn identifier(&mut self) -> &'a str {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'$')
        {
            self.pos += 1;
        }
        &self.src[start..self.pos]
    }

    /// Parses the members after an already consumed `(` up to and including
    /// the matching `)`. Only the outermost list may be empty.
    fn param_list(&mut self, depth: usize, allow_empty: bool) -> Result<Vec<TupleField>, SyntaxError> {
        let open = self.pos.saturating_sub(1);
        self.skip_ws();
        if self.peek() == Some(b')') {
            if allow_empty {
                self.pos += 1;
                return Ok(Vec::new());
            }
            return Err(self.error_span(open, self.pos + 1, "empty tuple"));
        }

        let mut fields = Vec::new();
        loop {
            self.skip_ws();
            let ty = self.ty(depth)?;
            let name = self.param_name()?;
            fields.push(TupleField { name, ty });

            self.skip_ws();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b')') => {
                    self.pos += 1;
                    return Ok(fields);
                }
                None => {
                    return Err(self.error_span(open, self.src.len(), "unbalanced parentheses: missing ')'"))
                }
                Some(_) => return Err(self.error_here("expected ',' or ')'")),
            }
        }
    }

    /// An optional parameter name following a type, separated by whitespace.
    /// Data-location keywords and `indexed` before the name are dropped.
    fn param_name(&mut self) -> Result<Option<String>, SyntaxError> {
        loop {
            let before = self.pos;
            self.skip_ws();
            let start = self.pos;
            let ident = self.identifier();
            if ident.is_empty() {
                self.pos = before;
                return Ok(None);
            }
            if start == before {
                // e.g. `uint256x`: the identifier is glued to the type
                return Err(self.error_span(start, self.pos, "unexpected characters after type"));
            }
            if MODIFIERS.contains(&ident) {
                continue;
            }
            if ident.as_bytes()[0].is_ascii_digit() {
                return Err(self.error_span(start, self.pos, "parameter name cannot start with a digit"));
            }
            return Ok(Some(ident.to_string()));
        }
    }

    fn ty(&mut self, depth: usize) -> Result<ParamType, SyntaxError> {
        if depth >= MAX_NESTING {
            return Err(self.error_here("type nesting too deep"));
        }
        let mut ty = if self.peek() == Some(b'(') {
            self.pos += 1;
            ParamType::Tuple(self.param_list(depth + 1, false)?)
        } else {
            self.elementary()?
        };

        let mut dims = 0usize;
        loop {
            let before = self.pos;
            self.skip_ws();
            if self.peek() != Some(b'[') {
                self.pos = before;
                return Ok(ty);
            }
            dims += 1;
            if depth + dims >= MAX_NESTING {
                return Err(self.error_here("type nesting too deep"));
            }
            let open = self.pos;
            self.pos += 1;
            self.skip_ws();
            let digits_start = self.pos;
            while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                self.pos += 1;
            }
            let digits = &self.src[digits_start..self.pos];
            self.skip_ws();
            match self.peek() {
                Some(b']') => self.pos += 1,
                None => return Err(self.error_span(open, self.src.len(), "unclosed array bracket")),
                Some(_) => return Err(self.error_here("expected array length or ']'")),
            }

            ty = if digits.is_empty() {
                ParamType::Array(Box::new(ty))
            } else {
                let len = self.number(digits, digits_start, "array length")?;
                if len == 0 {
                    return Err(self.error_span(open, self.pos, "fixed array length must be at least 1"));
                }
                ParamType::FixedArray {
                    elem: Box::new(ty),
                    len,
                }
            };
        }
    }

    fn elementary(&mut self) -> Result<ParamType, SyntaxError> {
        let start = self.pos;
        let word = self.identifier();
        if word.is_empty() {
            return match self.peek() {
                None => Err(self.error_here("unexpected end of input, expected a type")),
                Some(b')') => Err(self.error_here("unbalanced parentheses or missing type")),
                Some(_) => Err(self.error_here("expected a type")),
            };
        }
        let split = word
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(word.len());
        let (keyword, digits) = word.split_at(split);
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(self.error_span(start, self.pos, "unknown type"));
        }
        let digits_at = start + split;

        let ty = match (keyword, digits.is_empty()) {
            ("uint", true) => ParamType::Uint(256),
            ("int", true) => ParamType::Int(256),
            ("uint", false) => ParamType::Uint(self.bit_width(digits, digits_at)?),
            ("int", false) => ParamType::Int(self.bit_width(digits, digits_at)?),
            ("bytes", true) => ParamType::Bytes,
            ("bytes", false) => {
                let n = self.number(digits, digits_at, "bytes length")?;
                if !(1..=32).contains(&n) {
                    return Err(self.error_span(start, self.pos, "fixed bytes length must be between 1 and 32"));
                }
                ParamType::FixedBytes(n as u8)
            }
            ("address", true) => ParamType::Address,
            ("bool", true) => ParamType::Bool,
            ("string", true) => ParamType::String,
            _ => return Err(self.error_span(start, self.pos, "unknown type")),
        };
        Ok(ty)
    }

    fn bit_width(&self, digits: &str, at: usize) -> Result<u16, SyntaxError> {
        let bits = self.number(digits, at, "bit width")?;
        if bits == 0 || bits > 256 || bits % 8 != 0 {
            return Err(self.error_span(
                at,
                at + digits.len(),
                "bit width must be a multiple of 8 between 8 and 256",
            ));
        }
        Ok(bits as u16)
    }

    fn number(&self, digits: &str, at: usize, what: &str) -> Result<usize, SyntaxError> {
        if digits.len() > 1 && digits.starts_with('0') {
            return Err(self.error_span(at, at + digits.len(), &format!("{what} has leading zeros")));
        }
        digits
            .parse::<usize>()
            .map_err(|_| self.error_span(at, at + digits.len(), &format!("{what} out of range")))
    }

    fn error_here(&self, reason: &str) -> SyntaxError {
        self.error_at(self.pos, reason)
    }

    /// Error whose fragment is the remainder of the current token.
    fn error_at(&self, pos: usize, reason: &str) -> SyntaxError {
        let rest = &self.src[pos.min(self.src.len())..];
        let end = rest
            .find(|c: char| c == ',' || c == ')' || c.is_ascii_whitespace())
            .map(|i| i.max(1))
            .unwrap_or(rest.len());
        self.error_span(pos, pos + end, reason)
    }

    fn error_span(&self, start: usize, end: usize, reason: &str) -> SyntaxError {
        let start = start.min(self.src.len());
        let end = end.clamp(start, self.src.len());
        SyntaxError {
            position: start,
            fragment: self.src.get(start..end).unwrap_or_default().to_string(),
            reason: reason.to_string(),
        }
    }
}
