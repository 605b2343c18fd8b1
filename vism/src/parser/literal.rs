//! Safe literal evaluation for Assign-Literal buffers.
//!
//! Implements the surface literal grammar: numbers (including imaginary and
//! real±imaginary forms), strings, byte strings, `None`/`True`/`False`, and
//! arbitrarily nested lists, tuples, sets and dicts. Anything else is
//! rejected; there is no evaluation of names or calls.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use vism_asm::{Complex, Value};

/// Why a buffer failed literal evaluation. Surfaced as E002.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum LiteralError {
    #[error("unexpected end of literal")]
    UnexpectedEnd,
    #[error("unexpected character {0:?}")]
    Unexpected(char),
    #[error("malformed number `{0}`")]
    MalformedNumber(String),
    #[error("unknown name `{0}`")]
    UnknownName(String),
    #[error("invalid `\\x` escape")]
    BadHexEscape,
    #[error("byte strings only accept ascii")]
    NonAsciiBytes,
    #[error("`+`/`-` combine a real and an imaginary number only")]
    TrailingArithmetic,
    #[error("trailing characters after literal")]
    TrailingInput,
}

/// Evaluate a re-escaped Assign-Literal buffer.
pub(crate) fn parse_literal(src: &str) -> Result<Value, LiteralError> {
    let chars: Vec<char> = src.chars().collect();
    let mut cursor = Cursor {
        chars: &chars,
        pos: 0,
    };

    cursor.skip_ws();
    let value = cursor.parse_expr()?;
    cursor.skip_ws();

    if !cursor.at_end() {
        return Err(LiteralError::TrailingInput);
    }

    Ok(value)
}

struct Cursor<'a> {
    chars: &'a [char],
    pos: usize,
}

impl Cursor<'_> {
    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn take(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), LiteralError> {
        match self.take() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(LiteralError::Unexpected(c)),
            None => Err(LiteralError::UnexpectedEnd),
        }
    }

    /// A term, optionally followed by `± imaginary` to form a complex number.
    fn parse_expr(&mut self) -> Result<Value, LiteralError> {
        let first = self.parse_term()?;
        self.skip_ws();

        match self.peek() {
            Some(sign @ ('+' | '-')) => {
                self.take();
                self.skip_ws();
                let second = self.parse_term()?;
                combine_complex(first, sign, second)
            }
            _ => Ok(first),
        }
    }

    fn parse_term(&mut self) -> Result<Value, LiteralError> {
        self.skip_ws();

        match self.peek() {
            None => Err(LiteralError::UnexpectedEnd),
            Some(sign @ ('+' | '-')) => {
                self.take();
                let value = self.parse_term()?;
                apply_sign(value, sign == '-')
            }
            Some(quote @ ('"' | '\'')) => {
                self.take();
                self.parse_str_body(quote).map(Value::Str)
            }
            Some('b' | 'B') if matches!(self.peek_at(1), Some('"' | '\'')) => {
                self.take();
                let quote = self.take().ok_or(LiteralError::UnexpectedEnd)?;
                self.parse_bytes_body(quote).map(Value::Bytes)
            }
            Some('[') => self.parse_seq(),
            Some('(') => self.parse_tuple(),
            Some('{') => self.parse_braced(),
            Some(c) if c.is_ascii_digit() || c == '.' => self.parse_number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.parse_name(),
            Some(c) => Err(LiteralError::Unexpected(c)),
        }
    }

    fn parse_name(&mut self) -> Result<Value, LiteralError> {
        let mut name = String::new();
        while let Some(c) = self.peek().filter(|c| c.is_alphanumeric() || *c == '_') {
            name.push(c);
            self.pos += 1;
        }

        match name.as_str() {
            "None" => Ok(Value::None),
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            _ => Err(LiteralError::UnknownName(name)),
        }
    }

    fn parse_number(&mut self) -> Result<Value, LiteralError> {
        let mut raw = String::new();
        let mut prev = '\0';
        while let Some(c) = self.peek() {
            let is_exp_sign =
                (c == '+' || c == '-') && (prev == 'e' || prev == 'E') && !raw.starts_with("0x");
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || is_exp_sign {
                raw.push(c);
                self.pos += 1;
                prev = c;
            } else {
                break;
            }
        }

        let digits: String = raw.chars().filter(|c| *c != '_').collect();
        let malformed = || LiteralError::MalformedNumber(raw.clone());

        if let Some(base) = digits.strip_suffix(['j', 'J']) {
            if base.is_empty() {
                return Err(malformed());
            }
            let im: f64 = base.parse().map_err(|_| malformed())?;
            return Ok(Value::Complex(Complex::new(0.0, im)));
        }

        if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
            return i64::from_str_radix(hex, 16)
                .map(Value::Int)
                .map_err(|_| malformed());
        }
        if let Some(oct) = digits.strip_prefix("0o").or_else(|| digits.strip_prefix("0O")) {
            return i64::from_str_radix(oct, 8)
                .map(Value::Int)
                .map_err(|_| malformed());
        }
        if let Some(bin) = digits.strip_prefix("0b").or_else(|| digits.strip_prefix("0B")) {
            return i64::from_str_radix(bin, 2)
                .map(Value::Int)
                .map_err(|_| malformed());
        }

        if digits.contains(['.', 'e', 'E']) {
            return digits.parse().map(Value::Float).map_err(|_| malformed());
        }

        digits.parse().map(Value::Int).map_err(|_| malformed())
    }

    fn parse_str_body(&mut self, quote: char) -> Result<String, LiteralError> {
        let mut out = String::new();

        loop {
            match self.take() {
                None => return Err(LiteralError::UnexpectedEnd),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.take() {
                    None => return Err(LiteralError::UnexpectedEnd),
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('a') => out.push('\u{0007}'),
                    Some('b') => out.push('\u{0008}'),
                    Some('f') => out.push('\u{000C}'),
                    Some('v') => out.push('\u{000B}'),
                    Some('0') => out.push('\0'),
                    Some('\\') => out.push('\\'),
                    Some('\'') => out.push('\''),
                    Some('"') => out.push('"'),
                    Some('x') => out.push(self.hex_escape(2)?),
                    Some('u') => out.push(self.hex_escape(4)?),
                    // Unknown escapes are kept verbatim.
                    Some(c) => {
                        out.push('\\');
                        out.push(c);
                    }
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_bytes_body(&mut self, quote: char) -> Result<Vec<u8>, LiteralError> {
        let mut out = Vec::new();

        loop {
            match self.take() {
                None => return Err(LiteralError::UnexpectedEnd),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.take() {
                    None => return Err(LiteralError::UnexpectedEnd),
                    Some('n') => out.push(b'\n'),
                    Some('t') => out.push(b'\t'),
                    Some('r') => out.push(b'\r'),
                    Some('0') => out.push(0),
                    Some('\\') => out.push(b'\\'),
                    Some('\'') => out.push(b'\''),
                    Some('"') => out.push(b'"'),
                    Some('x') => {
                        let c = self.hex_escape(2)?;
                        out.push(c as u8);
                    }
                    Some(c) if c.is_ascii() => {
                        out.push(b'\\');
                        out.push(c as u8);
                    }
                    Some(_) => return Err(LiteralError::NonAsciiBytes),
                },
                Some(c) if c.is_ascii() => out.push(c as u8),
                Some(_) => return Err(LiteralError::NonAsciiBytes),
            }
        }
    }

    fn hex_escape(&mut self, len: usize) -> Result<char, LiteralError> {
        let mut code = 0u32;
        for _ in 0..len {
            let digit = self
                .take()
                .and_then(|c| c.to_digit(16))
                .ok_or(LiteralError::BadHexEscape)?;
            code = code * 16 + digit;
        }

        char::from_u32(code).ok_or(LiteralError::BadHexEscape)
    }

    fn parse_seq(&mut self) -> Result<Value, LiteralError> {
        self.expect('[')?;
        self.parse_items(']').map(Value::Seq)
    }

    fn parse_tuple(&mut self) -> Result<Value, LiteralError> {
        self.expect('(')?;
        self.skip_ws();

        if self.peek() == Some(')') {
            self.take();
            return Ok(Value::Tuple(vec![]));
        }

        let first = self.parse_expr()?;
        self.skip_ws();
        match self.take() {
            // A parenthesized expression, not a tuple.
            Some(')') => Ok(first),
            Some(',') => {
                let mut items = vec![first];
                items.extend(self.parse_items(')')?);
                Ok(Value::Tuple(items))
            }
            Some(c) => Err(LiteralError::Unexpected(c)),
            None => Err(LiteralError::UnexpectedEnd),
        }
    }

    fn parse_braced(&mut self) -> Result<Value, LiteralError> {
        self.expect('{')?;
        self.skip_ws();

        // `{}` is the empty dict; the empty set has no literal form.
        if self.peek() == Some('}') {
            self.take();
            return Ok(Value::Map(BTreeMap::new()));
        }

        let first = self.parse_expr()?;
        self.skip_ws();

        if self.peek() == Some(':') {
            self.take();
            let value = self.parse_expr()?;
            let mut entries = BTreeMap::new();
            entries.insert(first, value);

            loop {
                self.skip_ws();
                match self.take() {
                    Some('}') => return Ok(Value::Map(entries)),
                    Some(',') => {
                        self.skip_ws();
                        if self.peek() == Some('}') {
                            self.take();
                            return Ok(Value::Map(entries));
                        }
                        let key = self.parse_expr()?;
                        self.skip_ws();
                        self.expect(':')?;
                        let value = self.parse_expr()?;
                        entries.insert(key, value);
                    }
                    Some(c) => return Err(LiteralError::Unexpected(c)),
                    None => return Err(LiteralError::UnexpectedEnd),
                }
            }
        }

        let mut items = BTreeSet::new();
        items.insert(first);
        loop {
            self.skip_ws();
            match self.take() {
                Some('}') => return Ok(Value::Set(items)),
                Some(',') => {
                    self.skip_ws();
                    if self.peek() == Some('}') {
                        self.take();
                        return Ok(Value::Set(items));
                    }
                    items.insert(self.parse_expr()?);
                }
                Some(c) => return Err(LiteralError::Unexpected(c)),
                None => return Err(LiteralError::UnexpectedEnd),
            }
        }
    }

    fn parse_items(&mut self, close: char) -> Result<Vec<Value>, LiteralError> {
        let mut items = Vec::new();

        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.take();
                return Ok(items);
            }

            items.push(self.parse_expr()?);
            self.skip_ws();
            match self.take() {
                Some(',') => continue,
                Some(c) if c == close => return Ok(items),
                Some(c) => return Err(LiteralError::Unexpected(c)),
                None => return Err(LiteralError::UnexpectedEnd),
            }
        }
    }
}

fn apply_sign(value: Value, negative: bool) -> Result<Value, LiteralError> {
    if !negative {
        return match value {
            Value::Int(_) | Value::Float(_) | Value::Complex(_) => Ok(value),
            _ => Err(LiteralError::TrailingArithmetic),
        };
    }

    match value {
        Value::Int(v) => v
            .checked_neg()
            .map(Value::Int)
            .ok_or(LiteralError::MalformedNumber(v.to_string())),
        Value::Float(v) => Ok(Value::Float(-v)),
        Value::Complex(v) => Ok(Value::Complex(Complex::new(-v.re, -v.im))),
        _ => Err(LiteralError::TrailingArithmetic),
    }
}

/// `real ± imaginary` composition: the only binary arithmetic the literal
/// grammar admits.
fn combine_complex(first: Value, sign: char, second: Value) -> Result<Value, LiteralError> {
    let re = match first {
        Value::Int(v) => v as f64,
        Value::Float(v) => v,
        _ => return Err(LiteralError::TrailingArithmetic),
    };
    let im = match second {
        Value::Complex(c) if c.re == 0.0 => c.im,
        _ => return Err(LiteralError::TrailingArithmetic),
    };

    let im = if sign == '-' { -im } else { im };
    Ok(Value::Complex(Complex::new(re, im)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Value {
        parse_literal(src).unwrap()
    }

    #[test]
    fn numbers() {
        assert_eq!(parse("42"), Value::Int(42));
        assert_eq!(parse(" -7 "), Value::Int(-7));
        assert_eq!(parse("0x10"), Value::Int(16));
        assert_eq!(parse("0b101"), Value::Int(5));
        assert_eq!(parse("1_000"), Value::Int(1000));
        assert_eq!(parse("2.5"), Value::Float(2.5));
        assert_eq!(parse("1e3"), Value::Float(1000.0));
        assert_eq!(parse("2j"), Value::Complex(Complex::new(0.0, 2.0)));
        assert_eq!(parse("1+2j"), Value::Complex(Complex::new(1.0, 2.0)));
        assert_eq!(parse("1.5-2j"), Value::Complex(Complex::new(1.5, -2.0)));
    }

    #[test]
    fn keywords() {
        assert_eq!(parse("None"), Value::None);
        assert_eq!(parse("True"), Value::Bool(true));
        assert_eq!(parse("False"), Value::Bool(false));
        assert!(matches!(
            parse_literal("nil"),
            Err(LiteralError::UnknownName(_))
        ));
    }

    #[test]
    fn strings_and_bytes() {
        assert_eq!(parse("'hi'"), Value::Str("hi".into()));
        assert_eq!(parse("\"a\\n\\x41\""), Value::Str("a\nA".into()));
        // Unknown escapes stay verbatim.
        assert_eq!(parse("'a\\q'"), Value::Str("a\\q".into()));
        assert_eq!(parse("b'ab\\x00'"), Value::Bytes(vec![b'a', b'b', 0]));
        assert!(matches!(
            parse_literal("'unterminated"),
            Err(LiteralError::UnexpectedEnd)
        ));
    }

    #[test]
    fn containers() {
        assert_eq!(
            parse("[1, 2.0, 'x']"),
            Value::Seq(vec![
                Value::Int(1),
                Value::Float(2.0),
                Value::Str("x".into())
            ])
        );
        assert_eq!(parse("(1,)"), Value::Tuple(vec![Value::Int(1)]));
        assert_eq!(parse("()"), Value::Tuple(vec![]));
        assert_eq!(parse("(1)"), Value::Int(1));
        assert_eq!(
            parse("{1, 2, 3}"),
            Value::Set([Value::Int(1), Value::Int(2), Value::Int(3)].into())
        );
        assert_eq!(parse("{}"), Value::Map(BTreeMap::new()));
        assert_eq!(
            parse("{'a': [1], 'b': {}}"),
            Value::Map(
                [
                    (Value::Str("a".into()), Value::Seq(vec![Value::Int(1)])),
                    (Value::Str("b".into()), Value::Map(BTreeMap::new())),
                ]
                .into()
            )
        );
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        assert!(matches!(
            parse_literal("1 2"),
            Err(LiteralError::TrailingArithmetic | LiteralError::TrailingInput)
        ));
        assert!(parse_literal("").is_err());
        assert!(parse_literal("[1, ").is_err());
    }
}
