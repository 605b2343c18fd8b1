//! Named payload parsers for selector buffers.
//!
//! Each storage kind validates its payload against a pattern and casts it:
//! registers take hexadecimal addresses, streams integers, memory slots
//! identifiers.

use regex::Regex;

use vism_asm::consts::REGISTER_COUNT;
use vism_asm::{Identifier, StreamId};

/// A regex-validated payload parser with a fallible cast.
///
/// The user-facing name of each parser lives on
/// [`StorageKind::payload_name`](crate::parser::StorageKind::payload_name).
pub(crate) struct InternalType<T> {
    pattern: Regex,
    cast: fn(&str) -> Option<T>,
}

impl<T> InternalType<T> {
    fn new(pattern: &str, cast: fn(&str) -> Option<T>) -> Self {
        // The patterns are compiled in; they cannot fail to parse.
        let pattern = Regex::new(pattern).expect("hard-coded pattern");

        Self { pattern, cast }
    }

    /// Validate and cast a payload.
    pub fn evaluate(&self, payload: &str) -> Option<T> {
        if !self.pattern.is_match(payload) {
            return None;
        }

        (self.cast)(payload)
    }
}

/// The three selector payload parsers, compiled once per compiler.
pub(crate) struct Selectors {
    pub address: InternalType<u8>,
    pub integer: InternalType<StreamId>,
    pub identifier: InternalType<Identifier>,
}

impl Selectors {
    pub fn new() -> Self {
        Self {
            address: InternalType::new(r"^[0-9A-Fa-f]+$", |s| {
                u8::from_str_radix(s, 16)
                    .ok()
                    .filter(|addr| usize::from(*addr) < REGISTER_COUNT)
            }),
            integer: InternalType::new(r"^[+-]?[0-9]+$", |s| s.parse().ok()),
            identifier: InternalType::new(r"^[A-Za-z_]\w*$", |s| Some(Identifier::new(s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_are_hexadecimal_and_bounded() {
        let selectors = Selectors::new();
        assert_eq!(selectors.address.evaluate("0"), Some(0));
        assert_eq!(selectors.address.evaluate("f"), Some(15));
        assert_eq!(selectors.address.evaluate("F"), Some(15));
        // In range as a byte, outside the register file.
        assert_eq!(selectors.address.evaluate("10"), None);
        assert_eq!(selectors.address.evaluate("x"), None);
        assert_eq!(selectors.address.evaluate(""), None);
    }

    #[test]
    fn integers_accept_signs() {
        let selectors = Selectors::new();
        assert_eq!(selectors.integer.evaluate("-1"), Some(-1));
        assert_eq!(selectors.integer.evaluate("+2"), Some(2));
        assert_eq!(selectors.integer.evaluate("3"), Some(3));
        assert_eq!(selectors.integer.evaluate("3.5"), None);
    }

    #[test]
    fn identifiers_follow_the_usual_syntax() {
        let selectors = Selectors::new();
        assert!(selectors.identifier.evaluate("_x1").is_some());
        assert!(selectors.identifier.evaluate("Word").is_some());
        assert!(selectors.identifier.evaluate("0x").is_none());
        assert!(selectors.identifier.evaluate("a-b").is_none());
    }
}
