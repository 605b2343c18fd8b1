//! Identifier, stream and type-tag primitives shared by the compiler and the
//! virtual machine.

use core::fmt;

/// Name of a memory slot.
///
/// Valid identifiers match `[A-Za-z_]\w*`; the parser is responsible for
/// enforcing the syntax, this type only carries the name around.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Identifier(String);

impl Identifier {
    /// Wrap a slot name.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(name.into())
    }

    /// The underlying name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identifier {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Stream descriptor. Negative descriptors are reserved; `-1` is the null
/// stream, `0` and `1` map to the embedder's output endpoints.
pub type StreamId = i32;

/// Compile-time tag of a memory value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueType {
    /// A slot that was never assigned. Compatible with every other type, and
    /// a wildcard position in overload tables.
    Unset,
    /// The unit value `None`.
    None,
    /// 64-bit signed integer.
    Int,
    /// Double-precision float.
    Float,
    /// Complex number.
    Complex,
    /// Boolean.
    Bool,
    /// Text string.
    Str,
    /// Byte string.
    Bytes,
    /// Ordered, growable sequence.
    Seq,
    /// Fixed tuple.
    Tuple,
    /// Ordered set.
    Set,
    /// Key-value mapping.
    Map,
}

impl ValueType {
    /// Surface-language name of the type, as rendered in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            ValueType::Unset => "UnsetType",
            ValueType::None => "NoneType",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Complex => "complex",
            ValueType::Bool => "bool",
            ValueType::Str => "str",
            ValueType::Bytes => "bytes",
            ValueType::Seq => "list",
            ValueType::Tuple => "tuple",
            ValueType::Set => "set",
            ValueType::Map => "dict",
        }
    }

    /// Overload-table matching rule: an `Unset` entry places no constraint on
    /// its position, anything else must be identical. There is no subtyping.
    pub fn admits(self, received: ValueType) -> bool {
        self == ValueType::Unset || self == received
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn unset_admits_everything() {
        for ty in ValueType::iter() {
            assert!(ValueType::Unset.admits(ty));
        }
    }

    #[test]
    fn concrete_types_admit_only_themselves() {
        for decl in ValueType::iter().filter(|t| *t != ValueType::Unset) {
            for received in ValueType::iter() {
                assert_eq!(decl.admits(received), decl == received);
            }
        }
    }
}
