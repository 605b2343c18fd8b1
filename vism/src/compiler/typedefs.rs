//! Per-identifier type records with their first-assignment positions.

use std::collections::HashMap;

use vism_asm::{Identifier, ValueType};

use crate::parser::DataStorage;

/// A type definition: either inferred (no binding site) or recorded at the
/// source range of the first concrete assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeDef {
    /// Inferred type with no position, e.g. registers or unset memory.
    Free(ValueType),
    /// Type set somewhere in the program; the range is used by diagnostics.
    Positional {
        /// The recorded type.
        ty: ValueType,
        /// 1-based line number of the assignment.
        line: usize,
        /// Start column of the assigned value.
        spos: usize,
        /// End column of the assigned value.
        epos: usize,
    },
}

impl TypeDef {
    /// The recorded type, regardless of flavor.
    pub const fn value_type(&self) -> ValueType {
        match self {
            TypeDef::Free(ty) | TypeDef::Positional { ty, .. } => *ty,
        }
    }

    /// Positional data, when the type was set in the source.
    pub const fn position(&self) -> Option<(usize, usize, usize)> {
        match self {
            TypeDef::Free(_) => None,
            TypeDef::Positional {
                line, spos, epos, ..
            } => Some((*line, *spos, *epos)),
        }
    }

    /// Whether the identifier was concretely defined in the source.
    pub const fn is_positional(&self) -> bool {
        matches!(self, TypeDef::Positional { .. })
    }
}

/// Tracks the fixed type of every memory slot seen so far.
///
/// Types are monotone: once an identifier has a concrete type it never
/// changes nor reverts to unset for the rest of the program.
#[derive(Debug, Clone, Default)]
pub struct TypeDefTracker {
    defs: HashMap<Identifier, TypeDef>,
}

impl TypeDefTracker {
    /// The typedef of an identifier; unknown identifiers are `Free(Unset)`.
    pub fn get(&self, id: &Identifier) -> TypeDef {
        self.defs
            .get(id)
            .copied()
            .unwrap_or(TypeDef::Free(ValueType::Unset))
    }

    /// The typedef governing assignments to a target.
    ///
    /// Registers hold identifiers, so they are string-typed; streams accept
    /// anything.
    pub fn for_target(&self, target: &DataStorage) -> TypeDef {
        match target {
            DataStorage::Memory(id) => self.get(id),
            DataStorage::Register(_) => TypeDef::Free(ValueType::Str),
            DataStorage::Stream(_) => TypeDef::Free(ValueType::Unset),
        }
    }

    /// Record a positional typedef for a memory target.
    ///
    /// No-op when `new` is `Unset`, or when the target already carries that
    /// exact type: the original binding site must not be overwritten.
    pub fn bind(
        &mut self,
        target: &DataStorage,
        new: ValueType,
        line: usize,
        spos: usize,
        epos: usize,
    ) {
        if new == ValueType::Unset {
            return;
        }

        if self.for_target(target).value_type() == new {
            return;
        }

        if let DataStorage::Memory(id) = target {
            self.defs.insert(
                id.clone(),
                TypeDef::Positional {
                    ty: new,
                    line,
                    spos,
                    epos,
                },
            );
        }
    }

    /// Iterate over every recorded identifier and its typedef.
    pub fn iter(&self) -> impl Iterator<Item = (&Identifier, &TypeDef)> {
        self.defs.iter()
    }
}

/// Static assignment compatibility: an unset target accepts anything, a
/// typed one only its exact type.
pub(crate) fn assignable(target: ValueType, value: ValueType) -> bool {
    target == ValueType::Unset || target == value
}
