//! Concrete bytecode executed by the virtual machine.

use core::fmt;

use crate::types::{Identifier, StreamId};
use crate::value::Value;

/// Where a `WRITE` takes its text from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Source {
    /// Immediate value fixed at compile time.
    Imm(Value),
    /// Memory slot resolved against the machine state.
    Slot(Identifier),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Imm(value) => f.write_str(&value.repr()),
            Source::Slot(id) => write!(f, "{id}"),
        }
    }
}

/// Executable bytecode instruction.
///
/// Ternary operands are `(dest, lhs, rhs)` slot names; the machine looks the
/// values up indirectly.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Instruction {
    /// `memory[dest] := value`.
    MOV(Identifier, Value),
    /// Append the display form of the source to a stream buffer.
    WRITE(StreamId, Source),
    /// Drain a stream buffer to its endpoint.
    FLUSH(StreamId),
    /// Write-then-flush a slot's value to standard output, unless it is
    /// `None`.
    PRINT(Identifier),
    /// Addition, concatenation or mapping merge.
    ADD(Identifier, Identifier, Identifier),
    /// Subtraction or set difference.
    SUB(Identifier, Identifier, Identifier),
    /// Multiplication or sequence replication.
    MUL(Identifier, Identifier, Identifier),
    /// Flooring integer division.
    INTDIV(Identifier, Identifier, Identifier),
    /// Flooring modulo.
    MODULO(Identifier, Identifier, Identifier),
    /// Quotient-and-remainder tuple.
    DIVMOD(Identifier, Identifier, Identifier),
    /// Set union.
    UNION(Identifier, Identifier, Identifier),
    /// Remove every occurrence of `rhs` from the text `lhs`.
    STRDIFF(Identifier, Identifier, Identifier),
    /// Order-preserving removal of `rhs`'s elements from `lhs`.
    SEQDIFF(Identifier, Identifier, Identifier),
    /// Join two strings with a `/` separator.
    PATHJOIN(Identifier, Identifier, Identifier),
}

impl Instruction {
    /// Lower-case mnemonic, as rendered in listings.
    pub const fn name(&self) -> &'static str {
        match self {
            Instruction::MOV(..) => "mov",
            Instruction::WRITE(..) => "write",
            Instruction::FLUSH(..) => "flush",
            Instruction::PRINT(..) => "print",
            Instruction::ADD(..) => "add",
            Instruction::SUB(..) => "sub",
            Instruction::MUL(..) => "mul",
            Instruction::INTDIV(..) => "intdiv",
            Instruction::MODULO(..) => "modulo",
            Instruction::DIVMOD(..) => "divmod",
            Instruction::UNION(..) => "union",
            Instruction::STRDIFF(..) => "strdiff",
            Instruction::SEQDIFF(..) => "seqdiff",
            Instruction::PATHJOIN(..) => "pathjoin",
        }
    }

    /// Sequence `self` before `other` into one schedulable unit.
    pub fn then(self, other: Instruction) -> InstructionSeq {
        InstructionSeq(vec![self, other])
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;

        match self {
            Instruction::MOV(dest, value) => write!(f, " {dest}, {}", value.repr()),
            Instruction::WRITE(fd, source) => write!(f, " {fd}, {source}"),
            Instruction::FLUSH(fd) => write!(f, " {fd}"),
            Instruction::PRINT(src) => write!(f, " {src}"),
            Instruction::ADD(dest, lhs, rhs)
            | Instruction::SUB(dest, lhs, rhs)
            | Instruction::MUL(dest, lhs, rhs)
            | Instruction::INTDIV(dest, lhs, rhs)
            | Instruction::MODULO(dest, lhs, rhs)
            | Instruction::DIVMOD(dest, lhs, rhs)
            | Instruction::UNION(dest, lhs, rhs)
            | Instruction::STRDIFF(dest, lhs, rhs)
            | Instruction::SEQDIFF(dest, lhs, rhs)
            | Instruction::PATHJOIN(dest, lhs, rhs) => write!(f, " {dest}, {lhs}, {rhs}"),
        }
    }
}

/// A flattened sequence of base instructions.
///
/// Composition keeps sequences flat: there are no nested composites, which
/// keeps them cheap to run and easy to introspect in diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstructionSeq(Vec<Instruction>);

impl InstructionSeq {
    /// The underlying instructions, in execution order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.0
    }

    /// Append another instruction, keeping the sequence flat.
    pub fn then(mut self, other: Instruction) -> Self {
        self.0.push(other);
        self
    }
}

impl From<Instruction> for InstructionSeq {
    fn from(instruction: Instruction) -> Self {
        Self(vec![instruction])
    }
}
