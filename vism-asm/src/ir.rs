//! Symbolic intermediate representation shared by every back-end.

use core::fmt;

use crate::types::{Identifier, StreamId, ValueType};
use crate::value::Value;

/// Symbolic opcode emitted by the compiler and consumed by back-end lowering.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IrOp {
    /// Change the value of a memory slot.
    MEMCH,
    /// Append text to a stream buffer.
    SWRITE,
    /// Drain a stream buffer to its endpoint.
    SFLUSH,
    /// Print a slot's value through the standard output stream.
    PRINTV,
    /// Numeric addition.
    ADD,
    /// Numeric subtraction.
    SUB,
    /// Numeric multiplication.
    MUL,
    /// Flooring integer division.
    INTDIV,
    /// Flooring modulo.
    MODULO,
    /// Quotient-and-remainder pair.
    DIVMOD,
    /// Container union: concatenation, set union or mapping merge.
    UNION,
    /// Container difference.
    DIFF,
    /// Sequence replication.
    REPLIC,
    /// Join two strings with a path separator.
    PATHJOIN,
    /// Reserved: numeric negation.
    NEG,
    /// Reserved: exponentiation.
    POW,
    /// Reserved: branch if equal.
    BEQ,
    /// Reserved: branch if not equal.
    BNE,
    /// Reserved: unconditional jump.
    JUMP,
}

impl IrOp {
    /// Reserved mnemonics carry no semantics: no operator emits them and
    /// back-end lowering rejects them.
    pub const fn is_reserved(self) -> bool {
        matches!(
            self,
            IrOp::NEG | IrOp::POW | IrOp::BEQ | IrOp::BNE | IrOp::JUMP
        )
    }
}

/// Destination sourcing of a pseudo-mnemonic.
///
/// Destinations always come from the current assignment target; the kind
/// additionally constrains which storage the target must be. A mismatch is a
/// dispatch failure, so registers and streams can never leak into operand
/// positions the machine cannot execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestKind {
    /// The operation has no destination operand.
    None,
    /// The target must be a memory slot.
    Slot,
    /// The target must be a stream.
    Stream,
}

/// Argument sourcing of a pseudo-mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    /// A memory identifier read from the next positional register.
    Identifier,
    /// The current assignment target's id.
    Target,
}

/// Destination-and-argument sourcing signature of a pseudo-mnemonic.
#[derive(Debug, Clone, Copy)]
pub struct KindSignature {
    /// Where the destination comes from.
    pub dest: DestKind,
    /// Where each positional argument comes from, in order.
    pub args: &'static [OperandKind],
}

impl KindSignature {
    /// Number of operands read from the register file.
    pub fn identifier_count(&self) -> usize {
        self.args
            .iter()
            .filter(|kind| matches!(kind, OperandKind::Identifier))
            .count()
    }

    /// Total operand count, destination included.
    pub const fn arity(&self) -> usize {
        1 + self.args.len()
    }
}

/// A resolved destination operand.
///
/// Registers never appear here: they are consumed during compilation and do
/// not exist at run time.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operand {
    /// A memory slot.
    Slot(Identifier),
    /// A stream descriptor.
    Stream(StreamId),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Slot(id) => write!(f, "{id}"),
            Operand::Stream(fd) => write!(f, "{fd}"),
        }
    }
}

/// Positional argument of an IR instruction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IrArg {
    /// Immediate value fixed at compile time.
    Value(Value),
    /// Memory slot resolved at run time.
    Slot(Identifier),
}

impl fmt::Display for IrArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrArg::Value(value) => f.write_str(&value.repr()),
            IrArg::Slot(id) => write!(f, "{id}"),
        }
    }
}

/// One intermediate-representation instruction.
///
/// Every instruction records its destination type and positional argument
/// types; back-end lowering reads them to pick specializations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Iri {
    /// The symbolic opcode.
    pub op: IrOp,
    /// Destination operand, when the opcode has one.
    pub dest: Option<Operand>,
    /// Type of the destination at emission time.
    pub dest_type: ValueType,
    /// Positional arguments.
    pub args: Vec<IrArg>,
    /// Types of the positional arguments, index-aligned with `args`.
    pub arg_types: Vec<ValueType>,
}

impl Iri {
    /// Assemble an instruction. `args` and `arg_types` must be index-aligned.
    pub fn new(
        op: IrOp,
        dest: Option<Operand>,
        dest_type: ValueType,
        args: Vec<IrArg>,
        arg_types: Vec<ValueType>,
    ) -> Self {
        debug_assert_eq!(args.len(), arg_types.len());

        Self {
            op,
            dest,
            dest_type,
            args,
            arg_types,
        }
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.op)?;

        let mut sep = " ";
        if let Some(dest) = &self.dest {
            write!(f, "{sep}{dest}")?;
            sep = ", ";
        }
        for arg in &self.args {
            write!(f, "{sep}{arg}")?;
            sep = ", ";
        }

        Ok(())
    }
}
