//! Atomic types of the Vism toolchain: the memory value domain, the symbolic
//! intermediate representation with its typed overload tables, and the
//! bytecode instruction set executed by the virtual machine.

#![warn(missing_docs)]

pub mod consts;

mod ir;
mod op;
mod pseudo;
mod types;
mod value;

pub use ir::{DestKind, IrArg, IrOp, Iri, KindSignature, Operand, OperandKind};
pub use op::{Instruction, InstructionSeq, Source};
pub use pseudo::{OperatorTable, Overload, PseudoMnemonic, PSEUDO_MNEMONICS};
pub use types::{Identifier, StreamId, ValueType};
pub use value::{Complex, Value};
