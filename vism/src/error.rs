//! Runtime error implementation of the virtual machine.

use std::io;

use thiserror::Error;

use vism_asm::{Identifier, StreamId, ValueType};

/// A failure raised while executing bytecode.
///
/// Under strict mode any of these halts the program after a diagnostic has
/// been written to the stderr endpoint.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The stream was never opened or has been closed.
    #[error("stream {0} does not exist or is closed")]
    UnknownStream(StreamId),

    /// A slot was read before ever being written.
    #[error("memory slot `{0}` is not defined")]
    UndefinedSlot(Identifier),

    /// The opcode is not defined for the operands' runtime types.
    #[error("`{op}` is not defined for `{lhs}` and `{rhs}`")]
    UnsupportedOperands {
        /// The opcode that failed.
        op: &'static str,
        /// Runtime type of the left operand.
        lhs: ValueType,
        /// Runtime type of the right operand.
        rhs: ValueType,
    },

    /// Integer division or modulo by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// 64-bit integer arithmetic overflowed.
    #[error("integer overflow")]
    ArithmeticOverflow,

    /// An endpoint refused a write.
    #[error("endpoint failure: {0}")]
    Io(#[from] io::Error),
}

/// Result alias for bytecode execution.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
