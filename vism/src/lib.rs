//! The Vism toolchain.
//!
//! Vism programs are single-character, mode-switched command streams that
//! manipulate named memory slots, compile-time registers and numbered output
//! streams. This crate provides the whole pipeline: the character-driven
//! parser/compiler, the typed symbolic IR, the IR → bytecode back-end and
//! the stack-machine interpreter with pluggable stream endpoints.
//!
//! ```
//! use vism::prelude::*;
//!
//! let source = SourceHandle::from_line(
//!     r#"&x ^l 40 ^n &y ^l 2 ^n $0 ^l "x" ^n $1 ^l "y" ^n &x ^n + p"#,
//! );
//! let bytecode = compile(source, &BytecodeBackend).expect("well-formed program");
//!
//! let (mut out, mut err) = (Vec::new(), Vec::new());
//! Interpreter::new(&mut out, &mut err).run(&bytecode);
//!
//! assert_eq!(out, b"42");
//! assert!(err.is_empty());
//! ```

pub mod backend;
pub mod compiler;
pub mod consts;
pub mod diagnostics;
pub mod error;
pub mod interpreter;
pub mod parser;
pub mod source;

pub mod prelude {
    //! Convenience re-exports of the whole pipeline.

    pub use vism_asm::consts::{NULL, REGISTER_COUNT, STDERR, STDOUT};
    pub use vism_asm::{
        Complex, Identifier, Instruction, InstructionSeq, IrArg, IrOp, Iri, Operand,
        OperatorTable, PseudoMnemonic, Source, StreamId, Value, ValueType,
    };

    pub use crate::backend::{Backend, BytecodeBackend};
    pub use crate::compiler::{compile, Compiler, CompilerState, MacroKind, TypeDef, TypeDefTracker};
    pub use crate::diagnostics::{Code, Diagnostic, SourceLabel};
    pub use crate::error::{RuntimeError, RuntimeResult};
    pub use crate::interpreter::{Interpreter, StreamMap};
    pub use crate::parser::{AssignKind, DataStorage, Mode, ParsingState, RegisterFile, StorageKind};
    pub use crate::source::SourceHandle;
}
