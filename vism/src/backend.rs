//! Back-end lowering: symbolic IR → executable bytecode.

use vism_asm::{Identifier, Instruction, IrArg, IrOp, Iri, Operand, Source, StreamId, ValueType};

/// A compilation target: turns the straight-line IR into its final form.
pub trait Backend {
    /// What the lowering produces.
    type Output;

    /// Lower a whole IR program.
    fn lower(&self, ir: &[Iri]) -> Self::Output;
}

/// The bytecode back-end of the virtual machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytecodeBackend;

impl Backend for BytecodeBackend {
    type Output = Vec<Instruction>;

    fn lower(&self, ir: &[Iri]) -> Vec<Instruction> {
        ir.iter().map(lower_iri).collect()
    }
}

/// Lower one IR instruction, picking specializations from its dest type.
///
/// # Panics
///
/// Reserved mnemonics and operand shapes the compiler cannot produce are
/// implementation bugs and panic.
fn lower_iri(iri: &Iri) -> Instruction {
    match iri.op {
        IrOp::MEMCH => Instruction::MOV(dest_slot(iri), imm_value(iri)),
        IrOp::SWRITE => Instruction::WRITE(dest_stream(iri), write_source(iri)),
        IrOp::SFLUSH => Instruction::FLUSH(dest_stream(iri)),
        IrOp::PRINTV => Instruction::PRINT(arg_slot(iri, 0)),
        IrOp::ADD => ternary(iri, Instruction::ADD),
        IrOp::UNION if iri.dest_type == ValueType::Set => ternary(iri, Instruction::UNION),
        // Non-set unions are concatenations and merges, which `add` carries.
        IrOp::UNION => ternary(iri, Instruction::ADD),
        IrOp::SUB => ternary(iri, Instruction::SUB),
        IrOp::DIFF => match iri.dest_type {
            ValueType::Str => ternary(iri, Instruction::STRDIFF),
            ValueType::Set => ternary(iri, Instruction::SUB),
            _ => ternary(iri, Instruction::SEQDIFF),
        },
        IrOp::MUL | IrOp::REPLIC => ternary(iri, Instruction::MUL),
        IrOp::INTDIV => ternary(iri, Instruction::INTDIV),
        IrOp::MODULO => ternary(iri, Instruction::MODULO),
        IrOp::DIVMOD => ternary(iri, Instruction::DIVMOD),
        IrOp::PATHJOIN => ternary(iri, Instruction::PATHJOIN),
        op => panic!("IR instruction `{op}` is not supported by the bytecode back-end"),
    }
}

fn ternary(iri: &Iri, build: fn(Identifier, Identifier, Identifier) -> Instruction) -> Instruction {
    build(dest_slot(iri), arg_slot(iri, 0), arg_slot(iri, 1))
}

fn dest_slot(iri: &Iri) -> Identifier {
    match &iri.dest {
        Some(Operand::Slot(id)) => id.clone(),
        other => panic!("`{}` expects a slot destination, found {other:?}", iri.op),
    }
}

fn dest_stream(iri: &Iri) -> StreamId {
    match &iri.dest {
        Some(Operand::Stream(fd)) => *fd,
        other => panic!("`{}` expects a stream destination, found {other:?}", iri.op),
    }
}

fn imm_value(iri: &Iri) -> vism_asm::Value {
    match iri.args.first() {
        Some(IrArg::Value(value)) => value.clone(),
        other => panic!("`{}` expects an immediate argument, found {other:?}", iri.op),
    }
}

fn write_source(iri: &Iri) -> Source {
    match iri.args.first() {
        Some(IrArg::Value(value)) => Source::Imm(value.clone()),
        Some(IrArg::Slot(id)) => Source::Slot(id.clone()),
        None => panic!("`{}` expects one argument", iri.op),
    }
}

fn arg_slot(iri: &Iri, index: usize) -> Identifier {
    match iri.args.get(index) {
        Some(IrArg::Slot(id)) => id.clone(),
        other => panic!("`{}` expects a slot argument, found {other:?}", iri.op),
    }
}
