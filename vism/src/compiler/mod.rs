//! Compiler glue: drives the parser FSM, typechecks assignments, resolves
//! operator overloads and emits IR.

pub mod macros;

mod typedefs;

pub use macros::MacroKind;
pub use typedefs::{TypeDef, TypeDefTracker};

use std::mem;

use vism_asm::{
    DestKind, Identifier, IrArg, IrOp, Iri, Operand, OperandKind, OperatorTable, PseudoMnemonic,
    Value, ValueType,
};

use crate::backend::Backend;
use crate::consts::{MACRO_MODE_CHAR, PRGM_MODE_CHAR};
use crate::diagnostics::{self, Diagnostic};
use crate::parser::{
    escape_literal, parse_literal, unescape, AssignKind, DataStorage, LiteralError, Mode,
    ParsingState, Selectors, StorageKind,
};
use crate::source::SourceHandle;

/// Parser state plus everything the compiler accumulates on top of it.
#[derive(Debug, Clone, Default)]
pub struct CompilerState {
    /// The parsing finite-state machine.
    pub parser: ParsingState,
    /// Fixed type of every memory slot seen so far.
    pub typedefs: TypeDefTracker,
    /// IR emitted so far.
    pub ir: Vec<Iri>,
    /// Diagnostics raised so far. Any entry aborts the compilation.
    pub errors: Vec<Diagnostic>,
}

/// The Vism compiler.
///
/// Walks the source one character at a time and produces IR, which the given
/// [`Backend`] turns into its final form. The same instance can be fed
/// successive buffers through [`change_file`](Compiler::change_file), which
/// keeps typing knowledge across inputs — the affordance interactive
/// embedders rely on.
pub struct Compiler {
    file: SourceHandle,
    state: CompilerState,
    operators: OperatorTable,
    selectors: Selectors,
}

impl Compiler {
    /// Compiler over `file` with the built-in operator set.
    pub fn new(file: SourceHandle) -> Self {
        Self::with_operators(file, OperatorTable::default())
    }

    /// Compiler with an explicit operator table.
    pub fn with_operators(file: SourceHandle, operators: OperatorTable) -> Self {
        Self {
            file,
            state: CompilerState::default(),
            operators,
            selectors: Selectors::new(),
        }
    }

    /// Swap the input while keeping typing state.
    ///
    /// The parser, the emitted IR and pending diagnostics are reset; typedefs
    /// and registers persist, so types stay monotone across buffers.
    pub fn change_file(&mut self, file: SourceHandle) {
        self.file = file;
        self.state.parser.reset();
        self.state.ir.clear();
        self.state.errors.clear();
    }

    /// The typing knowledge accumulated so far.
    pub fn typedefs(&self) -> &TypeDefTracker {
        &self.state.typedefs
    }

    /// The IR emitted so far.
    pub fn ir(&self) -> &[Iri] {
        &self.state.ir
    }

    /// Compile the whole input down to the back-end's output.
    ///
    /// The pipeline short-circuits: the first diagnostic aborts the
    /// compilation and the caller receives every error raised up to that
    /// point.
    pub fn compile<B: Backend>(&mut self, backend: &B) -> Result<B::Output, Vec<Diagnostic>> {
        tracing::debug!(source = self.file.name(), "compiling");

        while !self.file.is_eof() {
            while !self.file.is_eol() {
                if self.request(PRGM_MODE_CHAR) {
                    self.process_buffered();
                    self.file.bump();
                    self.change_mode();
                } else if self.request(MACRO_MODE_CHAR) {
                    self.process_buffered();
                    self.file.bump();
                    self.run_macro();
                } else if !self.discarded_char() {
                    match self.state.parser.mode {
                        Mode::Normal => self.process_char(),
                        Mode::Select | Mode::Assign => self.buffer_char(),
                    }
                }

                if !self.state.errors.is_empty() {
                    return Err(mem::take(&mut self.state.errors));
                }

                self.file.bump();
            }

            self.process_buffered();
            if !self.state.errors.is_empty() {
                return Err(mem::take(&mut self.state.errors));
            }
            self.file.advance_line();
        }

        tracing::debug!(instructions = self.state.ir.len(), "lowering");
        Ok(backend.lower(&self.state.ir))
    }

    /// Whether the current character requests `special` (and is not being
    /// escaped).
    fn request(&self, special: char) -> bool {
        self.file.current_char() == special && !self.state.parser.char_escaping
    }

    /// Outside Assign mode, whitespace is discarded.
    fn discarded_char(&self) -> bool {
        self.state.parser.mode != Mode::Assign && self.file.current_char().is_whitespace()
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(code = %diagnostic.code, summary = %diagnostic.summary, "raising");
        self.state.errors.push(diagnostic);
    }

    fn emit(&mut self, iri: Iri) {
        tracing::trace!(ir = %iri, "emit");
        self.state.ir.push(iri);
    }

    /// Flush the current mode's buffer.
    fn process_buffered(&mut self) {
        match self.state.parser.mode {
            Mode::Select => self.flush_select(),
            Mode::Assign => self.flush_assign(),
            Mode::Normal => {}
        }
    }

    /// Parse the Select buffer with the selector's internal type and update
    /// the target. E001 on failure.
    fn flush_select(&mut self) {
        let payload = self.state.parser.read_buffer().trim_end().to_owned();
        let kind = self.state.parser.select_kind;

        let target = match kind {
            StorageKind::Memory => self
                .selectors
                .identifier
                .evaluate(&payload)
                .map(DataStorage::Memory),
            StorageKind::Register => self
                .selectors
                .address
                .evaluate(&payload)
                .map(DataStorage::Register),
            StorageKind::Stream => self
                .selectors
                .integer
                .evaluate(&payload)
                .map(DataStorage::Stream),
        };

        match target {
            Some(target) => {
                self.state.parser.target = target;
                self.state.parser.clear_buffer();
            }
            None => {
                let spos = self.state.parser.mode_spos;
                self.push(diagnostics::e001(&self.file, kind, &payload, spos));
            }
        }
    }

    /// Evaluate the Assign buffer and dispatch the assignment on the target
    /// kind. E002 on a bad literal, E003 on a type mismatch, E011 on a
    /// register naming an undefined slot.
    fn flush_assign(&mut self) {
        let buffer = self.state.parser.read_buffer().to_owned();
        let spos = self.state.parser.mode_spos;

        let value = match self.evaluate_buffer(&buffer) {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(%err, "literal evaluation failed");
                self.push(diagnostics::e002(&self.file, &buffer, spos));
                return;
            }
        };

        let target_typedef = self.state.typedefs.for_target(&self.state.parser.target);
        if !typedefs::assignable(target_typedef.value_type(), value.value_type()) {
            let found = value.value_type();
            self.push(diagnostics::e003(&self.file, &target_typedef, found, spos));
            return;
        }

        let target = self.state.parser.target.clone();
        match target {
            DataStorage::Memory(ref id) => {
                let ty = value.value_type();
                let line = self.file.line_number();
                self.state
                    .typedefs
                    .bind(&target, ty, line, spos, self.file.pos());
                self.emit(Iri::new(
                    IrOp::MEMCH,
                    Some(Operand::Slot(id.clone())),
                    ty,
                    vec![IrArg::Value(value)],
                    vec![ty],
                ));
            }
            DataStorage::Register(addr) => {
                let Value::Str(name) = value else {
                    // The register typedef is `str`; the typecheck above
                    // rules everything else out.
                    unreachable!("register assignment slipped past the typecheck");
                };
                let id = Identifier::new(name);
                if !self.state.typedefs.get(&id).is_positional() {
                    self.push(diagnostics::e011(&self.file, &id, spos));
                    return;
                }
                // Registers are compile-time scratch: nothing is emitted.
                self.state.parser.registers.set(addr, id);
            }
            DataStorage::Stream(fd) => {
                let text = value.to_string();
                self.emit(Iri::new(
                    IrOp::SWRITE,
                    Some(Operand::Stream(fd)),
                    ValueType::Str,
                    vec![IrArg::Value(Value::Str(text))],
                    vec![ValueType::Str],
                ));
            }
        }

        self.state.parser.clear_buffer();
    }

    fn evaluate_buffer(&self, buffer: &str) -> Result<Value, LiteralError> {
        match self.state.parser.assign_kind {
            Some(AssignKind::String) => Ok(Value::Str(buffer.to_owned())),
            Some(AssignKind::Literal) => parse_literal(&escape_literal(buffer)),
            // Assign mode is only ever entered through `^s`/`^l`.
            None => unreachable!("assign mode without an assign kind"),
        }
    }

    /// Consume the character after a `^`. E004 at EOL, E005 on an unknown
    /// mode.
    fn change_mode(&mut self) {
        if self.file.is_eol() {
            self.push(diagnostics::e004(&self.file, &self.state.parser));
            return;
        }

        let specifier = self.file.current_char();
        let Some(mode) = caret_mode(specifier) else {
            self.push(diagnostics::e005(&self.file));
            return;
        };

        self.state.parser.update_mode(mode, self.file.pos() + 1);
        if let Some(kind) = AssignKind::from_specifier(specifier) {
            self.state.parser.assign_kind = Some(kind);
        }
    }

    /// Consume the character after a `?` and run the macro. E004 at EOL,
    /// E006 on an undefined macro.
    fn run_macro(&mut self) {
        if self.file.is_eol() {
            self.push(diagnostics::e004(&self.file, &self.state.parser));
            return;
        }

        let Some(kind) = MacroKind::from_symbol(self.file.current_char()) else {
            self.push(diagnostics::e006(&self.file));
            return;
        };

        macros::expand(kind, &self.file, &self.state);
    }

    /// Normal-mode dispatch: storage selectors switch to Select, anything
    /// else must be an operator. E008 on unknown symbols.
    fn process_char(&mut self) {
        let symbol = self.file.current_char();

        if let Some(kind) = StorageKind::from_symbol(symbol) {
            self.state.parser.mode = Mode::Select;
            self.state.parser.mode_spos = self.file.pos() + 1;
            self.state.parser.select_kind = kind;
            return;
        }

        let Some(pseudo) = self.operators.get(symbol).copied() else {
            self.push(diagnostics::e008(&self.file));
            return;
        };

        self.apply_operator(symbol, pseudo);
    }

    /// Source the operands, resolve the overload and emit the IR
    /// instruction. E009 when registers are missing, E010 when no overload
    /// matches.
    fn apply_operator(&mut self, symbol: char, pseudo: PseudoMnemonic) {
        let expected = pseudo.identifier_count();

        let mut args = Vec::with_capacity(pseudo.kinds.args.len());
        let mut arg_types = Vec::with_capacity(pseudo.kinds.args.len());
        let mut register = 0usize;
        let mut missing = false;

        for kind in pseudo.kinds.args {
            match kind {
                OperandKind::Identifier => {
                    match self.state.parser.registers.get(register) {
                        Some(id) => {
                            arg_types.push(self.state.typedefs.get(id).value_type());
                            args.push(IrArg::Slot(id.clone()));
                        }
                        None => missing = true,
                    }
                    register += 1;
                }
                OperandKind::Target => {
                    let (arg, ty) = self.target_argument();
                    arg_types.push(ty);
                    args.push(arg);
                }
            }
        }

        if missing {
            let received = self.state.parser.registers.filled(expected);
            self.push(diagnostics::e009(&self.file, symbol, expected, received));
            return;
        }

        let mut received = Vec::with_capacity(1 + arg_types.len());
        received.push(self.target_value_type());
        received.extend(arg_types.iter().copied());

        let Some(op) = pseudo.resolve(&received) else {
            self.push(diagnostics::e010(&self.file, symbol, &received));
            return;
        };

        // The dest kind constrains the target's storage: a type match with
        // the wrong storage shape is still "no overload".
        let dest = match (pseudo.kinds.dest, &self.state.parser.target) {
            (DestKind::None, _) => None,
            (DestKind::Slot, DataStorage::Memory(id)) => Some(Operand::Slot(id.clone())),
            (DestKind::Stream, DataStorage::Stream(fd)) => Some(Operand::Stream(*fd)),
            _ => {
                self.push(diagnostics::e010(&self.file, symbol, &received));
                return;
            }
        };

        self.emit(Iri::new(op, dest, received[0], args, arg_types));
    }

    /// Compile-time type of the current target, as seen by dispatch.
    fn target_value_type(&self) -> ValueType {
        match &self.state.parser.target {
            DataStorage::Memory(id) => self.state.typedefs.get(id).value_type(),
            DataStorage::Stream(_) => ValueType::Int,
            DataStorage::Register(_) => ValueType::Unset,
        }
    }

    /// The current target as an operator argument.
    fn target_argument(&self) -> (IrArg, ValueType) {
        match &self.state.parser.target {
            DataStorage::Memory(id) => (
                IrArg::Slot(id.clone()),
                self.state.typedefs.get(id).value_type(),
            ),
            DataStorage::Stream(fd) => {
                (IrArg::Value(Value::Int((*fd).into())), ValueType::Int)
            }
            DataStorage::Register(_) => (IrArg::Value(Value::None), ValueType::Unset),
        }
    }

    /// Append the current character to the mode buffer, honoring escapes.
    /// E007 on an invalid escape sequence.
    fn buffer_char(&mut self) {
        let c = self.file.current_char();

        if self.state.parser.should_escape(c) {
            self.state.parser.char_escaping = true;
            return;
        }

        let mut resolved = c;
        if self.state.parser.char_escaping {
            match unescape(c) {
                Some(escaped) => {
                    resolved = escaped;
                    self.state.parser.char_escaping = false;
                }
                None => {
                    self.push(diagnostics::e007(&self.file));
                    return;
                }
            }
        }

        self.state.parser.write_buffer(resolved);
    }
}

/// End-user caret modes: `^n`, `^s`, `^l`.
fn caret_mode(c: char) -> Option<Mode> {
    match c {
        'n' => Some(Mode::Normal),
        's' | 'l' => Some(Mode::Assign),
        _ => None,
    }
}

/// Compile a whole source in one call.
pub fn compile<B: Backend>(file: SourceHandle, backend: &B) -> Result<B::Output, Vec<Diagnostic>> {
    Compiler::new(file).compile(backend)
}
