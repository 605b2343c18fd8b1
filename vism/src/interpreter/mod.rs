//! The bytecode virtual machine.

mod ops;

use std::collections::HashMap;
use std::io::Write;
use std::mem;

use vism_asm::consts::{NULL, STDERR, STDOUT};
use vism_asm::{Identifier, Instruction, InstructionSeq, Source, StreamId, Value};

use crate::error::{RuntimeError, RuntimeResult};

/// Integer-keyed append-only text buffers, drained to endpoints on flush.
#[derive(Debug, Clone)]
pub struct StreamMap {
    buffers: HashMap<StreamId, String>,
}

impl StreamMap {
    /// Map holding the three well-known streams: null, stdout and stderr.
    pub fn new() -> Self {
        let buffers = [NULL, STDOUT, STDERR]
            .into_iter()
            .map(|fd| (fd, String::new()))
            .collect();

        Self { buffers }
    }

    /// Open an additional stream. Opening an existing one is a no-op.
    pub fn open(&mut self, fd: StreamId) {
        self.buffers.entry(fd).or_default();
    }

    /// The pending contents of a stream.
    pub fn pending(&self, fd: StreamId) -> Option<&str> {
        self.buffers.get(&fd).map(String::as_str)
    }

    fn get_mut(&mut self, fd: StreamId) -> RuntimeResult<&mut String> {
        self.buffers
            .get_mut(&fd)
            .ok_or(RuntimeError::UnknownStream(fd))
    }

    /// Drain a stream's buffer, resetting it.
    fn take(&mut self, fd: StreamId) -> RuntimeResult<String> {
        self.get_mut(fd).map(mem::take)
    }
}

impl Default for StreamMap {
    fn default() -> Self {
        Self::new()
    }
}

/// The stack-machine interpreter.
///
/// Owns the slot memory and the stream buffers; the two endpoint sinks are
/// borrowed from the embedder at construction and never closed. In strict
/// mode (the default) the first runtime failure halts the program.
pub struct Interpreter<O, E> {
    memory: HashMap<Identifier, Value>,
    streams: StreamMap,
    stdout: O,
    stderr: E,
    stdout_fd: StreamId,
    strict: bool,
}

impl<O: Write, E: Write> Interpreter<O, E> {
    /// Machine writing to the given endpoints, in strict mode.
    pub fn new(stdout: O, stderr: E) -> Self {
        Self {
            memory: HashMap::new(),
            streams: StreamMap::new(),
            stdout,
            stderr,
            stdout_fd: STDOUT,
            strict: true,
        }
    }

    /// Toggle strict mode: whether a runtime failure halts the program.
    pub fn with_strict_mode(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// The machine's memory, for inspection.
    pub fn memory(&self) -> &HashMap<Identifier, Value> {
        &self.memory
    }

    /// The machine's stream buffers, for inspection.
    pub fn streams(&self) -> &StreamMap {
        &self.streams
    }

    /// Open an additional stream before running.
    ///
    /// Nonstandard descriptors drain to the stdout endpoint on flush.
    pub fn open_stream(&mut self, fd: StreamId) {
        self.streams.open(fd);
    }

    /// Run a bytecode program.
    ///
    /// On a runtime failure a one-paragraph diagnostic goes to the stderr
    /// endpoint; under strict mode the rest of the program is abandoned.
    pub fn run(&mut self, bytecode: &[Instruction]) {
        for instruction in bytecode {
            tracing::trace!(%instruction, "executing");
            if let Err(err) = self.execute(instruction) {
                self.report(&err);
                if self.strict {
                    return;
                }
            }
        }
    }

    /// Run a composite sequence as a single unit.
    pub fn run_seq(&mut self, seq: &InstructionSeq) -> RuntimeResult<()> {
        seq.instructions()
            .iter()
            .try_for_each(|instruction| self.execute(instruction))
    }

    fn execute(&mut self, instruction: &Instruction) -> RuntimeResult<()> {
        match instruction {
            Instruction::MOV(dest, value) => {
                self.memory.insert(dest.clone(), value.clone());
                Ok(())
            }
            Instruction::WRITE(fd, source) => {
                let text = self.resolve(source)?.to_string();
                self.streams.get_mut(*fd)?.push_str(&text);
                Ok(())
            }
            Instruction::FLUSH(fd) => self.flush(*fd),
            Instruction::PRINT(src) => self.print(src),
            Instruction::ADD(d, l, r) => self.binary(d, l, r, ops::add),
            Instruction::SUB(d, l, r) => self.binary(d, l, r, ops::sub),
            Instruction::MUL(d, l, r) => self.binary(d, l, r, ops::mul),
            Instruction::INTDIV(d, l, r) => self.binary(d, l, r, ops::intdiv),
            Instruction::MODULO(d, l, r) => self.binary(d, l, r, ops::modulo),
            Instruction::DIVMOD(d, l, r) => self.binary(d, l, r, ops::divmod),
            Instruction::UNION(d, l, r) => self.binary(d, l, r, ops::union),
            Instruction::STRDIFF(d, l, r) => self.binary(d, l, r, ops::strdiff),
            Instruction::SEQDIFF(d, l, r) => self.binary(d, l, r, ops::seqdiff),
            Instruction::PATHJOIN(d, l, r) => self.binary(d, l, r, ops::pathjoin),
        }
    }

    fn binary(
        &mut self,
        dest: &Identifier,
        lhs: &Identifier,
        rhs: &Identifier,
        op: fn(&Value, &Value) -> RuntimeResult<Value>,
    ) -> RuntimeResult<()> {
        let result = op(self.fetch(lhs)?, self.fetch(rhs)?)?;
        self.memory.insert(dest.clone(), result);
        Ok(())
    }

    fn fetch(&self, id: &Identifier) -> RuntimeResult<&Value> {
        self.memory
            .get(id)
            .ok_or_else(|| RuntimeError::UndefinedSlot(id.clone()))
    }

    fn resolve(&self, source: &Source) -> RuntimeResult<Value> {
        match source {
            Source::Imm(value) => Ok(value.clone()),
            Source::Slot(id) => self.fetch(id).map(Value::clone),
        }
    }

    /// Drain a stream to its endpoint. The null stream discards; unknown
    /// positive descriptors default to the stdout endpoint.
    fn flush(&mut self, fd: StreamId) -> RuntimeResult<()> {
        let contents = self.streams.take(fd)?;

        match fd {
            NULL => {}
            STDERR => {
                self.stderr.write_all(contents.as_bytes())?;
                self.stderr.flush()?;
            }
            _ => {
                self.stdout.write_all(contents.as_bytes())?;
                self.stdout.flush()?;
            }
        }

        Ok(())
    }

    /// `print` composes a write and a flush of the stdout stream, and is a
    /// no-op for `None`.
    fn print(&mut self, src: &Identifier) -> RuntimeResult<()> {
        if matches!(self.fetch(src)?, Value::None) {
            return Ok(());
        }

        let seq = Instruction::WRITE(self.stdout_fd, Source::Slot(src.clone()))
            .then(Instruction::FLUSH(self.stdout_fd));
        self.run_seq(&seq)
    }

    fn report(&mut self, err: &RuntimeError) {
        tracing::warn!(%err, "runtime failure");
        // Reporting must not itself abort the machine.
        let _ = writeln!(self.stderr, "Runtime exception:\n  {err}\n\n[Illegal operation]");
        let _ = self.stderr.flush();
    }
}
