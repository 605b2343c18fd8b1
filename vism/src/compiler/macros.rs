//! Compile-time macros (`?X` syntax).

use crate::compiler::CompilerState;
use crate::source::SourceHandle;

/// A macro runnable while the program is being compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumIter)]
pub enum MacroKind {
    /// `?d` — dump the IR emitted so far.
    Debug,
}

impl MacroKind {
    /// Macro-identifier character → macro.
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            'd' => Some(MacroKind::Debug),
            _ => None,
        }
    }

    /// The identifier character of this macro.
    pub const fn symbol(self) -> char {
        match self {
            MacroKind::Debug => 'd',
        }
    }
}

/// Run a macro against the current compilation state.
pub(crate) fn expand(kind: MacroKind, _file: &SourceHandle, state: &CompilerState) {
    match kind {
        MacroKind::Debug => debug(state),
    }
}

fn debug(state: &CompilerState) {
    println!("\x1b[2m{:=^80}\x1b[22m", " DEBUG ");
    for iri in &state.ir {
        println!("{iri}");
    }
    println!("\x1b[2m{}\x1b[22m", "=".repeat(80));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_round_trip() {
        assert_eq!(MacroKind::from_symbol('d'), Some(MacroKind::Debug));
        assert_eq!(MacroKind::Debug.symbol(), 'd');
        assert_eq!(MacroKind::from_symbol('z'), None);
    }
}
