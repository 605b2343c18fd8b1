//! Source-level operator symbols and their typed overload tables.
//!
//! A pseudo-mnemonic maps an operator character to a set of IR mnemonics,
//! one per concrete operand-type signature. Dispatch is a first-match scan
//! over static tables; there is no subtyping, and `Unset` entries act as
//! wildcards.

use std::collections::HashMap;

use crate::ir::{DestKind, IrOp, KindSignature, OperandKind};
use crate::types::ValueType;

/// One IR mnemonic together with every type signature that selects it.
#[derive(Debug, Clone, Copy)]
pub struct Overload {
    /// Accepted `(dest, args…)` type tuples, in declaration order.
    pub signatures: &'static [&'static [ValueType]],
    /// Mnemonic selected when one of the signatures matches.
    pub ir: IrOp,
}

/// A source-level operator symbol with its overload table.
#[derive(Debug, Clone, Copy)]
pub struct PseudoMnemonic {
    /// The operator character.
    pub symbol: char,
    /// How the compiler sources the operands.
    pub kinds: KindSignature,
    /// Overloads, scanned in declaration order.
    pub overloads: &'static [Overload],
}

impl PseudoMnemonic {
    /// Resolve a received `(dest, args…)` type tuple to an IR mnemonic.
    ///
    /// Entries whose arity differs are skipped; within an entry, a position
    /// matches when the declared type admits the received one. The first
    /// match wins; `None` means the operator has no such overload.
    pub fn resolve(&self, received: &[ValueType]) -> Option<IrOp> {
        for overload in self.overloads {
            for signature in overload.signatures {
                if signature.len() != received.len() {
                    continue;
                }
                if signature
                    .iter()
                    .zip(received)
                    .all(|(declared, got)| declared.admits(*got))
                {
                    return Some(overload.ir);
                }
            }
        }

        None
    }

    /// Number of register-provided operands the symbol consumes.
    pub fn identifier_count(&self) -> usize {
        self.kinds.identifier_count()
    }
}

const TERNARY: KindSignature = KindSignature {
    dest: DestKind::Slot,
    args: &[OperandKind::Identifier, OperandKind::Identifier],
};

const UNARY_NO_TARGET: KindSignature = KindSignature {
    dest: DestKind::None,
    args: &[OperandKind::Identifier],
};

const UNARY_OVER_STREAM: KindSignature = KindSignature {
    dest: DestKind::Stream,
    args: &[OperandKind::Identifier],
};

const NULLARY_OVER_STREAM: KindSignature = KindSignature {
    dest: DestKind::Stream,
    args: &[],
};

use ValueType::{Bool, Bytes, Complex, Float, Int, Map, Seq, Set, Str, Tuple, Unset};

/// Numeric widening combinations shared by `+`, `-` and `×`.
const NUMERIC: &[&[ValueType]] = &[
    &[Int, Int, Int],
    &[Int, Int, Bool],
    &[Int, Bool, Int],
    &[Int, Bool, Bool],
    &[Float, Int, Float],
    &[Float, Float, Int],
    &[Float, Float, Float],
    &[Float, Float, Bool],
    &[Float, Bool, Float],
    &[Complex, Int, Complex],
    &[Complex, Float, Complex],
    &[Complex, Complex, Int],
    &[Complex, Complex, Float],
    &[Complex, Complex, Complex],
    &[Complex, Complex, Bool],
    &[Complex, Bool, Complex],
];

/// Homogeneous container combinations shared by `+` and `-`.
const CONTAINERS: &[&[ValueType]] = &[
    &[Str, Str, Str],
    &[Bytes, Bytes, Bytes],
    &[Seq, Seq, Seq],
    &[Tuple, Tuple, Tuple],
    &[Set, Set, Set],
    &[Map, Map, Map],
];

const REPLICATION: &[&[ValueType]] = &[
    &[Str, Int, Str],
    &[Str, Bool, Str],
    &[Str, Str, Int],
    &[Str, Str, Bool],
    &[Bytes, Int, Bytes],
    &[Bytes, Bool, Bytes],
    &[Bytes, Bytes, Int],
    &[Bytes, Bytes, Bool],
    &[Seq, Int, Seq],
    &[Seq, Bool, Seq],
    &[Seq, Seq, Int],
    &[Seq, Seq, Bool],
    &[Tuple, Int, Tuple],
    &[Tuple, Bool, Tuple],
    &[Tuple, Tuple, Int],
    &[Tuple, Tuple, Bool],
];

const INTEGRAL: &[&[ValueType]] = &[
    &[Int, Int, Int],
    &[Int, Int, Bool],
    &[Int, Bool, Int],
    &[Int, Bool, Bool],
];

const PATH_JOIN: &[&[ValueType]] = &[&[Str, Str, Str]];

/// The quotient-remainder pair lands in a tuple-typed destination.
const DIV_MOD: &[&[ValueType]] = &[
    &[Tuple, Int, Int],
    &[Tuple, Int, Bool],
    &[Tuple, Bool, Int],
    &[Tuple, Bool, Bool],
];

const PRINT_ANY: &[&[ValueType]] = &[&[Unset, Unset]];

const STREAM_WRITE: &[&[ValueType]] = &[&[Int, Str]];

const STREAM_FLUSH: &[&[ValueType]] = &[&[Int]];

/// Every operator of the language, in declaration order.
pub static PSEUDO_MNEMONICS: &[PseudoMnemonic] = &[
    PseudoMnemonic {
        symbol: '+',
        kinds: TERNARY,
        overloads: &[
            Overload {
                signatures: NUMERIC,
                ir: IrOp::ADD,
            },
            Overload {
                signatures: CONTAINERS,
                ir: IrOp::UNION,
            },
        ],
    },
    PseudoMnemonic {
        symbol: '-',
        kinds: TERNARY,
        overloads: &[
            Overload {
                signatures: NUMERIC,
                ir: IrOp::SUB,
            },
            Overload {
                signatures: CONTAINERS,
                ir: IrOp::DIFF,
            },
        ],
    },
    PseudoMnemonic {
        symbol: '×',
        kinds: TERNARY,
        overloads: &[
            Overload {
                signatures: NUMERIC,
                ir: IrOp::MUL,
            },
            Overload {
                signatures: REPLICATION,
                ir: IrOp::REPLIC,
            },
        ],
    },
    PseudoMnemonic {
        symbol: '/',
        kinds: TERNARY,
        overloads: &[
            Overload {
                signatures: INTEGRAL,
                ir: IrOp::INTDIV,
            },
            Overload {
                signatures: PATH_JOIN,
                ir: IrOp::PATHJOIN,
            },
        ],
    },
    PseudoMnemonic {
        symbol: '%',
        kinds: TERNARY,
        overloads: &[Overload {
            signatures: INTEGRAL,
            ir: IrOp::MODULO,
        }],
    },
    PseudoMnemonic {
        symbol: '÷',
        kinds: TERNARY,
        overloads: &[Overload {
            signatures: DIV_MOD,
            ir: IrOp::DIVMOD,
        }],
    },
    PseudoMnemonic {
        symbol: 'p',
        kinds: UNARY_NO_TARGET,
        overloads: &[Overload {
            signatures: PRINT_ANY,
            ir: IrOp::PRINTV,
        }],
    },
    PseudoMnemonic {
        symbol: 'w',
        kinds: UNARY_OVER_STREAM,
        overloads: &[Overload {
            signatures: STREAM_WRITE,
            ir: IrOp::SWRITE,
        }],
    },
    PseudoMnemonic {
        symbol: 'f',
        kinds: NULLARY_OVER_STREAM,
        overloads: &[Overload {
            signatures: STREAM_FLUSH,
            ir: IrOp::SFLUSH,
        }],
    },
];

/// Symbol → pseudo-mnemonic table, handed to the compiler as explicit
/// configuration.
#[derive(Debug, Clone)]
pub struct OperatorTable {
    by_symbol: HashMap<char, PseudoMnemonic>,
}

impl OperatorTable {
    /// Look up the pseudo-mnemonic bound to `symbol`.
    pub fn get(&self, symbol: char) -> Option<&PseudoMnemonic> {
        self.by_symbol.get(&symbol)
    }

    /// Register or replace a pseudo-mnemonic.
    pub fn insert(&mut self, pseudo: PseudoMnemonic) {
        self.by_symbol.insert(pseudo.symbol, pseudo);
    }

    /// An empty table, for embedders that define their own operator set.
    pub fn empty() -> Self {
        Self {
            by_symbol: HashMap::new(),
        }
    }
}

impl Default for OperatorTable {
    /// Table containing every built-in operator.
    fn default() -> Self {
        let by_symbol = PSEUDO_MNEMONICS
            .iter()
            .map(|pseudo| (pseudo.symbol, *pseudo))
            .collect();

        Self { by_symbol }
    }
}
