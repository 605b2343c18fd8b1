//! Constructors for every catalogue entry.

use itertools::Itertools;
use strum::IntoEnumIterator;

use vism_asm::{Identifier, ValueType};

use crate::compiler::macros::MacroKind;
use crate::compiler::TypeDef;
use crate::parser::{Mode, ParsingState, StorageKind};
use crate::source::SourceHandle;

use super::{Code, Diagnostic, SourceLabel};

/// Visually-confusable replacement for an unknown operator symbol.
pub(crate) fn confusable(symbol: char) -> Option<char> {
    match symbol {
        '*' => Some('×'),
        _ => None,
    }
}

/// E001: the selector payload fails the selector's internal type.
pub(crate) fn e001(file: &SourceHandle, kind: StorageKind, payload: &str, spos: usize) -> Diagnostic {
    let message = format!("invalid {}", kind.payload_name());
    let summary = format!("{message} '{payload}'");

    Diagnostic::new(
        Code::E001,
        summary,
        file.name(),
        SourceLabel::new(file.freeze(spos), message),
    )
}

/// E002: the Assign buffer is not a valid literal.
pub(crate) fn e002(file: &SourceHandle, payload: &str, spos: usize) -> Diagnostic {
    let summary = format!("invalid literal '{payload}'");

    Diagnostic::new(
        Code::E002,
        summary,
        file.name(),
        SourceLabel::new(file.freeze(spos), "invalid literal"),
    )
}

/// E003: the value's type mismatches the target's prior typedef.
pub(crate) fn e003(
    file: &SourceHandle,
    expected: &TypeDef,
    found: ValueType,
    spos: usize,
) -> Diagnostic {
    let expected_type = expected.value_type();
    let message = format!("expected `{expected_type}`, found {found}");

    let info = expected
        .position()
        .filter(|&(line, _, _)| line >= 1 && line - 1 < file.line_count())
        .map(|(line, def_spos, def_epos)| {
            SourceLabel::new(
                (file.get_line(line - 1).to_owned(), line, def_spos, def_epos),
                format!("was defined here as {expected_type}"),
            )
        })
        .into_iter()
        .collect();

    Diagnostic::new(
        Code::E003,
        "mismatched types",
        file.name(),
        SourceLabel::new(file.freeze(spos), message),
    )
    .with_info(info)
}

/// E004: a mode, macro or payload character was expected, but the line ended.
pub(crate) fn e004(file: &SourceHandle, state: &ParsingState) -> Diagnostic {
    let guess = guess_expected(file, state);
    let message = match &guess {
        Some(what) => format!("expected {what} here"),
        None => "here".to_owned(),
    };

    let (content, number, spos, epos) = file.freeze(file.pos());

    Diagnostic::new(
        Code::E004,
        "unexpected end of line",
        file.name(),
        SourceLabel {
            content,
            number,
            spos,
            epos: epos + 1,
            message,
        },
    )
}

fn guess_expected(file: &SourceHandle, state: &ParsingState) -> Option<String> {
    match file.char_at(file.pos().wrapping_sub(1)) {
        Some(crate::consts::PRGM_MODE_CHAR) => Some("mode character".to_owned()),
        Some(crate::consts::MACRO_MODE_CHAR) => Some("macro character".to_owned()),
        _ => match state.mode {
            Mode::Select => Some(state.select_kind.payload_name().to_owned()),
            Mode::Assign => state.assign_kind.map(|kind| kind.name().to_owned()),
            Mode::Normal => None,
        },
    }
}

/// E005: `^X` with an unrecognized mode character.
pub(crate) fn e005(file: &SourceHandle) -> Diagnostic {
    let symbol = file.current_char();
    let summary = format!("invalid mode '{symbol}'");
    let candidates = ["n", "s", "l"]
        .iter()
        .map(|mode| format!("`^{mode}`"))
        .collect();

    Diagnostic::new(
        Code::E005,
        summary,
        file.name(),
        SourceLabel::new(file.freeze(file.pos()), "invalid mode"),
    )
    .with_hint("try using one of the following candidates:")
    .with_candidates(candidates)
}

/// E006: `?X` with an undefined macro character.
pub(crate) fn e006(file: &SourceHandle) -> Diagnostic {
    let symbol = file.current_char();
    let summary = format!("macro `?{symbol}` is undefined");
    let candidates = MacroKind::iter()
        .map(|kind| format!("`?{}`", kind.symbol()))
        .collect();

    Diagnostic::new(
        Code::E006,
        summary,
        file.name(),
        SourceLabel::new(file.freeze(file.pos()), "this macro is undefined"),
    )
    .with_hint("try using one of the following candidates:")
    .with_candidates(candidates)
}

/// E007: invalid escape sequence inside an Assign buffer.
pub(crate) fn e007(file: &SourceHandle) -> Diagnostic {
    let symbol = file.current_char();
    let summary = format!("invalid escape sequence '\\{symbol}'");

    let (content, number, spos, epos) = file.freeze(file.pos().saturating_sub(1));

    Diagnostic::new(
        Code::E007,
        summary,
        file.name(),
        SourceLabel {
            content,
            number,
            spos,
            epos: epos + 1,
            message: "invalid escape sequence".to_owned(),
        },
    )
}

/// E008: unknown symbol in Normal mode.
pub(crate) fn e008(file: &SourceHandle) -> Diagnostic {
    let symbol = file.current_char();
    let summary = format!("unknown symbol '{symbol}'");

    let (content, number, spos, epos) = file.freeze(file.pos());
    let diagnostic = Diagnostic::new(
        Code::E008,
        summary,
        file.name(),
        SourceLabel {
            content,
            number,
            spos,
            epos: epos + 1,
            message: "unknown symbol".to_owned(),
        },
    );

    match confusable(symbol) {
        Some(suggestion) => diagnostic.with_hint(format!("did you mean `{suggestion}`?")),
        None => diagnostic,
    }
}

/// E009: not enough register-provided operands for an operator.
pub(crate) fn e009(
    file: &SourceHandle,
    symbol: char,
    expected: usize,
    received: usize,
) -> Diagnostic {
    let message = "unmatching number of parameters";
    let summary =
        format!("{message} for '{symbol}': expected {expected} but got {received}");

    let (content, number, spos, epos) = file.freeze(file.pos());

    Diagnostic::new(
        Code::E009,
        summary,
        file.name(),
        SourceLabel {
            content,
            number,
            spos,
            epos: epos + 1,
            message: message.to_owned(),
        },
    )
}

/// E010: the operator has no overload for the received type tuple.
pub(crate) fn e010(file: &SourceHandle, symbol: char, received: &[ValueType]) -> Diagnostic {
    let listing = type_listing(received);
    let summary = format!("no overload for `{symbol}` with {listing}");

    let (content, number, spos, epos) = file.freeze(file.pos());

    Diagnostic::new(
        Code::E010,
        summary,
        file.name(),
        SourceLabel {
            content,
            number,
            spos,
            epos: epos + 1,
            message: format!("no overload for {listing}"),
        },
    )
}

fn type_listing(types: &[ValueType]) -> String {
    match types.split_last() {
        None => String::new(),
        Some((last, [])) => format!("`{last}`"),
        Some((last, rest)) => format!(
            "{} and `{last}`",
            rest.iter().map(|ty| format!("`{ty}`")).join(", ")
        ),
    }
}

/// E011: a register was assigned an identifier that has no typedef.
pub(crate) fn e011(file: &SourceHandle, id: &Identifier, spos: usize) -> Diagnostic {
    let summary = format!("undefined identifier `{id}`");

    Diagnostic::new(
        Code::E011,
        summary,
        file.name(),
        SourceLabel::new(file.freeze(spos), "undefined identifier"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_listing_reads_naturally() {
        assert_eq!(type_listing(&[ValueType::Int]), "`int`");
        assert_eq!(
            type_listing(&[ValueType::Int, ValueType::Str]),
            "`int` and `str`"
        );
        assert_eq!(
            type_listing(&[ValueType::Int, ValueType::Str, ValueType::Set]),
            "`int`, `str` and `set`"
        );
    }

    #[test]
    fn confusables_suggest_the_multiplication_sign() {
        assert_eq!(confusable('*'), Some('×'));
        assert_eq!(confusable('z'), None);
    }
}
