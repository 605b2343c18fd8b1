//! Compiler behavior: the error catalogue and the typing invariants.

use vism::prelude::*;

fn compile_line(source: &str) -> Result<Vec<Instruction>, Vec<Diagnostic>> {
    compile(SourceHandle::from_line(source), &BytecodeBackend)
}

fn first_error(source: &str) -> Diagnostic {
    let mut errors = compile_line(source).expect_err("expected a compile error");
    assert!(!errors.is_empty());
    errors.remove(0)
}

#[test]
fn selector_payloads_are_validated() {
    assert_eq!(first_error("&0 ^n").code, Code::E001);
    assert_eq!(first_error("$x ^n").code, Code::E001);
    assert_eq!(first_error(":D ^n").code, Code::E001);
    // In range as a byte, outside the register file.
    assert_eq!(first_error("$10 ^n").code, Code::E001);
    // An end-of-line flush on the final line still reports.
    assert_eq!(first_error("&0").code, Code::E001);
}

#[test]
fn bad_literals_are_rejected() {
    assert_eq!(first_error("&x ^l oops ^n").code, Code::E002);
    assert_eq!(first_error("&x ^l \"unterminated ^n").code, Code::E002);
    assert_eq!(first_error("&x ^l [1, ^n").code, Code::E002);
}

#[test]
fn types_are_fixed_by_the_first_assignment() {
    let errors =
        compile_line("&x ^l 1 ^n &x ^s hello ^n").expect_err("expected a type error");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, Code::E003);
    assert!(errors[0].primary.message.contains("expected `int`"));
    // The first binding site is pointed at.
    assert_eq!(errors[0].info.len(), 1);
    assert!(errors[0].info[0].message.contains("was defined here as int"));
}

#[test]
fn reassignment_with_the_same_type_is_allowed() {
    let mut compiler = Compiler::new(SourceHandle::new(
        "repl",
        "&x ^l 1 ^n\n&x ^l 2 ^n",
    ));
    let bytecode = compiler.compile(&BytecodeBackend).expect("compiles");
    assert_eq!(bytecode.len(), 2);

    let typedef = compiler.typedefs().get(&Identifier::from("x"));
    assert_eq!(typedef.value_type(), ValueType::Int);
    // The typedef still points at the first assignment.
    assert_eq!(typedef.position().map(|(line, ..)| line), Some(1));
}

#[test]
fn truncated_mode_switches_are_reported() {
    assert_eq!(first_error("&x ^").code, Code::E004);
    assert_eq!(first_error("?").code, Code::E004);

    let error = first_error("&x ^");
    assert!(error.primary.message.contains("mode character"));
}

#[test]
fn unknown_modes_and_macros_are_reported() {
    let error = first_error("^r");
    assert_eq!(error.code, Code::E005);
    assert_eq!(error.candidates.len(), 3);

    let error = first_error("?z");
    assert_eq!(error.code, Code::E006);
    assert_eq!(error.candidates, vec!["`?d`".to_owned()]);
}

#[test]
fn invalid_escapes_are_reported() {
    assert_eq!(first_error("&x ^s a\\q ^n").code, Code::E007);
}

#[test]
fn escape_sequences_reach_the_stored_value() {
    let pairs = [
        ("\\\\", "\\"),
        ("\\n", "\n"),
        ("\\t", "\t"),
        ("\\b", "\u{0008}"),
        ("\\f", "\u{000C}"),
        ("\\r", "\r"),
        ("\\e", "\u{001B}"),
        ("\\^", "^"),
        ("\\?", "?"),
    ];

    for (escape, expected) in pairs {
        let bytecode = compile_line(&format!(":0 ^s{escape}^n")).expect("compiles");
        assert_eq!(
            bytecode,
            vec![Instruction::WRITE(
                STDOUT,
                Source::Imm(Value::Str(expected.to_owned()))
            )],
            "escape {escape:?}",
        );
    }
}

#[test]
fn unknown_symbols_suggest_confusables() {
    let error = first_error("&x ^l 1 ^n *");
    assert_eq!(error.code, Code::E008);
    assert_eq!(error.hint.as_deref(), Some("did you mean `×`?"));

    let error = first_error("z");
    assert_eq!(error.code, Code::E008);
    assert_eq!(error.hint, None);
}

#[test]
fn missing_operands_are_counted() {
    let error = first_error("+");
    assert_eq!(error.code, Code::E009);
    assert!(error.summary.contains("expected 2 but got 0"));

    let error = first_error("&a ^l 1 ^n $0 ^l \"a\" ^n +");
    assert_eq!(error.code, Code::E009);
    assert!(error.summary.contains("expected 2 but got 1"));
}

#[test]
fn overload_misses_list_the_received_types() {
    let source = "&a ^l 0 ^n &c ^s 9 ^n $0 ^l \"a\" ^n $1 ^l \"c\" ^n &a ^n +";
    let error = first_error(source);
    assert_eq!(error.code, Code::E010);
    assert!(error.summary.contains("`int`, `int` and `str`"));
}

#[test]
fn stream_operators_require_a_stream_target() {
    // `f` type-checks against an int destination, but the target must be a
    // stream.
    assert_eq!(first_error("&x ^l 1 ^n f").code, Code::E010);
}

#[test]
fn register_assignments_must_name_defined_slots() {
    let mut compiler = Compiler::new(SourceHandle::from_line("$0 ^l \"x\" ^n"));
    let errors = compiler
        .compile(&BytecodeBackend)
        .expect_err("expected an undefined identifier");
    assert_eq!(errors[0].code, Code::E011);
    // No IR came out of the failed statement.
    assert!(compiler.ir().is_empty());
}

#[test]
fn register_assignments_must_be_strings() {
    assert_eq!(first_error("$0 ^l 5 ^n").code, Code::E003);
}

#[test]
fn compilation_aborts_on_the_first_error() {
    let errors = compile_line("&x ^s a ^n &x ^l 1 ^n zzzz").expect_err("expected errors");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, Code::E003);
}

#[test]
fn typing_state_survives_a_buffer_swap() {
    let mut compiler = Compiler::new(SourceHandle::from_line("&x ^l 1 ^n $0 ^l \"x\" ^n"));
    compiler.compile(&BytecodeBackend).expect("compiles");

    compiler.change_file(SourceHandle::from_line("&x ^s oops ^n"));
    let errors = compiler
        .compile(&BytecodeBackend)
        .expect_err("type knowledge must persist");
    assert_eq!(errors[0].code, Code::E003);

    // Registers persist too: `p` still has its operand.
    compiler.change_file(SourceHandle::from_line("p"));
    let bytecode = compiler.compile(&BytecodeBackend).expect("compiles");
    assert_eq!(bytecode, vec![Instruction::PRINT(Identifier::from("x"))]);
}

#[test]
fn debug_macro_leaves_the_program_intact() {
    let bytecode = compile_line("&x ^l 1 ^n ?d").expect("compiles");
    assert_eq!(bytecode.len(), 1);
}

#[test]
fn assignments_to_streams_coerce_to_text() {
    let bytecode = compile_line(":0 ^l 42 ^n").expect("compiles");
    assert_eq!(
        bytecode,
        vec![Instruction::WRITE(
            STDOUT,
            Source::Imm(Value::Str("42".to_owned()))
        )]
    );
}

#[test]
fn rendered_diagnostics_carry_the_banner_and_carets() {
    let error = first_error("&x ^l 1 ^n &x ^s hello ^n");
    let rendered = error.to_string();

    assert!(rendered.starts_with("[E003]: mismatched types"));
    assert!(rendered.contains(" --> <stdin>:1:"));
    assert!(rendered.contains("^"));
    assert!(rendered.contains("- was defined here as int"));
}
