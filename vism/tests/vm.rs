//! End-to-end scenarios: source text in, endpoint bytes out.

use vism::prelude::*;

fn run_source(source: &str) -> (String, String) {
    let bytecode =
        compile(SourceHandle::from_line(source), &BytecodeBackend).expect("program compiles");

    let (mut out, mut err) = (Vec::new(), Vec::new());
    Interpreter::new(&mut out, &mut err).run(&bytecode);

    (
        String::from_utf8(out).expect("utf-8 stdout"),
        String::from_utf8(err).expect("utf-8 stderr"),
    )
}

fn stdout_of(source: &str) -> String {
    let (out, err) = run_source(source);
    assert_eq!(err, "", "unexpected stderr for {source:?}");
    out
}

#[test]
fn addition_through_registers() {
    let source = r#"&x ^l 40 ^n &y ^l 2 ^n $0 ^l "x" ^n $1 ^l "y" ^n &x ^n + p"#;
    assert_eq!(stdout_of(source), "42");
}

#[test]
fn hello_world_through_a_stream() {
    assert_eq!(
        stdout_of(":0^sHello, world!\\n^nf"),
        "Hello, world!\n"
    );
}

#[test]
fn string_concatenation() {
    let source = r#"&a ^l "foo" ^n &b ^l "bar" ^n $0 ^l "a" ^n $1 ^l "b" ^n &a ^n + p"#;
    assert_eq!(stdout_of(source), "foobar");
}

#[test]
fn set_difference() {
    let source = r#"&s ^l {1,2,3} ^n &t ^l {2,3,4} ^n $0 ^l "s" ^n $1 ^l "t" ^n &s ^n - p"#;
    assert_eq!(stdout_of(source), "{1}");
}

#[test]
fn string_difference() {
    let source = r#"&a ^l "banana" ^n &b ^l "an" ^n $0 ^l "a" ^n $1 ^l "b" ^n &a ^n - p"#;
    assert_eq!(stdout_of(source), "ba");
}

#[test]
fn path_join() {
    let source = r#"&a ^l "usr" ^n &b ^l "bin" ^n $0 ^l "a" ^n $1 ^l "b" ^n &a ^n / p"#;
    assert_eq!(stdout_of(source), "usr/bin");
}

#[test]
fn replication_through_the_multiplication_sign() {
    let source = r#"&s ^l "ab" ^n &n ^l 3 ^n $0 ^l "s" ^n $1 ^l "n" ^n &s ^n × p"#;
    assert_eq!(stdout_of(source), "ababab");
}

#[test]
fn divmod_produces_a_pair() {
    let source = r#"&q ^l (0,0) ^n &a ^l 7 ^n &b ^l 2 ^n $0 ^l "a" ^n $1 ^l "b" ^n &q ^n ÷ $0 ^l "q" ^n p"#;
    assert_eq!(stdout_of(source), "(3, 1)");
}

#[test]
fn dict_merge_through_plus() {
    let source = r#"&a ^l {1: 10} ^n &b ^l {2: 20} ^n $0 ^l "a" ^n $1 ^l "b" ^n &a ^n + p"#;
    assert_eq!(stdout_of(source), "{1: 10, 2: 20}");
}

#[test]
fn stream_write_operator() {
    let source = r#"&m ^shello^n $0 ^l "m" ^n :0 ^n w f"#;
    assert_eq!(stdout_of(source), "hello");
}

#[test]
fn unflushed_streams_stay_invisible() {
    assert_eq!(stdout_of(":0 ^swaiting^n"), "");
}

#[test]
fn the_null_stream_discards_everything() {
    // The default target is the null stream.
    assert_eq!(stdout_of("^swhatever^nf"), "");
}

#[test]
fn stderr_streams_reach_the_stderr_endpoint() {
    let (out, err) = run_source(":1 ^soops^n f");
    assert_eq!(out, "");
    assert_eq!(err, "oops");
}

#[test]
fn printing_none_is_silent() {
    let source = r#"&x ^l None ^n $0 ^l "x" ^n p"#;
    assert_eq!(stdout_of(source), "");
}

#[test]
fn division_by_zero_halts_in_strict_mode() {
    let source = r#"&a ^l 1 ^n &b ^l 0 ^n $0 ^l "a" ^n $1 ^l "b" ^n &a ^n / p"#;
    let (out, err) = run_source(source);
    assert_eq!(out, "");
    assert!(err.starts_with("Runtime exception:"));
    assert!(err.contains("division by zero"));
    assert!(err.contains("[Illegal operation]"));
}

#[test]
fn float_arithmetic_widens() {
    // An int destination cannot absorb a float operand.
    let source = r#"&x ^l 1 ^n &y ^l 0.5 ^n $0 ^l "x" ^n $1 ^l "y" ^n &x ^n +"#;
    let errors = compile(SourceHandle::from_line(source), &BytecodeBackend)
        .expect_err("an int destination cannot hold a float sum");
    assert_eq!(errors[0].code, Code::E010);

    // `(float, float, int)` is declared and widens.
    let source = r#"&y ^l 0.5 ^n &x ^l 1 ^n $0 ^l "y" ^n $1 ^l "x" ^n &y ^n + $0 ^l "y" ^n p"#;
    assert_eq!(stdout_of(source), "1.5");
}

#[test]
fn programs_span_lines() {
    let source = "&x ^l 1 ^n\n$0 ^l \"x\" ^n\np";
    let bytecode = compile(SourceHandle::new("multi.vism", source), &BytecodeBackend)
        .expect("program compiles");

    let (mut out, mut err) = (Vec::new(), Vec::new());
    Interpreter::new(&mut out, &mut err).run(&bytecode);
    assert_eq!(out, b"1");
    assert!(err.is_empty());
}

#[test]
fn complex_arithmetic_prints_in_surface_notation() {
    let source = r#"&x ^l 1+2j ^n &y ^l 3j ^n $0 ^l "x" ^n $1 ^l "y" ^n &x ^n + p"#;
    assert_eq!(stdout_of(source), "(1+5j)");
}

#[test]
fn list_concatenation_and_difference() {
    let source = r#"&a ^l [1, 2] ^n &b ^l [2, 3] ^n $0 ^l "a" ^n $1 ^l "b" ^n &a ^n + p"#;
    assert_eq!(stdout_of(source), "[1, 2, 2, 3]");

    let source = r#"&a ^l [1, 2, 1] ^n &b ^l [2] ^n $0 ^l "a" ^n $1 ^l "b" ^n &a ^n - p"#;
    assert_eq!(stdout_of(source), "[1, 1]");
}

#[test]
fn flooring_division_and_modulo() {
    let source = r#"&a ^l -7 ^n &b ^l 2 ^n $0 ^l "a" ^n $1 ^l "b" ^n &a ^n / p"#;
    assert_eq!(stdout_of(source), "-4");

    let source = r#"&a ^l -7 ^n &b ^l 2 ^n $0 ^l "a" ^n $1 ^l "b" ^n &a ^n % p"#;
    assert_eq!(stdout_of(source), "1");
}

#[test]
fn booleans_count_in_arithmetic() {
    let source = r#"&x ^l 41 ^n &t ^l True ^n $0 ^l "x" ^n $1 ^l "t" ^n &x ^n + p"#;
    assert_eq!(stdout_of(source), "42");
}

#[test]
fn memory_survives_for_inspection() {
    let source = r#"&x ^l 40 ^n &y ^l 2 ^n $0 ^l "x" ^n $1 ^l "y" ^n &x ^n +"#;
    let bytecode =
        compile(SourceHandle::from_line(source), &BytecodeBackend).expect("program compiles");

    let (mut out, mut err) = (Vec::new(), Vec::new());
    let mut vm = Interpreter::new(&mut out, &mut err);
    vm.run(&bytecode);

    assert_eq!(vm.memory().get(&Identifier::from("x")), Some(&Value::Int(42)));
    assert_eq!(vm.memory().get(&Identifier::from("y")), Some(&Value::Int(2)));
}
