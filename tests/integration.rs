// ABOUTME: End-to-end scenarios from the interpreter's test matrix, run against the library API

use std::io::Write;
use tempfile::NamedTempFile;

fn run(src: &str) -> Result<(), spoke::error::SpokeError> {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{src}").unwrap();
    let commands_dir = tempfile::tempdir().unwrap().keep();
    spoke::run_script(file.path(), commands_dir)
}

#[test]
fn let_then_print_literal() {
    assert!(run("let x = 5\nprint x\n").is_ok());
}

#[test]
fn let_with_addition_then_print() {
    assert!(run("let x = 2 + 3\nprint x\n").is_ok());
}

#[test]
fn if_then_else_picks_true_branch() {
    assert!(run("if ( 1 == 1 ) then { print ( yes ) } else { print ( no ) }\n").is_ok());
}

#[test]
fn if_else_if_else_chain() {
    let src = "if ( 1 >> 2 ) then {\nprint ( a )\n} else if ( 2 >> 1 ) then {\nprint ( b )\n} else {\nprint ( c )\n}\n";
    assert!(run(src).is_ok());
}

#[test]
fn function_definition_and_call_restores_parameter_scope() {
    let src = "function f ( a b ) {\nlet s = a + b\nprint s\n}\nf ( 3 4 )\n";
    assert!(run(src).is_ok());
}

#[test]
fn unknown_verb_with_no_function_and_no_command_is_an_error() {
    let err = run("foo\n").unwrap_err();
    assert_eq!(err.to_string(), "Err on line 1\nLine: foo");
}

#[test]
fn command_dispatch_reaches_the_registered_echo_module() {
    assert!(run("echo hello there\n").is_ok());
}

#[test]
fn nonexistent_script_is_a_usage_error() {
    let commands_dir = tempfile::tempdir().unwrap().keep();
    let err = spoke::run_script(std::path::Path::new("/no/such/file.spk"), commands_dir)
        .unwrap_err();
    assert!(matches!(err, spoke::error::SpokeError::Usage(_)));
}
