// ABOUTME: Library module exposing internal components for testing

pub mod block;
pub mod commands;
pub mod condition;
pub mod config;
pub mod dispatcher;
pub mod env;
pub mod error;
pub mod exec;
pub mod host;
pub mod lexer;
pub mod value;

use error::SpokeError;
use std::fs;
use std::path::Path;

/// Reads a `.spk` source file and runs it to completion.
pub fn run_script(path: &Path, commands_dir: std::path::PathBuf) -> Result<(), SpokeError> {
    let source = fs::read_to_string(path)
        .map_err(|e| SpokeError::usage(format!("cannot read '{}': {e}", path.display())))?;
    let lines: Vec<String> = source.lines().map(|l| l.to_string()).collect();
    let mut interpreter = exec::Interpreter::new(commands_dir);
    interpreter.execute_lines(&lines, 0)
}
