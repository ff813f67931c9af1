// ABOUTME: Host API shim bundling the callbacks exposed to external command modules

use crate::env::{get_val, Environment, FunctionTable};
use crate::error::SpokeError;
use crate::value::Value;

/// The seven-argument handler contract of the reference source, collapsed
/// into a single struct-of-callbacks: tokens, the shared environment and
/// function table, value coercion, error reporting, and source position.
pub struct Host<'a> {
    pub tokens: &'a [String],
    pub env: &'a mut Environment,
    pub functions: &'a FunctionTable,
    pub line_num: usize,
    pub line: &'a str,
}

impl<'a> Host<'a> {
    pub fn coerce(&self, token: &str) -> Value {
        get_val(self.env, token)
    }

    /// Builds the Syntax-kind error a handler reports for a usage mistake.
    /// Handlers propagate it with `?` rather than terminating the process
    /// directly, matching the rest of the interpreter's error handling.
    pub fn error_line(&self, detail: impl Into<String>) -> SpokeError {
        SpokeError::syntax(self.line_num, self.line.to_string(), detail)
    }
}
