// ABOUTME: Error taxonomy for the interpreter, mapped to the spec's on-screen formats

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpokeError {
    #[error("{0}")]
    Usage(String),

    #[error("Err on line {line_num}\nLine: {line}")]
    Syntax {
        line_num: usize,
        line: String,
        detail: String,
    },

    #[error("Err on line {line_num}\nLine: {line}")]
    Runtime {
        line_num: usize,
        line: String,
        detail: String,
    },

    #[error("Err on line {line_num}\nLine: {line}")]
    HandlerRejected { line_num: usize, line: String },

    #[error("DEBUG: {detail}\nErr on line {line_num}\nLine: {line}")]
    Internal {
        line_num: usize,
        line: String,
        detail: String,
    },
}

impl SpokeError {
    pub fn usage(message: impl Into<String>) -> Self {
        SpokeError::Usage(message.into())
    }

    pub fn syntax(line_num: usize, line: impl Into<String>, detail: impl Into<String>) -> Self {
        SpokeError::Syntax {
            line_num,
            line: line.into(),
            detail: detail.into(),
        }
    }

    pub fn runtime(line_num: usize, line: impl Into<String>, detail: impl Into<String>) -> Self {
        SpokeError::Runtime {
            line_num,
            line: line.into(),
            detail: detail.into(),
        }
    }

    pub fn handler_rejected(line_num: usize, line: impl Into<String>) -> Self {
        SpokeError::HandlerRejected {
            line_num,
            line: line.into(),
        }
    }

    pub fn internal(line_num: usize, line: impl Into<String>, detail: impl Into<String>) -> Self {
        SpokeError::Internal {
            line_num,
            line: line.into(),
            detail: detail.into(),
        }
    }

    /// Exit code this error should produce when surfaced from `main`.
    pub fn exit_code(&self) -> i32 {
        match self {
            SpokeError::Usage(_) => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_formats_as_two_lines() {
        let err = SpokeError::syntax(3, "foo bar", "unknown verb");
        assert_eq!(err.to_string(), "Err on line 3\nLine: foo bar");
    }

    #[test]
    fn internal_error_prefixes_debug_line() {
        let err = SpokeError::internal(1, "let x = 1", "panic caught");
        assert_eq!(
            err.to_string(),
            "DEBUG: panic caught\nErr on line 1\nLine: let x = 1"
        );
    }

    #[test]
    fn usage_error_has_no_line_info() {
        let err = SpokeError::usage("expected a .spk file");
        assert_eq!(err.to_string(), "expected a .spk file");
        assert_eq!(err.exit_code(), 2);
    }
}
