//! Parse failure diagnostics.
//!
//! Every failure is fatal to the current parse: the parser reports the first
//! error it hits and does not attempt recovery or resync. Errors carry the
//! source line and a byte span so callers can render them against the input
//! with miette's report handler.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParseError>;

#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    /// A required match failed at a point where the grammar offers no
    /// alternative, e.g. a missing `{` or an empty value list.
    #[error("syntax error on line {line}: expected {expected}")]
    #[diagnostic(code(sassafras::syntax_mismatch))]
    SyntaxMismatch {
        expected: String,
        line: usize,
        #[label("expected {expected}")]
        span: SourceSpan,
    },

    /// A value list referenced a variable with no binding at that point in
    /// the document.
    #[error("undefined variable `{name}` on line {line}")]
    #[diagnostic(
        code(sassafras::undefined_variable),
        help("variables must be defined earlier in the document than any reference to them")
    )]
    UndefinedVariable {
        name: String,
        line: usize,
        #[label("no binding for `{name}` here")]
        span: SourceSpan,
    },
}

impl ParseError {
    /// The source line the failure was reported on.
    pub fn line(&self) -> usize {
        match self {
            ParseError::SyntaxMismatch { line, .. } => *line,
            ParseError::UndefinedVariable { line, .. } => *line,
        }
    }
}
