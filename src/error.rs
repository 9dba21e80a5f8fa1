//! Error types for the table-driven generator.
//!
//! Using thiserror for more idiomatic error handling. Table malformation
//! is always fatal; output-path failures are handled best-effort by the
//! orchestrator and never surface here.

use thiserror::Error;

/// Main error type for a generation run.
#[derive(Error, Debug)]
pub enum GenError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed instruction line {line:?}: {reason}")]
    InstructionLine { line: String, reason: &'static str },

    #[error("malformed register line {line:?}: {reason}")]
    RegisterLine { line: String, reason: &'static str },

    #[error("bad register value {value:?} in {context:?}")]
    RegisterValue { value: String, context: String },

    #[error("no {what}, bad flags: {flags}")]
    UnknownFlags { what: &'static str, flags: String },

    #[error("bad operand identifier {ident:?}: {reason}")]
    Operand { ident: String, reason: &'static str },

    #[error("bundle inspection failed: {reason}")]
    Bundle { reason: String },
}

/// Result type alias for generator operations.
pub type GenResult<T> = Result<T, GenError>;
