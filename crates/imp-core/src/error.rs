//! Construction-time error types for the core data model.
//!
//! Uses `thiserror` for structured, matchable variants. Runtime
//! (evaluation) errors live in the interpreter crate; everything here is
//! reported while *building* IR, before any evaluation happens.

use thiserror::Error;

/// Errors produced while constructing IR.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The symbol-keyed operator facility was handed a symbol with no
    /// operator behind it.
    #[error("unknown operator symbol: '{symbol}'")]
    UnknownOperator { symbol: String },

    /// A recognized operator was applied to the wrong number of
    /// operands.
    #[error("operator '{symbol}' cannot take {arity} operand(s)")]
    OperatorArity { symbol: String, arity: usize },
}
