//! Runtime error taxonomy for machine and interpreter execution.
//!
//! Evaluation is total on well-formed IR; every variant here reports a
//! programmer error in the evaluated program (or an exhausted step
//! budget), never a recoverable condition. There is no partial output:
//! the entry points return either the full output string or one of
//! these.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum RuntimeError {
    /// A node whose shape or operand kinds violate the evaluation
    /// contract (non-variable assignment target, condition without a
    /// boolean interpretation, call of a non-callable, ...).
    #[error("malformed IR: {reason}")]
    MalformedIr { reason: String },

    /// The pure operator table has no entry for this symbol on these
    /// operand kinds. (`==`/`!=` never land here: mismatched operands
    /// compare unequal by definition.)
    #[error("unsupported operator '{symbol}' on {operands}")]
    UnsupportedOperator { symbol: String, operands: String },

    /// Division or modulo with a zero divisor.
    #[error("division by zero")]
    DivisionByZero,

    /// Execution exceeded the configured step budget.
    #[error("step limit of {limit} exceeded")]
    StepLimitExceeded { limit: u64 },

    /// Defensive: a condition the evaluator relies on internally did
    /// not hold. Should never occur on well-formed IR.
    #[error("internal invariant violated: {reason}")]
    InternalInvariant { reason: String },
}

impl RuntimeError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        RuntimeError::MalformedIr {
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(symbol: &str, operands: impl Into<String>) -> Self {
        RuntimeError::UnsupportedOperator {
            symbol: symbol.to_string(),
            operands: operands.into(),
        }
    }
}
