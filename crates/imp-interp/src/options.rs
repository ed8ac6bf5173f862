//! Evaluation options.
//!
//! Options are enumerated; anything outside the enumeration is a
//! construction error, not a runtime one.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Width of the `Int` domain. Arithmetic wraps two's-complement at this
/// width; shift amounts are masked to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    #[default]
    W64,
}

impl IntWidth {
    pub fn bits(&self) -> u32 {
        match self {
            IntWidth::W8 => 8,
            IntWidth::W16 => 16,
            IntWidth::W32 => 32,
            IntWidth::W64 => 64,
        }
    }

    /// Accepts exactly 8, 16, 32, or 64.
    pub fn from_bits(bits: u8) -> Result<Self, OptionsError> {
        match bits {
            8 => Ok(IntWidth::W8),
            16 => Ok(IntWidth::W16),
            32 => Ok(IntWidth::W32),
            64 => Ok(IntWidth::W64),
            _ => Err(OptionsError::InvalidIntWidth { bits }),
        }
    }
}

/// Error constructing [`Options`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("invalid integer width: {bits} (expected 8, 16, 32, or 64)")]
    InvalidIntWidth { bits: u8 },
}

/// Configuration for an evaluation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Options {
    /// Abort with `StepLimitExceeded` after this many evaluation steps.
    /// Unset means no limit -- termination is the program's business.
    pub max_steps: Option<u64>,
    /// Integer width, default 64 bits.
    pub int_width: IntWidth,
    /// Whether `Char` sign-extends when promoted to `Int` (default:
    /// zero-extend).
    pub signed_char: bool,
}

impl Options {
    /// Convenience for the common test configuration.
    pub fn with_max_steps(max_steps: u64) -> Self {
        Options {
            max_steps: Some(max_steps),
            ..Options::default()
        }
    }
}
