//! Data model for the IMP language: the value domain, the variable
//! store, the runtime triple, the abstract-machine instruction set, the
//! tree-shaped IR, and the construction API.
//!
//! This crate defines *shapes* only. Execution -- the pure operator
//! table, the machine transitions, and the structural IR interpreter --
//! lives in `imp-interp`.

pub mod builder;
pub mod error;
pub mod ir;
pub mod machine;
pub mod ops;
pub mod runtime;
pub mod store;
pub mod value;

// Re-export commonly used types
pub use error::CoreError;
pub use ir::{CastTo, Ir};
pub use machine::{Expr, Instr};
pub use ops::{BinaryOp, LogicOp, StepOp, UnaryOp};
pub use runtime::{Runtime, Stdin};
pub use store::Store;
pub use value::{LambdaFn, Marker, Value};
