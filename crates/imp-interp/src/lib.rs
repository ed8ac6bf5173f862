//! Execution engine for the IMP language.
//!
//! Two layers share one runtime model:
//!
//! - The **abstract machine** ([`machine`]): six instructions over the
//!   `(store, stdin, stdout)` triple plus a pure expression language.
//!   Whole programs can be written at this level and run with
//!   [`machine::execute`].
//! - The **IR interpreter** ([`interp`]): structural recursion over
//!   `imp_core::Ir`, lowering every node to zero or more machine
//!   instructions while producing a return value. Control flow is
//!   value-driven: `Break`/`Continue` tokens flow out of blocks and are
//!   unwrapped by loops.
//!
//! The usual entry point is [`run`]:
//!
//! ```
//! use imp_core::builder::{getc_, peek_, putc_, while_};
//! use imp_core::value::Value;
//!
//! // Copy stdin to stdout.
//! let echo = while_(peek_().ne_(Value::Unit), [putc_(getc_())]);
//! assert_eq!(imp_interp::run(&echo, "hello").unwrap(), "hello");
//! ```

pub mod error;
pub mod interp;
pub mod machine;
pub mod options;
pub mod pure;
pub mod run;

pub use error::RuntimeError;
pub use interp::Interpreter;
pub use options::{IntWidth, Options, OptionsError};
pub use run::{run, run_with};
