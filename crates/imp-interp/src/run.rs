//! Entry points: evaluate an IR program against an input string.

use imp_core::builder::{global_, lit, scope_depth_name};
use imp_core::ir::Ir;
use imp_core::runtime::Runtime;

use crate::error::RuntimeError;
use crate::interp::Interpreter;
use crate::options::Options;

/// Runs `program` with default options. See [`run_with`].
pub fn run(program: &Ir, input: &str) -> Result<String, RuntimeError> {
    run_with(program, input, &Options::default())
}

/// Runs `program` against `input`: seeds a runtime with an empty store,
/// the input bytes, and empty output, initializes the stack-scope
/// counter to zero, evaluates, and returns the accumulated output. The
/// program's own top-level value is discarded. On error there is no
/// partial output.
pub fn run_with(program: &Ir, input: &str, opts: &Options) -> Result<String, RuntimeError> {
    let mut interp = Interpreter::new(opts);
    let rt = Runtime::new(input);
    let (rt, _) = interp.eval(&global_(scope_depth_name()).assign(lit(0)), rt)?;
    let (rt, _) = interp.eval(program, rt)?;
    Ok(rt.stdout_lossy())
}
