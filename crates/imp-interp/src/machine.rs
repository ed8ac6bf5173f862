//! Abstract-machine execution: expression evaluation and instruction
//! application over a [`Runtime`].
//!
//! Instructions are pure state transitions -- each application consumes
//! a runtime and yields the next one. `While` is defined recursively
//! (`While(c, b) = If(c, Block(b, While(c, b)))`) but executed
//! iteratively, with every iteration charged against the shared step
//! budget so a non-terminating machine program surfaces as
//! `StepLimitExceeded` when a budget is configured.

use imp_core::machine::{Expr, Instr};
use imp_core::runtime::Runtime;
use imp_core::value::Value;

use crate::error::RuntimeError;
use crate::options::Options;
use crate::pure;

/// Shared step budget. Each instruction application and each IR node
/// evaluation costs one step.
#[derive(Debug)]
pub(crate) struct Budget {
    steps: u64,
    limit: Option<u64>,
}

impl Budget {
    pub(crate) fn new(limit: Option<u64>) -> Self {
        Budget { steps: 0, limit }
    }

    pub(crate) fn tick(&mut self) -> Result<(), RuntimeError> {
        self.steps += 1;
        match self.limit {
            Some(limit) if self.steps > limit => {
                Err(RuntimeError::StepLimitExceeded { limit })
            }
            _ => Ok(()),
        }
    }
}

/// Coerces a condition value, rejecting values with no boolean
/// interpretation.
pub(crate) fn condition(v: &Value) -> Result<bool, RuntimeError> {
    v.truthiness().ok_or_else(|| {
        RuntimeError::malformed(format!(
            "condition has no boolean interpretation: {}",
            v.resolved().type_name()
        ))
    })
}

/// Converts a peek offset; negative offsets are simply out of range.
pub(crate) fn peek_at(rt: &Runtime, offset: &Value, opts: &Options) -> Result<Value, RuntimeError> {
    let off = scalar_arg(offset, opts, "peek offset")?;
    Ok(match usize::try_from(off) {
        Ok(k) => rt.peek(k),
        Err(_) => Value::Unit,
    })
}

/// Converts an advance amount; negative amounts clamp to zero.
pub(crate) fn advance_amount(v: &Value, opts: &Options) -> Result<usize, RuntimeError> {
    let n = scalar_arg(v, opts, "advance amount")?;
    Ok(usize::try_from(n).unwrap_or(0))
}

fn scalar_arg(v: &Value, opts: &Options, what: &str) -> Result<i64, RuntimeError> {
    match v.resolved() {
        Value::Int(i) => Ok(*i),
        Value::Char(c) => Ok(if opts.signed_char {
            i64::from(*c as i8)
        } else {
            i64::from(*c)
        }),
        Value::Bool(b) => Ok(i64::from(*b)),
        other => Err(RuntimeError::malformed(format!(
            "{} must be numeric, got {}",
            what,
            other.type_name()
        ))),
    }
}

/// Appends a value to stdout: chars and ints as single bytes, sequences
/// element by element.
pub(crate) fn put_value(rt: &mut Runtime, v: &Value) -> Result<(), RuntimeError> {
    match v.resolved() {
        Value::Char(c) => rt.put(*c),
        Value::Int(i) => rt.put(*i as u8),
        Value::Str(s) => rt.put_all(s),
        Value::Tuple(xs) | Value::Vector(xs) => {
            for x in xs {
                put_value(rt, x)?;
            }
        }
        other => {
            return Err(RuntimeError::malformed(format!(
                "cannot write {} to stdout",
                other.type_name()
            )))
        }
    }
    Ok(())
}

/// Evaluates a machine expression against the runtime without modifying
/// it.
pub fn eval_expr(expr: &Expr, rt: &Runtime, opts: &Options) -> Result<Value, RuntimeError> {
    match expr {
        Expr::Lit(v) => Ok(v.clone()),
        Expr::Var(name) => Ok(rt.store.get(name)),
        Expr::Peek(offset) => {
            let off = eval_expr(offset, rt, opts)?;
            peek_at(rt, &off, opts)
        }
        Expr::Len(e) => pure::len(&eval_expr(e, rt, opts)?),
        Expr::Unary { op, expr } => pure::unary(*op, &eval_expr(expr, rt, opts)?, opts),
        Expr::Binary { op, lhs, rhs } => {
            let l = eval_expr(lhs, rt, opts)?;
            let r = eval_expr(rhs, rt, opts)?;
            pure::binary(*op, &l, &r, opts)
        }
        Expr::Logic { op, lhs, rhs } => {
            let l = eval_expr(lhs, rt, opts)?;
            let r = eval_expr(rhs, rt, opts)?;
            pure::logic(*op, &l, &r)
        }
        Expr::Index { base, index } => {
            let b = eval_expr(base, rt, opts)?;
            let i = eval_expr(index, rt, opts)?;
            pure::index(&b, &i, opts)
        }
    }
}

/// Applies one instruction, yielding the successor runtime.
pub(crate) fn apply(
    instr: &Instr,
    mut rt: Runtime,
    opts: &Options,
    budget: &mut Budget,
) -> Result<Runtime, RuntimeError> {
    budget.tick()?;
    match instr {
        Instr::Set { name, value } => {
            let v = eval_expr(value, &rt, opts)?;
            rt.store.set(name.clone(), v);
            Ok(rt)
        }
        Instr::Advance(e) => {
            let v = eval_expr(e, &rt, opts)?;
            let n = advance_amount(&v, opts)?;
            rt.advance(n);
            Ok(rt)
        }
        Instr::Put(args) => {
            for arg in args {
                let v = eval_expr(arg, &rt, opts)?;
                put_value(&mut rt, &v)?;
            }
            Ok(rt)
        }
        Instr::Block(instrs) => {
            for i in instrs {
                rt = apply(i, rt, opts, budget)?;
            }
            Ok(rt)
        }
        Instr::If {
            cond,
            then_branch,
            else_branch,
        } => {
            let c = eval_expr(cond, &rt, opts)?;
            if condition(&c)? {
                apply(then_branch, rt, opts, budget)
            } else {
                apply(else_branch, rt, opts, budget)
            }
        }
        Instr::While { cond, body } => {
            loop {
                budget.tick()?;
                let c = eval_expr(cond, &rt, opts)?;
                if !condition(&c)? {
                    return Ok(rt);
                }
                rt = apply(body, rt, opts, budget)?;
            }
        }
    }
}

/// Runs a machine-level program end to end: seeds `(∅, input, [])`,
/// applies each instruction, and returns the accumulated output.
pub fn execute(program: &[Instr], input: &str, opts: &Options) -> Result<String, RuntimeError> {
    let mut budget = Budget::new(opts.max_steps);
    let mut rt = Runtime::new(input);
    for instr in program {
        rt = apply(instr, rt, opts, &mut budget)?;
    }
    Ok(rt.stdout_lossy())
}
