//! The structural IR interpreter.
//!
//! `eval` walks an [`Ir`] tree, threading a [`Runtime`] and producing a
//! value for every node. All effects are expressed by lowering to the
//! machine's `Set`/`Advance`/`Put` instructions; control flow is
//! expressed through the `Break`/`Continue` *values*, inspected at
//! exactly two sites (after each block child, after each loop body).
//!
//! Conventions worth knowing when reading the dispatch:
//!
//! - `Var` yields a bound handle `BoundVar { name, value }`, not the
//!   raw value; consumers that want the value resolve through it.
//!   Assignment-shaped nodes take the handle's name instead.
//! - Indexing a bound handle extends its *name* (arrays are compound
//!   names, not cells); indexing a sequence value selects an element.
//! - Lambda application synthesizes a scope-bracketed loop: bump the
//!   stack-scope counter, bind formals as scope-local names, run the
//!   body, park the result, drop the counter, and break out with the
//!   parked value. Argument expressions are evaluated in the caller's
//!   runtime first.

use imp_core::builder::{
    break_with, global_, lambda_return_name, loop_, scope_depth_name, var_,
};
use imp_core::ir::Ir;
use imp_core::machine::{Expr, Instr};
use imp_core::ops::UnaryOp;
use imp_core::runtime::Runtime;
use imp_core::value::{LambdaFn, Value};

use crate::error::RuntimeError;
use crate::machine::{self, Budget};
use crate::options::Options;
use crate::pure;

/// Structural evaluator over IR trees. Holds the options and the step
/// budget; the runtime itself is threaded through [`Interpreter::eval`].
#[derive(Debug)]
pub struct Interpreter<'a> {
    opts: &'a Options,
    budget: Budget,
}

impl<'a> Interpreter<'a> {
    pub fn new(opts: &'a Options) -> Self {
        Interpreter {
            opts,
            budget: Budget::new(opts.max_steps),
        }
    }

    /// Evaluates one node: `(ir, runtime) -> (runtime', value)`.
    pub fn eval(&mut self, ir: &Ir, rt: Runtime) -> Result<(Runtime, Value), RuntimeError> {
        self.budget.tick()?;
        match ir {
            Ir::Literal(v) => Ok((rt, v.clone())),

            Ir::Var(name_expr) => {
                let (rt, name) = self.eval(name_expr, rt)?;
                let value = rt.store.get(&name);
                Ok((
                    rt,
                    Value::BoundVar {
                        name: Box::new(name),
                        value: Box::new(value),
                    },
                ))
            }

            Ir::Ref(name_expr) => {
                let (rt, name) = self.eval(name_expr, rt)?;
                Ok((
                    rt,
                    Value::Ref {
                        name: Box::new(name),
                    },
                ))
            }

            Ir::Assign { target, value } => {
                let (rt, handle) = self.eval(target, rt)?;
                let (name, _) = bound_parts(handle)?;
                let (rt, v) = self.eval(value, rt)?;
                let rt = self.emit(Instr::Set {
                    name,
                    value: Expr::Lit(v.clone()),
                }, rt)?;
                Ok((rt, v))
            }

            Ir::Unary { op, expr } => {
                let (rt, v) = self.eval(expr, rt)?;
                match op {
                    UnaryOp::Deref => match v {
                        Value::BoundVar { value, .. } => Ok((rt, *value)),
                        Value::Ref { name } => {
                            let value = rt.store.get(&name);
                            Ok((
                                rt,
                                Value::BoundVar {
                                    name,
                                    value: Box::new(value),
                                },
                            ))
                        }
                        other => Err(RuntimeError::unsupported(
                            op.symbol(),
                            other.type_name().to_string(),
                        )),
                    },
                    UnaryOp::AddrOf => match v {
                        Value::BoundVar { name, .. } => Ok((rt, Value::Ref { name })),
                        other => Err(RuntimeError::unsupported(
                            op.symbol(),
                            other.type_name().to_string(),
                        )),
                    },
                    _ => Ok((rt, pure::unary(*op, &v, self.opts)?)),
                }
            }

            Ir::Binary { op, lhs, rhs } => {
                let (rt, l) = self.eval(lhs, rt)?;
                let (rt, r) = self.eval(rhs, rt)?;
                Ok((rt, pure::binary(*op, &l, &r, self.opts)?))
            }

            Ir::Logic { op, lhs, rhs } => {
                let (rt, l) = self.eval(lhs, rt)?;
                // Decided left operands never evaluate the right; this
                // is the one operator where evaluation order shows.
                match l.truthiness() {
                    Some(t) if t == op.short_circuit_on() => Ok((rt, Value::Bool(t))),
                    _ => {
                        let (rt, r) = self.eval(rhs, rt)?;
                        Ok((rt, pure::logic(*op, &l, &r)?))
                    }
                }
            }

            Ir::Compound { op, target, value } => {
                if !op.is_compoundable() {
                    return Err(RuntimeError::malformed(format!(
                        "operator '{}' has no compound assignment form",
                        op.symbol()
                    )));
                }
                let (rt, handle) = self.eval(target, rt)?;
                let (name, current) = bound_parts(handle)?;
                let (rt, r) = self.eval(value, rt)?;
                let result = pure::binary(*op, &current, &r, self.opts)?;
                let rt = self.emit(Instr::Set {
                    name,
                    value: Expr::Lit(result.clone()),
                }, rt)?;
                Ok((rt, result))
            }

            Ir::Step { op, target } => {
                let (rt, handle) = self.eval(target, rt)?;
                let (name, current) = bound_parts(handle)?;
                let updated = pure::binary(op.base(), &current, &Value::Int(1), self.opts)?;
                let rt = self.emit(Instr::Set {
                    name,
                    value: Expr::Lit(updated.clone()),
                }, rt)?;
                let result = if op.yields_new() { updated } else { current };
                Ok((rt, result))
            }

            Ir::Index { base, index } => {
                let (rt, b) = self.eval(base, rt)?;
                let (rt, i) = self.eval(index, rt)?;
                match b {
                    // Indexing a variable extends its name.
                    Value::BoundVar { name, .. } => {
                        let extended = Value::Tuple(vec![*name, i]);
                        let value = rt.store.get(&extended);
                        Ok((
                            rt,
                            Value::BoundVar {
                                name: Box::new(extended),
                                value: Box::new(value),
                            },
                        ))
                    }
                    other => Ok((rt, pure::index(&other, &i, self.opts)?)),
                }
            }

            Ir::Call { callee, args } => {
                let (mut rt, f) = self.eval(callee, rt)?;
                let mut vals = Vec::with_capacity(args.len());
                for arg in args {
                    let (next, v) = self.eval(arg, rt)?;
                    rt = next;
                    vals.push(v);
                }
                match f.resolved() {
                    Value::Lambda(lambda) => {
                        let app = lambda_application(lambda, vals)?;
                        self.eval(&app, rt)
                    }
                    seq @ (Value::Str(_) | Value::Tuple(_) | Value::Vector(_)) => {
                        if vals.len() != 2 {
                            return Err(RuntimeError::malformed(format!(
                                "sequence update takes an index and a value, got {} argument(s)",
                                vals.len()
                            )));
                        }
                        let updated = pure::splice(seq, &vals[0], &vals[1], self.opts)?;
                        Ok((rt, updated))
                    }
                    other => Err(RuntimeError::malformed(format!(
                        "cannot apply a {}",
                        other.type_name()
                    ))),
                }
            }

            Ir::Cast { to, expr } => {
                let (rt, v) = self.eval(expr, rt)?;
                Ok((rt, pure::cast(*to, &v, self.opts)?))
            }

            Ir::Peek(offset) => {
                let (rt, off) = self.eval(offset, rt)?;
                let v = machine::peek_at(&rt, &off, self.opts)?;
                Ok((rt, v))
            }

            Ir::Advance(amount) => {
                let (rt, n) = self.eval(amount, rt)?;
                let rt = self.emit(Instr::Advance(Expr::Lit(n)), rt)?;
                Ok((rt, Value::Unit))
            }

            Ir::GetC => {
                let c = rt.peek(0);
                let rt = self.emit(Instr::advance1(), rt)?;
                Ok((rt, c))
            }

            Ir::PutC(e) => {
                let (rt, v) = self.eval(e, rt)?;
                let rt = self.emit(Instr::Put(vec![Expr::Lit(v.clone())]), rt)?;
                Ok((rt, v))
            }

            Ir::Seq(children) => self.eval_seq(children, rt),

            Ir::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let (rt, c) = self.eval(cond, rt)?;
                if machine::condition(&c)? {
                    self.eval(then_branch, rt)
                } else {
                    self.eval(else_branch, rt)
                }
            }

            Ir::Loop(body) => {
                let mut rt = rt;
                loop {
                    let (next, v) = self.eval(body, rt)?;
                    rt = next;
                    if let Value::Break(payload) = v {
                        return Ok((rt, *payload));
                    }
                    // Continue and ordinary values both re-enter the body.
                }
            }

            Ir::Break(payload) => match payload {
                Some(e) => {
                    let (rt, v) = self.eval(e, rt)?;
                    Ok((rt, Value::Break(Box::new(v))))
                }
                None => Ok((rt, Value::Break(Box::new(Value::Unit)))),
            },

            Ir::Continue => Ok((rt, Value::Continue)),
        }
    }

    /// Block policy: children left to right; the first control token
    /// stops the block and becomes its value; otherwise `Unit`.
    fn eval_seq(&mut self, children: &[Ir], mut rt: Runtime) -> Result<(Runtime, Value), RuntimeError> {
        for child in children {
            let (next, v) = self.eval(child, rt)?;
            rt = next;
            if v.is_token() {
                return Ok((rt, v));
            }
        }
        Ok((rt, Value::Unit))
    }

    /// Routes an effect through the abstract machine.
    fn emit(&mut self, instr: Instr, rt: Runtime) -> Result<Runtime, RuntimeError> {
        machine::apply(&instr, rt, self.opts, &mut self.budget)
    }
}

fn bound_parts(v: Value) -> Result<(Value, Value), RuntimeError> {
    match v {
        Value::BoundVar { name, value } => Ok((*name, *value)),
        other => Err(RuntimeError::malformed(format!(
            "assignment target must be a variable, got {}",
            other.type_name()
        ))),
    }
}

/// The application lowering: a fresh loop that opens a scope, binds the
/// formals to the already-evaluated arguments, runs the body, and
/// breaks out with the parked return value.
fn lambda_application(f: &LambdaFn, args: Vec<Value>) -> Result<Ir, RuntimeError> {
    if f.params.len() != args.len() {
        return Err(RuntimeError::malformed(format!(
            "lambda takes {} argument(s), got {}",
            f.params.len(),
            args.len()
        )));
    }
    let mut code = vec![global_(scope_depth_name()).pre_inc()];
    for (param, arg) in f.params.iter().zip(args) {
        code.push(var_(param.clone()).assign(Ir::Literal(arg)));
    }
    code.push(global_(lambda_return_name()).assign(f.body.clone()));
    code.push(global_(scope_depth_name()).pre_dec());
    code.push(break_with(global_(lambda_return_name()).deref_()));
    Ok(loop_(code))
}
