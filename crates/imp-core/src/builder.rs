//! Construction API for IR trees.
//!
//! One constructor per node kind, plus the structured-control-flow
//! lowerings that define the surface language:
//!
//! - `block_(code)` is `loop_(code, break_())`, so an embedded `break_`
//!   escapes the nearest enclosing block.
//! - `while_(cond, body)` is `loop_(if_(cond, body).else_([break_()]))`.
//! - `for_(init, cond, post, body)` runs `init` once, then returns the
//!   inner while's value through an outer single-shot loop.
//! - `switch_` stores its scrutinee once and lowers the arms to an
//!   if/else chain; a `default_` arm always becomes the terminal else,
//!   wherever it appears among the cases, while cases keep their order.
//! - `fn_(params, code)` builds a lambda value whose body is
//!   `loop_(code, break_())`, so `break_with(v)` returns `v` from the
//!   lambda.
//!
//! Local variables: `var_(n)` addresses `n` under the current stack
//! scope (the composite name `(n, scope)`), `global_(n)` addresses `n`
//! directly. The scope counter itself is an ordinary variable under a
//! reserved [`Marker`] name.

use std::rc::Rc;

use crate::error::CoreError;
use crate::ir::{CastTo, Ir};
use crate::ops::{BinaryOp, LogicOp, StepOp, UnaryOp};
use crate::value::{LambdaFn, Marker, Value};

/// The reserved name of the stack-scope counter every `var_` access is
/// keyed by.
pub fn scope_depth_name() -> Value {
    Value::Marker(Marker::new("stack-scope"))
}

/// The reserved name the lambda-application lowering parks its return
/// value under.
pub fn lambda_return_name() -> Value {
    Value::Marker(Marker::new("lambda-return"))
}

/// The reserved name `switch_` stores its scrutinee under.
pub fn switch_scrutinee_name() -> Value {
    Value::Marker(Marker::new("switch-scrutinee"))
}

/// A literal value.
pub fn lit(v: impl Into<Value>) -> Ir {
    Ir::Literal(v.into())
}

/// The unit literal.
pub fn none() -> Ir {
    Ir::Literal(Value::Unit)
}

/// A string literal (byte sequence).
pub fn str_(s: &str) -> Ir {
    Ir::Literal(Value::from(s))
}

/// Access the variable named `name` as-is, ignoring the stack scope.
pub fn global_(name: impl Into<Value>) -> Ir {
    Ir::Var(Box::new(Ir::Literal(name.into())))
}

/// Access the stack-local variable `name`: its store name is `name`
/// tupled with the current scope depth.
pub fn var_(name: impl Into<Value>) -> Ir {
    global_(name).at(global_(scope_depth_name()).deref_())
}

/// Address-of by name expression.
pub fn ref_(name: impl Into<Ir>) -> Ir {
    Ir::Ref(Box::new(name.into()))
}

/// Stdin lookahead at offset zero.
pub fn peek_() -> Ir {
    Ir::Peek(Box::new(lit(0)))
}

/// Stdin lookahead at the given offset.
pub fn peek_at(offset: impl Into<Ir>) -> Ir {
    Ir::Peek(Box::new(offset.into()))
}

/// Consume one input byte.
pub fn advance_() -> Ir {
    Ir::Advance(Box::new(lit(1)))
}

/// Consume `n` input bytes.
pub fn advance_by(n: impl Into<Ir>) -> Ir {
    Ir::Advance(Box::new(n.into()))
}

/// Read one byte: evaluates to it (or `Unit` at end of input) and
/// consumes it.
pub fn getc_() -> Ir {
    Ir::GetC
}

/// Append one value to stdout.
pub fn putc_(e: impl Into<Ir>) -> Ir {
    Ir::PutC(Box::new(e.into()))
}

/// Host-type conversion.
pub fn cast_(to: CastTo, e: impl Into<Ir>) -> Ir {
    Ir::Cast {
        to,
        expr: Box::new(e.into()),
    }
}

/// Conditional with an empty else branch; attach one with
/// [`Ir::else_`].
pub fn if_(cond: Ir, then_branch: impl IntoIterator<Item = Ir>) -> Ir {
    Ir::If {
        cond: Box::new(cond),
        then_branch: Box::new(Ir::Seq(then_branch.into_iter().collect())),
        else_branch: Box::new(Ir::Seq(Vec::new())),
    }
}

/// Bare loop; terminates only via `break_`.
pub fn loop_(body: impl IntoIterator<Item = Ir>) -> Ir {
    Ir::Loop(Box::new(Ir::Seq(body.into_iter().collect())))
}

/// A block whose embedded `break_` escapes to just past the block.
pub fn block_(body: impl IntoIterator<Item = Ir>) -> Ir {
    let mut code: Vec<Ir> = body.into_iter().collect();
    code.push(break_());
    Ir::Loop(Box::new(Ir::Seq(code)))
}

/// Standard while loop.
pub fn while_(cond: Ir, body: impl IntoIterator<Item = Ir>) -> Ir {
    loop_([if_(cond, body).else_([break_()])])
}

/// C-style for loop: `init` once, then `body` and `post` while `cond`
/// holds.
pub fn for_(init: Ir, cond: Ir, post: Ir, body: impl IntoIterator<Item = Ir>) -> Ir {
    let mut code: Vec<Ir> = body.into_iter().collect();
    code.push(post);
    loop_([init, break_with(while_(cond, code))])
}

/// Break out of the nearest enclosing loop with `Unit`.
pub fn break_() -> Ir {
    Ir::Break(None)
}

/// Break out of the nearest enclosing loop with a value.
pub fn break_with(payload: impl Into<Ir>) -> Ir {
    Ir::Break(Some(Box::new(payload.into())))
}

/// Skip the rest of the current block.
pub fn continue_() -> Ir {
    Ir::Continue
}

/// A lambda value. The body is wrapped so a bare `break_` (or
/// `break_with`) returns from the lambda.
pub fn fn_<P: Into<Value>>(
    params: impl IntoIterator<Item = P>,
    body: impl IntoIterator<Item = Ir>,
) -> Ir {
    let mut code: Vec<Ir> = body.into_iter().collect();
    code.push(break_());
    Ir::Literal(Value::Lambda(Rc::new(LambdaFn {
        params: params.into_iter().map(Into::into).collect(),
        body: Ir::Loop(Box::new(Ir::Seq(code))),
    })))
}

/// Apply a callee to arguments: a call on lambda values, the functional
/// update `v(i, x)` on sequence values.
pub fn call(callee: Ir, args: impl IntoIterator<Item = Ir>) -> Ir {
    Ir::Call {
        callee: Box::new(callee),
        args: args.into_iter().collect(),
    }
}

/// One arm of a `switch_`.
#[derive(Debug, Clone)]
pub enum Arm {
    Case { test: Ir, body: Ir },
    Default { body: Ir },
}

/// A case arm: taken when the scrutinee equals `test`.
pub fn case_(test: impl Into<Ir>, body: impl IntoIterator<Item = Ir>) -> Arm {
    Arm::Case {
        test: test.into(),
        body: Ir::Seq(body.into_iter().collect()),
    }
}

/// The default arm. May appear anywhere among the cases; it always
/// lowers to the terminal else.
pub fn default_(body: impl IntoIterator<Item = Ir>) -> Arm {
    Arm::Default {
        body: Ir::Seq(body.into_iter().collect()),
    }
}

/// Switch: evaluates the scrutinee once, then compares against each
/// case in source order. With no matching case and no default the
/// switch evaluates to `Unit`. A `break_` inside an arm exits the
/// switch.
pub fn switch_(scrutinee: Ir, arms: impl IntoIterator<Item = Arm>) -> Ir {
    let slot = global_(switch_scrutinee_name());
    let chain = lower_arms(
        &slot.clone().deref_(),
        arms.into_iter().collect::<Vec<_>>(),
    );
    block_([slot.assign(scrutinee), chain])
}

fn lower_arms(scrutinee: &Ir, mut arms: Vec<Arm>) -> Ir {
    if arms.is_empty() {
        return block_([]);
    }
    // A default arm migrates to the end of the worklist so it lowers to
    // the terminal else; cases keep their order.
    if arms.iter().any(|a| matches!(a, Arm::Case { .. })) {
        if let Arm::Default { .. } = arms[0] {
            let d = arms.remove(0);
            arms.push(d);
            return lower_arms(scrutinee, arms);
        }
    }
    match arms.remove(0) {
        Arm::Default { body } => body,
        Arm::Case { test, body } => {
            let rest = lower_arms(scrutinee, arms);
            if_(scrutinee.clone().eq_(test), [body]).else_([rest])
        }
    }
}

/// Builds an operator node from its surface symbol, the documented
/// escape hatch behind the typed constructors. Binary symbols are bare
/// (`"+"`, `"<<"`, `"&&"`, `"+="`); unary and step symbols mark the
/// operand position with `#` (`"-#"`, `"#++"`), though the bare
/// one-argument forms of `- ! ~ * &` are accepted too.
pub fn op(symbol: &str, args: impl IntoIterator<Item = Ir>) -> Result<Ir, CoreError> {
    let mut args: Vec<Ir> = args.into_iter().collect();
    let arity = args.len();
    let arity_err = || CoreError::OperatorArity {
        symbol: symbol.to_string(),
        arity,
    };

    // Unary forms, canonical and bare.
    let unary = match symbol {
        "-#" => Some(UnaryOp::Neg),
        "!#" | "!" => Some(UnaryOp::Not),
        "~#" | "~" => Some(UnaryOp::BitNot),
        "*#" => Some(UnaryOp::Deref),
        "&#" => Some(UnaryOp::AddrOf),
        "-" | "*" | "&" if arity == 1 => Some(match symbol {
            "-" => UnaryOp::Neg,
            "*" => UnaryOp::Deref,
            _ => UnaryOp::AddrOf,
        }),
        _ => None,
    };
    if let Some(u) = unary {
        if arity != 1 {
            return Err(arity_err());
        }
        return Ok(Ir::Unary {
            op: u,
            expr: Box::new(args.remove(0)),
        });
    }

    let step = match symbol {
        "++#" => Some(StepOp::PreInc),
        "--#" => Some(StepOp::PreDec),
        "#++" => Some(StepOp::PostInc),
        "#--" => Some(StepOp::PostDec),
        _ => None,
    };
    if let Some(s) = step {
        if arity != 1 {
            return Err(arity_err());
        }
        return Ok(Ir::Step {
            op: s,
            target: Box::new(args.remove(0)),
        });
    }

    match symbol {
        "&&" | "||" => {
            if arity != 2 {
                return Err(arity_err());
            }
            let rhs = args.remove(1);
            let lhs = args.remove(0);
            let op = if symbol == "&&" {
                LogicOp::And
            } else {
                LogicOp::Or
            };
            Ok(Ir::Logic {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            })
        }
        "=" => {
            if arity != 2 {
                return Err(arity_err());
            }
            let rhs = args.remove(1);
            Ok(args.remove(0).assign(rhs))
        }
        "[]" => {
            if arity != 2 {
                return Err(arity_err());
            }
            let index = args.remove(1);
            Ok(args.remove(0).at(index))
        }
        "()" => {
            if arity == 0 {
                return Err(arity_err());
            }
            let callee = args.remove(0);
            Ok(call(callee, args))
        }
        _ => {
            if let Some(base) = symbol
                .strip_suffix('=')
                .and_then(BinaryOp::from_symbol)
                .filter(|b| b.is_compoundable())
            {
                if arity != 2 {
                    return Err(arity_err());
                }
                let rhs = args.remove(1);
                let lhs = args.remove(0);
                return Ok(Ir::Compound {
                    op: base,
                    target: Box::new(lhs),
                    value: Box::new(rhs),
                });
            }
            if let Some(b) = BinaryOp::from_symbol(symbol) {
                if arity != 2 {
                    return Err(arity_err());
                }
                let rhs = args.remove(1);
                let lhs = args.remove(0);
                return Ok(Ir::Binary {
                    op: b,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                });
            }
            Err(CoreError::UnknownOperator {
                symbol: symbol.to_string(),
            })
        }
    }
}
