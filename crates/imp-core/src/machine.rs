//! Abstract-machine instruction set and expression language (data only;
//! execution lives in the interpreter crate).
//!
//! The machine is a pure state transformer over the runtime triple with
//! six instructions: `Set`, `Advance`, `Put`, `Block`, `If`, `While`.
//! Conditions and operands are [`Expr`]s -- a small, side-effect-free
//! expression language (literals, store reads, stdin lookahead, length,
//! pure operators) that lets whole programs be written directly against
//! the machine, below the IR layer.
//!
//! `Set`/`Advance`/`Put` are also the only effects the IR interpreter
//! ever performs: it lowers every IR node to zero or more of them.

use serde::{Deserialize, Serialize};

use crate::ops::{BinaryOp, LogicOp, UnaryOp};
use crate::value::Value;

/// A machine-level expression, evaluated against a runtime without
/// modifying it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expr {
    Lit(Value),
    /// Store read by (static) name; unset names read as `Unit`. Unlike
    /// the IR's `Var`, this yields the plain value -- there are no bound
    /// handles at machine level.
    Var(Value),
    /// Stdin lookahead at the offset the child evaluates to.
    Peek(Box<Expr>),
    /// Sequence length.
    Len(Box<Expr>),
    Unary { op: UnaryOp, expr: Box<Expr> },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `&&`/`||`; machine expressions are effect-free, so there is no
    /// observable short-circuit here.
    Logic {
        op: LogicOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Sequence element access.
    Index { base: Box<Expr>, index: Box<Expr> },
}

impl Expr {
    pub fn lit(v: impl Into<Value>) -> Expr {
        Expr::Lit(v.into())
    }

    pub fn var(name: impl Into<Value>) -> Expr {
        Expr::Var(name.into())
    }

    /// Lookahead at offset zero.
    pub fn peek0() -> Expr {
        Expr::Peek(Box::new(Expr::lit(0)))
    }

    pub fn peek(offset: impl Into<Expr>) -> Expr {
        Expr::Peek(Box::new(offset.into()))
    }

    pub fn len(e: impl Into<Expr>) -> Expr {
        Expr::Len(Box::new(e.into()))
    }

    fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn eq_(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Eq, self, rhs.into())
    }

    pub fn ne_(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Ne, self, rhs.into())
    }

    pub fn lt_(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Lt, self, rhs.into())
    }

    pub fn le_(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Le, self, rhs.into())
    }

    pub fn gt_(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Gt, self, rhs.into())
    }

    pub fn ge_(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Ge, self, rhs.into())
    }

    pub fn and_(self, rhs: impl Into<Expr>) -> Expr {
        Expr::Logic {
            op: LogicOp::And,
            lhs: Box::new(self),
            rhs: Box::new(rhs.into()),
        }
    }

    pub fn or_(self, rhs: impl Into<Expr>) -> Expr {
        Expr::Logic {
            op: LogicOp::Or,
            lhs: Box::new(self),
            rhs: Box::new(rhs.into()),
        }
    }

    pub fn at(self, index: impl Into<Expr>) -> Expr {
        Expr::Index {
            base: Box::new(self),
            index: Box::new(index.into()),
        }
    }
}

macro_rules! impl_expr_from {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Expr {
                fn from(v: $ty) -> Self {
                    Expr::Lit(Value::from(v))
                }
            }
        )+
    };
}

impl_expr_from!(i64, i32, char, bool, &str);

impl From<Value> for Expr {
    fn from(v: Value) -> Self {
        Expr::Lit(v)
    }
}

macro_rules! impl_expr_binop {
    ($($trait:ident :: $method:ident => $op:ident),+ $(,)?) => {
        $(
            impl<R: Into<Expr>> std::ops::$trait<R> for Expr {
                type Output = Expr;
                fn $method(self, rhs: R) -> Expr {
                    Expr::binary(BinaryOp::$op, self, rhs.into())
                }
            }
        )+
    };
}

impl_expr_binop!(
    Add::add => Add,
    Sub::sub => Sub,
    Mul::mul => Mul,
    Div::div => Div,
    Rem::rem => Rem,
    BitAnd::bitand => BitAnd,
    BitOr::bitor => BitOr,
    BitXor::bitxor => BitXor,
    Shl::shl => Shl,
    Shr::shr => Shr,
);

/// A machine instruction: one primitive transition of the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instr {
    /// Bind `name` to the value of `value`.
    Set { name: Value, value: Expr },
    /// Drop input bytes (clamped at end of input).
    Advance(Expr),
    /// Append each argument to stdout; sequence arguments append their
    /// elements.
    Put(Vec<Expr>),
    /// Apply instructions in order. The empty block is the identity.
    Block(Vec<Instr>),
    /// Branch on the condition's truthiness.
    If {
        cond: Expr,
        then_branch: Box<Instr>,
        else_branch: Box<Instr>,
    },
    /// `While(c, b)` is `If(c, Block(b, While(c, b)))`, executed
    /// iteratively.
    While { cond: Expr, body: Box<Instr> },
}

impl Instr {
    pub fn set(name: impl Into<Value>, value: impl Into<Expr>) -> Instr {
        Instr::Set {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Advance by one.
    pub fn advance1() -> Instr {
        Instr::Advance(Expr::lit(1))
    }

    pub fn advance(n: impl Into<Expr>) -> Instr {
        Instr::Advance(n.into())
    }

    pub fn put(args: impl IntoIterator<Item = Expr>) -> Instr {
        Instr::Put(args.into_iter().collect())
    }

    pub fn block(instrs: impl IntoIterator<Item = Instr>) -> Instr {
        Instr::Block(instrs.into_iter().collect())
    }

    /// Branch with an empty else.
    pub fn if_(cond: impl Into<Expr>, then_branch: Instr) -> Instr {
        Instr::If {
            cond: cond.into(),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(Instr::Block(Vec::new())),
        }
    }

    pub fn if_else(cond: impl Into<Expr>, then_branch: Instr, else_branch: Instr) -> Instr {
        Instr::If {
            cond: cond.into(),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        }
    }

    pub fn while_(cond: impl Into<Expr>, body: Instr) -> Instr {
        Instr::While {
            cond: cond.into(),
            body: Box::new(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expression_sugar() {
        let e = Expr::peek0().eq_(' ').or_(Expr::peek0().eq_('\n'));
        match e {
            Expr::Logic { op: LogicOp::Or, .. } => {}
            other => panic!("expected Logic, got {:?}", other),
        }

        let e = Expr::var("i") + 1;
        match e {
            Expr::Binary {
                op: BinaryOp::Add, ..
            } => {}
            other => panic!("expected Binary, got {:?}", other),
        }
    }

    #[test]
    fn if_defaults_to_empty_else() {
        let i = Instr::if_(true, Instr::advance1());
        match i {
            Instr::If { else_branch, .. } => assert_eq!(*else_branch, Instr::Block(Vec::new())),
            other => panic!("expected If, got {:?}", other),
        }
    }

    #[test]
    fn serde_roundtrip_instr() {
        let i = Instr::while_(
            Expr::peek0().ne_(Value::Unit),
            Instr::block([
                Instr::put([Expr::peek0()]),
                Instr::advance1(),
            ]),
        );
        let json = serde_json::to_string(&i).unwrap();
        let back: Instr = serde_json::from_str(&json).unwrap();
        assert_eq!(i, back);
    }
}
