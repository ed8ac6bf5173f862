//! Operator vocabulary for the IR and the abstract-machine expression
//! language.
//!
//! Operators are grouped by shape:
//! - [`BinaryOp`]: two plain operands, evaluated by the pure operator
//!   table (arithmetic, comparison, bitwise, shifts).
//! - [`LogicOp`]: `&&` / `||`, the only operators with observable
//!   evaluation order -- the interpreter short-circuits them.
//! - [`UnaryOp`]: one operand; `Deref` and `AddrOf` touch the store and
//!   are resolved by the interpreter, the rest are pure.
//! - [`StepOp`]: the four increment/decrement forms, which both write
//!   the store and choose between old and new value as their result.
//!
//! Every operator exposes its surface symbol for error reporting and for
//! the symbol-keyed construction facility in the builder module. Unary
//! and step symbols use a `#` to mark the operand position (`"-#"` is
//! prefix minus, `"#++"` is postfix increment), which keeps the symbol
//! table unambiguous where one token spells several operators.

use serde::{Deserialize, Serialize};

/// Pure binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
        }
    }

    pub fn from_symbol(sym: &str) -> Option<Self> {
        Some(match sym {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "%" => BinaryOp::Rem,
            "==" => BinaryOp::Eq,
            "!=" => BinaryOp::Ne,
            "<" => BinaryOp::Lt,
            "<=" => BinaryOp::Le,
            ">" => BinaryOp::Gt,
            ">=" => BinaryOp::Ge,
            "&" => BinaryOp::BitAnd,
            "|" => BinaryOp::BitOr,
            "^" => BinaryOp::BitXor,
            "<<" => BinaryOp::Shl,
            ">>" => BinaryOp::Shr,
            _ => return None,
        })
    }

    /// Returns `true` for `== != < <= > >=`.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::Ne
                | BinaryOp::Lt
                | BinaryOp::Le
                | BinaryOp::Gt
                | BinaryOp::Ge
        )
    }

    /// Returns `true` for the operators that admit the compound
    /// assignment form `x ?= e`.
    pub fn is_compoundable(&self) -> bool {
        !self.is_comparison()
    }
}

/// Short-circuit logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicOp {
    And,
    Or,
}

impl LogicOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            LogicOp::And => "&&",
            LogicOp::Or => "||",
        }
    }

    /// The truthiness at which the left operand decides the result
    /// without the right being evaluated: `false` for `&&`, `true` for
    /// `||`.
    pub fn short_circuit_on(&self) -> bool {
        matches!(self, LogicOp::Or)
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Arithmetic negation.
    Neg,
    /// Logical not (boolean or zero-test).
    Not,
    /// Bitwise complement.
    BitNot,
    /// `*e`: unwrap a bound variable, or re-resolve a reference against
    /// the current store. Interpreter-resolved.
    Deref,
    /// `&e`: the reference to a bound variable's name.
    /// Interpreter-resolved.
    AddrOf,
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-#",
            UnaryOp::Not => "!#",
            UnaryOp::BitNot => "~#",
            UnaryOp::Deref => "*#",
            UnaryOp::AddrOf => "&#",
        }
    }

    /// Returns `true` when the operator needs the store (and therefore
    /// cannot be evaluated by the pure table).
    pub fn needs_store(&self) -> bool {
        matches!(self, UnaryOp::Deref | UnaryOp::AddrOf)
    }
}

/// Increment/decrement forms. All four write their target exactly once;
/// prefix forms evaluate to the new value, postfix forms to the old.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepOp {
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

impl StepOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            StepOp::PreInc => "++#",
            StepOp::PreDec => "--#",
            StepOp::PostInc => "#++",
            StepOp::PostDec => "#--",
        }
    }

    /// Returns `true` when the expression's value is the updated value.
    pub fn yields_new(&self) -> bool {
        matches!(self, StepOp::PreInc | StepOp::PreDec)
    }

    /// The underlying arithmetic: `Add` for increments, `Sub` for
    /// decrements.
    pub fn base(&self) -> BinaryOp {
        match self {
            StepOp::PreInc | StepOp::PostInc => BinaryOp::Add,
            StepOp::PreDec | StepOp::PostDec => BinaryOp::Sub,
        }
    }
}
