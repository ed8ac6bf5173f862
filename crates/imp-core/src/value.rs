//! Runtime value representation shared by the abstract machine and the
//! IR interpreter.
//!
//! [`Value`] is a closed tagged union covering scalars, byte strings,
//! heterogeneous tuples, homogeneous vectors, variable handles, lambdas,
//! and the two control tokens (`Break`, `Continue`) that structured
//! control flow threads through block and loop evaluation.
//!
//! Values double as variable *names*: the store maps `Value -> Value`,
//! and array indexing extends a name by tupling it with the index. The
//! [`Marker`] variant provides a reserved name namespace that ordinary
//! program names (integers, strings, tuples of those) can never collide
//! with; the stack-scope counter and the standard library's scratch
//! variables live there.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::ir::Ir;

/// A first-class IMP value.
///
/// Characters are bytes: input is consumed byte-by-byte and `Str` is a
/// byte sequence, so multi-byte text flows through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    /// The unit value. Equal to itself, unequal to everything else.
    Unit,
    Int(i64),
    Char(u8),
    Bool(bool),
    /// Ordered byte sequence (a string of `Char`s).
    Str(Vec<u8>),
    /// Heterogeneous ordered sequence. Also the shape of compound
    /// variable names: `a[i]` is stored under the name `(a, i)`.
    Tuple(Vec<Value>),
    /// Homogeneous ordered sequence with the same API as `Tuple`.
    Vector(Vec<Value>),
    /// A reserved name that user-constructible values cannot equal.
    Marker(Marker),
    /// A variable resolved against the store: carries its name for
    /// assignment and its current value for reads.
    BoundVar { name: Box<Value>, value: Box<Value> },
    /// Address-of a variable; dereferencing re-resolves the name.
    Ref { name: Box<Value> },
    /// A callable program fragment produced by `fn_`.
    Lambda(Rc<LambdaFn>),
    /// Control token: terminate the nearest enclosing loop with the
    /// carried value.
    Break(Box<Value>),
    /// Control token: skip the rest of the current block.
    Continue,
}

/// A lambda value: formal parameter names plus the body IR.
///
/// There is no capture environment -- IMP lambdas have no free-variable
/// closure; everything resolves against the global store, isolated only
/// by the stack-scope counter woven into local names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LambdaFn {
    pub params: Vec<Value>,
    pub body: Ir,
}

/// A reserved variable name, compared by label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Marker(pub String);

impl Marker {
    pub fn new(label: impl Into<String>) -> Self {
        Marker(label.into())
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl Value {
    /// Returns a human-readable description of the value's kind, used in
    /// error reporting.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Unit => "Unit",
            Value::Int(_) => "Int",
            Value::Char(_) => "Char",
            Value::Bool(_) => "Bool",
            Value::Str(_) => "Str",
            Value::Tuple(_) => "Tuple",
            Value::Vector(_) => "Vector",
            Value::Marker(_) => "Marker",
            Value::BoundVar { .. } => "BoundVar",
            Value::Ref { .. } => "Ref",
            Value::Lambda(_) => "Lambda",
            Value::Break(_) => "Break",
            Value::Continue => "Continue",
        }
    }

    /// Strips `BoundVar` wrappers, yielding the value a read observes.
    ///
    /// Assignments store right-hand sides as produced, so a stored value
    /// may itself be a bound handle; every consumer that wants a plain
    /// value resolves through however many layers are present.
    pub fn resolved(&self) -> &Value {
        let mut v = self;
        while let Value::BoundVar { value, .. } = v {
            v = value;
        }
        v
    }

    /// Boolean coercion: `Unit` and `false` are falsy, zero scalars are
    /// falsy, sequences are truthy when non-empty. Returns `None` for
    /// values with no boolean interpretation (refs, lambdas, tokens).
    pub fn truthiness(&self) -> Option<bool> {
        match self.resolved() {
            Value::Unit => Some(false),
            Value::Bool(b) => Some(*b),
            Value::Int(i) => Some(*i != 0),
            Value::Char(c) => Some(*c != 0),
            Value::Str(s) => Some(!s.is_empty()),
            Value::Tuple(t) => Some(!t.is_empty()),
            Value::Vector(v) => Some(!v.is_empty()),
            _ => None,
        }
    }

    /// Returns `true` for the control tokens that block and loop
    /// evaluation inspect.
    pub fn is_token(&self) -> bool {
        matches!(self, Value::Break(_) | Value::Continue)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c as u8)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s.into_bytes())
    }
}

impl From<Marker> for Value {
    fn from(m: Marker) -> Self {
        Value::Marker(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_unwraps_nested_bound_vars() {
        let inner = Value::BoundVar {
            name: Box::new(Value::Int(1)),
            value: Box::new(Value::Int(42)),
        };
        let outer = Value::BoundVar {
            name: Box::new(Value::Int(2)),
            value: Box::new(inner),
        };
        assert_eq!(outer.resolved(), &Value::Int(42));
    }

    #[test]
    fn resolved_is_identity_on_plain_values() {
        let v = Value::Str(b"abc".to_vec());
        assert_eq!(v.resolved(), &v);
    }

    #[test]
    fn truthiness_of_scalars() {
        assert_eq!(Value::Unit.truthiness(), Some(false));
        assert_eq!(Value::Bool(true).truthiness(), Some(true));
        assert_eq!(Value::Bool(false).truthiness(), Some(false));
        assert_eq!(Value::Int(0).truthiness(), Some(false));
        assert_eq!(Value::Int(-3).truthiness(), Some(true));
        assert_eq!(Value::Char(0).truthiness(), Some(false));
        assert_eq!(Value::Char(b'x').truthiness(), Some(true));
    }

    #[test]
    fn truthiness_of_sequences_is_non_emptiness() {
        assert_eq!(Value::Str(vec![]).truthiness(), Some(false));
        assert_eq!(Value::Str(b"a".to_vec()).truthiness(), Some(true));
        assert_eq!(Value::Tuple(vec![]).truthiness(), Some(false));
        assert_eq!(
            Value::Vector(vec![Value::Int(1)]).truthiness(),
            Some(true)
        );
    }

    #[test]
    fn truthiness_sees_through_bound_vars() {
        let bv = Value::BoundVar {
            name: Box::new(Value::from("x")),
            value: Box::new(Value::Int(7)),
        };
        assert_eq!(bv.truthiness(), Some(true));
    }

    #[test]
    fn refs_and_lambdas_have_no_truthiness() {
        let r = Value::Ref {
            name: Box::new(Value::from("x")),
        };
        assert_eq!(r.truthiness(), None);
        assert_eq!(Value::Continue.truthiness(), None);
    }

    #[test]
    fn markers_are_distinct_from_strings() {
        assert_ne!(Value::Marker(Marker::new("scope")), Value::from("scope"));
        assert_eq!(Marker::new("a"), Marker::new("a"));
        assert_ne!(Marker::new("a"), Marker::new("b"));
    }

    #[test]
    fn serde_roundtrip_value() {
        let vals = vec![
            Value::Unit,
            Value::Int(-17),
            Value::Char(b'z'),
            Value::Bool(true),
            Value::Str(b"hi".to_vec()),
            Value::Tuple(vec![Value::Int(1), Value::Char(b'a')]),
            Value::Vector(vec![Value::Int(1), Value::Int(2)]),
            Value::Marker(Marker::new("scratch")),
            Value::Ref {
                name: Box::new(Value::from("x")),
            },
            Value::Break(Box::new(Value::Int(3))),
            Value::Continue,
        ];
        for v in &vals {
            let json = serde_json::to_string(v).unwrap();
            let back: Value = serde_json::from_str(&json).unwrap();
            assert_eq!(v, &back);
        }
    }
}
