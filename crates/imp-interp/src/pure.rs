//! The pure operator table: host-side evaluation of operator symbols on
//! concrete values.
//!
//! Everything here is a function of its operands (plus the numeric
//! options) -- no store, no I/O. Bound-variable handles are transparent:
//! operands resolve to their underlying value before dispatch.
//!
//! The one deliberate asymmetry: `==`/`!=` are total. Scalars compare
//! numerically under promotion, `Unit` equals only itself, and *any*
//! other combination -- sequences included -- compares unequal rather
//! than failing. Ordering comparisons and arithmetic outside their
//! domain are programmer errors (`UnsupportedOperator`).

use imp_core::ir::CastTo;
use imp_core::ops::{BinaryOp, LogicOp, UnaryOp};
use imp_core::value::Value;

use crate::error::RuntimeError;
use crate::options::Options;

/// Sign-truncates to the configured integer width.
fn wrap(opts: &Options, v: i64) -> i64 {
    let bits = opts.int_width.bits();
    if bits == 64 {
        v
    } else {
        (v << (64 - bits)) >> (64 - bits)
    }
}

/// Numeric promotion: `Int` as-is, `Char` extended per `signed_char`,
/// `Bool` as 0/1. `None` for everything else.
fn scalar(opts: &Options, v: &Value) -> Option<i64> {
    match v.resolved() {
        Value::Int(i) => Some(*i),
        Value::Char(c) => Some(if opts.signed_char {
            i64::from(*c as i8)
        } else {
            i64::from(*c)
        }),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn operands(lhs: &Value, rhs: &Value) -> String {
    format!(
        "{} and {}",
        lhs.resolved().type_name(),
        rhs.resolved().type_name()
    )
}

/// Total equality: scalar promotion, `Unit` reflexivity, `false` for
/// every mismatched or non-scalar pair.
pub fn values_equal(opts: &Options, lhs: &Value, rhs: &Value) -> bool {
    let (l, r) = (lhs.resolved(), rhs.resolved());
    match (l, r) {
        (Value::Unit, Value::Unit) => true,
        (Value::Unit, _) | (_, Value::Unit) => false,
        _ => match (scalar(opts, l), scalar(opts, r)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

/// Evaluates a pure binary operator.
pub fn binary(
    op: BinaryOp,
    lhs: &Value,
    rhs: &Value,
    opts: &Options,
) -> Result<Value, RuntimeError> {
    let (l, r) = (lhs.resolved(), rhs.resolved());

    match op {
        BinaryOp::Eq => return Ok(Value::Bool(values_equal(opts, l, r))),
        BinaryOp::Ne => return Ok(Value::Bool(!values_equal(opts, l, r))),
        _ => {}
    }

    if op.is_comparison() {
        // Lt/Le/Gt/Ge: promoted scalars only.
        let (a, b) = match (scalar(opts, l), scalar(opts, r)) {
            (Some(a), Some(b)) => (a, b),
            _ => return Err(RuntimeError::unsupported(op.symbol(), operands(l, r))),
        };
        let res = match op {
            BinaryOp::Lt => a < b,
            BinaryOp::Le => a <= b,
            BinaryOp::Gt => a > b,
            BinaryOp::Ge => a >= b,
            _ => {
                return Err(RuntimeError::InternalInvariant {
                    reason: format!("'{}' dispatched as a comparison", op.symbol()),
                })
            }
        };
        return Ok(Value::Bool(res));
    }

    if op == BinaryOp::Add {
        // Sequence join comes before numeric addition; mixed forms
        // (string plus trailing char) append.
        match (l, r) {
            (Value::Str(a), Value::Str(b)) => {
                let mut out = a.clone();
                out.extend_from_slice(b);
                return Ok(Value::Str(out));
            }
            (Value::Str(a), Value::Char(c)) => {
                let mut out = a.clone();
                out.push(*c);
                return Ok(Value::Str(out));
            }
            (Value::Tuple(a), Value::Tuple(b)) | (Value::Tuple(a), Value::Vector(b)) => {
                let mut out = a.clone();
                out.extend(b.iter().cloned());
                return Ok(Value::Tuple(out));
            }
            (Value::Vector(a), Value::Vector(b)) => {
                let mut out = a.clone();
                out.extend(b.iter().cloned());
                return Ok(Value::Vector(out));
            }
            _ => {}
        }
    }

    let (a, b) = match (scalar(opts, l), scalar(opts, r)) {
        (Some(a), Some(b)) => (a, b),
        _ => return Err(RuntimeError::unsupported(op.symbol(), operands(l, r))),
    };

    let res = match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::Mul => a.wrapping_mul(b),
        BinaryOp::Div => {
            if b == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            a.wrapping_div(b)
        }
        BinaryOp::Rem => {
            if b == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            a.wrapping_rem(b)
        }
        BinaryOp::BitAnd => a & b,
        BinaryOp::BitOr => a | b,
        BinaryOp::BitXor => a ^ b,
        BinaryOp::Shl => {
            let amt = (b as u64 % u64::from(opts.int_width.bits())) as u32;
            a.wrapping_shl(amt)
        }
        BinaryOp::Shr => {
            // Arithmetic shift: Int is signed.
            let amt = (b as u64 % u64::from(opts.int_width.bits())) as u32;
            a.wrapping_shr(amt)
        }
        _ => {
            return Err(RuntimeError::InternalInvariant {
                reason: format!("'{}' reached numeric dispatch", op.symbol()),
            })
        }
    };
    Ok(Value::Int(wrap(opts, res)))
}

/// Evaluates a pure unary operator. `Deref`/`AddrOf` need the store and
/// are rejected here.
pub fn unary(op: UnaryOp, v: &Value, opts: &Options) -> Result<Value, RuntimeError> {
    let r = v.resolved();
    let err = || RuntimeError::unsupported(op.symbol(), r.type_name().to_string());
    match op {
        UnaryOp::Neg => {
            let a = scalar(opts, r).ok_or_else(err)?;
            Ok(Value::Int(wrap(opts, a.wrapping_neg())))
        }
        UnaryOp::Not => {
            let a = scalar(opts, r).ok_or_else(err)?;
            Ok(Value::Bool(a == 0))
        }
        UnaryOp::BitNot => {
            let a = scalar(opts, r).ok_or_else(err)?;
            Ok(Value::Int(wrap(opts, !a)))
        }
        UnaryOp::Deref | UnaryOp::AddrOf => Err(err()),
    }
}

/// `&&`/`||` on already-evaluated operands. Both sides must have a
/// boolean interpretation.
pub fn logic(op: LogicOp, lhs: &Value, rhs: &Value) -> Result<Value, RuntimeError> {
    let err = || RuntimeError::unsupported(op.symbol(), operands(lhs, rhs));
    let a = lhs.truthiness().ok_or_else(|| err())?;
    let b = rhs.truthiness().ok_or_else(|| err())?;
    Ok(Value::Bool(match op {
        LogicOp::And => a && b,
        LogicOp::Or => a || b,
    }))
}

/// Sequence element access: `Unit` out of range (negative included).
pub fn index(base: &Value, idx: &Value, opts: &Options) -> Result<Value, RuntimeError> {
    let b = base.resolved();
    let err = || RuntimeError::unsupported("[]", operands(b, idx));
    let i = scalar(opts, idx).ok_or_else(|| err())?;
    let at = usize::try_from(i).ok();
    match b {
        Value::Str(s) => Ok(at
            .and_then(|i| s.get(i))
            .map(|c| Value::Char(*c))
            .unwrap_or(Value::Unit)),
        Value::Tuple(xs) | Value::Vector(xs) => Ok(at
            .and_then(|i| xs.get(i))
            .cloned()
            .unwrap_or(Value::Unit)),
        _ => Err(err()),
    }
}

/// Functional index-update `v(i, x)`: a new sequence with position `i`
/// replaced. At or past the end the element is appended.
pub fn splice(
    base: &Value,
    idx: &Value,
    item: &Value,
    opts: &Options,
) -> Result<Value, RuntimeError> {
    let b = base.resolved();
    let err = || RuntimeError::unsupported("()", operands(b, idx));
    let i = scalar(opts, idx)
        .and_then(|i| usize::try_from(i).ok())
        .ok_or_else(|| err())?;
    match b {
        Value::Str(s) => {
            let c = match item.resolved() {
                Value::Char(c) => *c,
                Value::Int(n) => *n as u8,
                _ => return Err(err()),
            };
            let mut out = s.clone();
            if i < out.len() {
                out[i] = c;
            } else {
                out.push(c);
            }
            Ok(Value::Str(out))
        }
        Value::Tuple(xs) | Value::Vector(xs) => {
            let mut out = xs.clone();
            if i < out.len() {
                out[i] = item.resolved().clone();
            } else {
                out.push(item.resolved().clone());
            }
            Ok(match b {
                Value::Tuple(_) => Value::Tuple(out),
                _ => Value::Vector(out),
            })
        }
        _ => Err(err()),
    }
}

/// Sequence length.
pub fn len(v: &Value) -> Result<Value, RuntimeError> {
    match v.resolved() {
        Value::Str(s) => Ok(Value::Int(s.len() as i64)),
        Value::Tuple(xs) | Value::Vector(xs) => Ok(Value::Int(xs.len() as i64)),
        other => Err(RuntimeError::unsupported(
            "len",
            other.type_name().to_string(),
        )),
    }
}

/// Host-type conversion on scalars.
pub fn cast(to: CastTo, v: &Value, opts: &Options) -> Result<Value, RuntimeError> {
    let r = v.resolved();
    let a = scalar(opts, r).ok_or_else(|| {
        RuntimeError::malformed(format!("cannot cast {} to {:?}", r.type_name(), to))
    })?;
    Ok(match to {
        CastTo::Int => Value::Int(wrap(opts, a)),
        CastTo::Char => Value::Char(a as u8),
        CastTo::Bool => Value::Bool(a != 0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::IntWidth;

    fn bv(name: Value, value: Value) -> Value {
        Value::BoundVar {
            name: Box::new(name),
            value: Box::new(value),
        }
    }

    #[test]
    fn arithmetic_on_ints() {
        let o = Options::default();
        assert_eq!(
            binary(BinaryOp::Add, &Value::Int(2), &Value::Int(3), &o).unwrap(),
            Value::Int(5)
        );
        assert_eq!(
            binary(BinaryOp::Div, &Value::Int(-7), &Value::Int(2), &o).unwrap(),
            Value::Int(-3)
        );
        assert_eq!(
            binary(BinaryOp::Rem, &Value::Int(9), &Value::Int(4), &o).unwrap(),
            Value::Int(1)
        );
    }

    #[test]
    fn char_arithmetic_promotes_to_int() {
        let o = Options::default();
        assert_eq!(
            binary(BinaryOp::Sub, &Value::Char(b'7'), &Value::Char(b'0'), &o).unwrap(),
            Value::Int(7)
        );
        assert_eq!(
            binary(BinaryOp::Add, &Value::Char(1), &Value::Char(b'0'), &o).unwrap(),
            Value::Int(49)
        );
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let o = Options::default();
        assert_eq!(
            binary(BinaryOp::Div, &Value::Int(1), &Value::Int(0), &o),
            Err(RuntimeError::DivisionByZero)
        );
        assert_eq!(
            binary(BinaryOp::Rem, &Value::Int(1), &Value::Int(0), &o),
            Err(RuntimeError::DivisionByZero)
        );
    }

    #[test]
    fn arithmetic_wraps_at_the_configured_width() {
        let o = Options {
            int_width: IntWidth::W8,
            ..Options::default()
        };
        assert_eq!(
            binary(BinaryOp::Add, &Value::Int(127), &Value::Int(1), &o).unwrap(),
            Value::Int(-128)
        );
        assert_eq!(
            binary(BinaryOp::Mul, &Value::Int(64), &Value::Int(4), &o).unwrap(),
            Value::Int(0)
        );

        let o64 = Options::default();
        assert_eq!(
            binary(BinaryOp::Add, &Value::Int(i64::MAX), &Value::Int(1), &o64).unwrap(),
            Value::Int(i64::MIN)
        );
    }

    #[test]
    fn unit_equality() {
        let o = Options::default();
        assert_eq!(
            binary(BinaryOp::Eq, &Value::Unit, &Value::Unit, &o).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            binary(BinaryOp::Eq, &Value::Unit, &Value::Int(0), &o).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            binary(BinaryOp::Ne, &Value::Int(0), &Value::Unit, &o).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn mismatched_equality_degenerates_instead_of_failing() {
        let o = Options::default();
        // Sequences have no equality entry; they compare unequal.
        let s = Value::Str(b"ab".to_vec());
        assert_eq!(
            binary(BinaryOp::Eq, &s, &s, &o).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            binary(BinaryOp::Ne, &s, &Value::Int(1), &o).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn scalar_equality_promotes() {
        let o = Options::default();
        assert_eq!(
            binary(BinaryOp::Eq, &Value::Char(b'a'), &Value::Int(97), &o).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            binary(BinaryOp::Eq, &Value::Bool(true), &Value::Int(1), &o).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn ordering_outside_scalars_is_unsupported() {
        let o = Options::default();
        assert!(matches!(
            binary(BinaryOp::Lt, &Value::Unit, &Value::Int(1), &o),
            Err(RuntimeError::UnsupportedOperator { .. })
        ));
    }

    #[test]
    fn signed_char_controls_promotion() {
        let unsigned = Options::default();
        let signed = Options {
            signed_char: true,
            ..Options::default()
        };
        assert_eq!(
            binary(BinaryOp::Lt, &Value::Char(0xFF), &Value::Int(0), &unsigned).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            binary(BinaryOp::Lt, &Value::Char(0xFF), &Value::Int(0), &signed).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn operands_resolve_through_bound_vars() {
        let o = Options::default();
        let x = bv(Value::from("x"), Value::Int(4));
        let y = bv(Value::from("y"), bv(Value::from("z"), Value::Int(2)));
        assert_eq!(
            binary(BinaryOp::Mul, &x, &y, &o).unwrap(),
            Value::Int(8)
        );
    }

    #[test]
    fn string_concat_and_append() {
        let o = Options::default();
        let hello = Value::Str(b"hel".to_vec());
        assert_eq!(
            binary(BinaryOp::Add, &hello, &Value::Str(b"lo".to_vec()), &o).unwrap(),
            Value::Str(b"hello".to_vec())
        );
        assert_eq!(
            binary(BinaryOp::Add, &hello, &Value::Char(b'p'), &o).unwrap(),
            Value::Str(b"help".to_vec())
        );
    }

    #[test]
    fn shifts_mask_their_amount() {
        let o = Options::default();
        assert_eq!(
            binary(BinaryOp::Shl, &Value::Int(1), &Value::Int(3), &o).unwrap(),
            Value::Int(8)
        );
        assert_eq!(
            binary(BinaryOp::Shl, &Value::Int(1), &Value::Int(64), &o).unwrap(),
            Value::Int(1)
        );
        assert_eq!(
            binary(BinaryOp::Shr, &Value::Int(-8), &Value::Int(1), &o).unwrap(),
            Value::Int(-4)
        );
    }

    #[test]
    fn unary_ops() {
        let o = Options::default();
        assert_eq!(unary(UnaryOp::Neg, &Value::Int(5), &o).unwrap(), Value::Int(-5));
        assert_eq!(
            unary(UnaryOp::Not, &Value::Int(0), &o).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            unary(UnaryOp::Not, &Value::Bool(true), &o).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            unary(UnaryOp::BitNot, &Value::Int(0), &o).unwrap(),
            Value::Int(-1)
        );
        assert!(unary(UnaryOp::Neg, &Value::Unit, &o).is_err());
    }

    #[test]
    fn indexing_is_total_over_offsets() {
        let o = Options::default();
        let s = Value::Str(b"ab".to_vec());
        assert_eq!(index(&s, &Value::Int(1), &o).unwrap(), Value::Char(b'b'));
        assert_eq!(index(&s, &Value::Int(2), &o).unwrap(), Value::Unit);
        assert_eq!(index(&s, &Value::Int(-1), &o).unwrap(), Value::Unit);

        let t = Value::Tuple(vec![Value::Int(1), Value::Bool(false)]);
        assert_eq!(index(&t, &Value::Int(1), &o).unwrap(), Value::Bool(false));
        assert!(index(&Value::Int(3), &Value::Int(0), &o).is_err());
    }

    #[test]
    fn splice_replaces_or_appends() {
        let o = Options::default();
        let v = Value::Vector(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(
            splice(&v, &Value::Int(0), &Value::Int(9), &o).unwrap(),
            Value::Vector(vec![Value::Int(9), Value::Int(2)])
        );
        assert_eq!(
            splice(&v, &Value::Int(5), &Value::Int(9), &o).unwrap(),
            Value::Vector(vec![Value::Int(1), Value::Int(2), Value::Int(9)])
        );
    }

    #[test]
    fn casts() {
        let o = Options::default();
        assert_eq!(
            cast(CastTo::Char, &Value::Int(0x141), &o).unwrap(),
            Value::Char(0x41)
        );
        assert_eq!(
            cast(CastTo::Int, &Value::Char(b'a'), &o).unwrap(),
            Value::Int(97)
        );
        assert_eq!(
            cast(CastTo::Bool, &Value::Int(0), &o).unwrap(),
            Value::Bool(false)
        );
        assert!(cast(CastTo::Int, &Value::Str(vec![]), &o).is_err());
    }

    #[test]
    fn len_of_sequences() {
        assert_eq!(len(&Value::Str(b"abc".to_vec())).unwrap(), Value::Int(3));
        assert_eq!(len(&Value::Tuple(vec![])).unwrap(), Value::Int(0));
        assert!(len(&Value::Int(1)).is_err());
    }
}
