//! Per-opcode value semantics.
//!
//! Every operator is an explicit table of type pairs: there is no
//! polymorphic fallback. Booleans participate in arithmetic as 0/1, and the
//! numeric tower widens int → float → complex.

use num_integer::Integer;

use vism_asm::{Complex, Value};

use crate::error::{RuntimeError, RuntimeResult};

#[derive(Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
    Complex(Complex),
}

fn numeric(value: &Value) -> Option<Num> {
    match value {
        Value::Int(v) => Some(Num::Int(*v)),
        Value::Bool(v) => Some(Num::Int(i64::from(*v))),
        Value::Float(v) => Some(Num::Float(*v)),
        Value::Complex(v) => Some(Num::Complex(*v)),
        _ => None,
    }
}

fn as_f64(n: Num) -> f64 {
    match n {
        Num::Int(v) => v as f64,
        Num::Float(v) => v,
        Num::Complex(c) => c.re,
    }
}

fn as_complex(n: Num) -> Complex {
    match n {
        Num::Int(v) => Complex::new(v as f64, 0.0),
        Num::Float(v) => Complex::new(v, 0.0),
        Num::Complex(c) => c,
    }
}

fn numeric_binary(
    lhs: Num,
    rhs: Num,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
    complex_op: fn(Complex, Complex) -> Complex,
) -> RuntimeResult<Value> {
    match (lhs, rhs) {
        (Num::Complex(_), _) | (_, Num::Complex(_)) => Ok(Value::Complex(complex_op(
            as_complex(lhs),
            as_complex(rhs),
        ))),
        (Num::Int(a), Num::Int(b)) => int_op(a, b)
            .map(Value::Int)
            .ok_or(RuntimeError::ArithmeticOverflow),
        (a, b) => Ok(Value::Float(float_op(as_f64(a), as_f64(b)))),
    }
}

fn unsupported(op: &'static str, lhs: &Value, rhs: &Value) -> RuntimeError {
    RuntimeError::UnsupportedOperands {
        op,
        lhs: lhs.value_type(),
        rhs: rhs.value_type(),
    }
}

/// Integer-valued operand: ints, and bools as 0/1.
fn integral(value: &Value) -> Option<i64> {
    match value {
        Value::Int(v) => Some(*v),
        Value::Bool(v) => Some(i64::from(*v)),
        _ => None,
    }
}

/// Replication count: negative counts produce an empty result.
fn count(value: &Value) -> Option<usize> {
    integral(value).map(|n| n.max(0) as usize)
}

pub(crate) fn add(lhs: &Value, rhs: &Value) -> RuntimeResult<Value> {
    if let (Some(a), Some(b)) = (numeric(lhs), numeric(rhs)) {
        return numeric_binary(a, b, i64::checked_add, |x, y| x + y, |x, y| x + y);
    }

    match (lhs, rhs) {
        (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{a}{b}"))),
        (Value::Bytes(a), Value::Bytes(b)) => {
            Ok(Value::Bytes(a.iter().chain(b).copied().collect()))
        }
        (Value::Seq(a), Value::Seq(b)) => Ok(Value::Seq(a.iter().chain(b).cloned().collect())),
        (Value::Tuple(a), Value::Tuple(b)) => {
            Ok(Value::Tuple(a.iter().chain(b).cloned().collect()))
        }
        // Mapping merge: the right operand wins on key collisions.
        (Value::Map(a), Value::Map(b)) => {
            let mut merged = a.clone();
            merged.extend(b.clone());
            Ok(Value::Map(merged))
        }
        _ => Err(unsupported("add", lhs, rhs)),
    }
}

pub(crate) fn sub(lhs: &Value, rhs: &Value) -> RuntimeResult<Value> {
    if let (Some(a), Some(b)) = (numeric(lhs), numeric(rhs)) {
        return numeric_binary(a, b, i64::checked_sub, |x, y| x - y, |x, y| x - y);
    }

    match (lhs, rhs) {
        (Value::Set(a), Value::Set(b)) => Ok(Value::Set(a.difference(b).cloned().collect())),
        _ => Err(unsupported("sub", lhs, rhs)),
    }
}

pub(crate) fn mul(lhs: &Value, rhs: &Value) -> RuntimeResult<Value> {
    if let (Some(a), Some(b)) = (numeric(lhs), numeric(rhs)) {
        return numeric_binary(a, b, i64::checked_mul, |x, y| x * y, |x, y| x * y);
    }

    match (lhs, rhs) {
        (Value::Str(s), n) | (n, Value::Str(s)) => match count(n) {
            Some(n) => Ok(Value::Str(s.repeat(n))),
            None => Err(unsupported("mul", lhs, rhs)),
        },
        (Value::Bytes(b), n) | (n, Value::Bytes(b)) => match count(n) {
            Some(n) => Ok(Value::Bytes(repeat_items(b, n))),
            None => Err(unsupported("mul", lhs, rhs)),
        },
        (Value::Seq(items), n) | (n, Value::Seq(items)) => match count(n) {
            Some(n) => Ok(Value::Seq(repeat_items(items, n))),
            None => Err(unsupported("mul", lhs, rhs)),
        },
        (Value::Tuple(items), n) | (n, Value::Tuple(items)) => match count(n) {
            Some(n) => Ok(Value::Tuple(repeat_items(items, n))),
            None => Err(unsupported("mul", lhs, rhs)),
        },
        _ => Err(unsupported("mul", lhs, rhs)),
    }
}

fn repeat_items<T: Clone>(items: &[T], n: usize) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len() * n);
    for _ in 0..n {
        out.extend_from_slice(items);
    }
    out
}

fn integral_pair(
    op: &'static str,
    lhs: &Value,
    rhs: &Value,
) -> RuntimeResult<(i64, i64)> {
    match (integral(lhs), integral(rhs)) {
        (Some(a), Some(b)) => {
            if b == 0 {
                Err(RuntimeError::DivisionByZero)
            } else if a == i64::MIN && b == -1 {
                Err(RuntimeError::ArithmeticOverflow)
            } else {
                Ok((a, b))
            }
        }
        _ => Err(unsupported(op, lhs, rhs)),
    }
}

pub(crate) fn intdiv(lhs: &Value, rhs: &Value) -> RuntimeResult<Value> {
    let (a, b) = integral_pair("intdiv", lhs, rhs)?;
    Ok(Value::Int(Integer::div_floor(&a, &b)))
}

pub(crate) fn modulo(lhs: &Value, rhs: &Value) -> RuntimeResult<Value> {
    let (a, b) = integral_pair("modulo", lhs, rhs)?;
    Ok(Value::Int(Integer::mod_floor(&a, &b)))
}

pub(crate) fn divmod(lhs: &Value, rhs: &Value) -> RuntimeResult<Value> {
    let (a, b) = integral_pair("divmod", lhs, rhs)?;
    let (quotient, remainder) = Integer::div_mod_floor(&a, &b);
    Ok(Value::Tuple(vec![
        Value::Int(quotient),
        Value::Int(remainder),
    ]))
}

pub(crate) fn union(lhs: &Value, rhs: &Value) -> RuntimeResult<Value> {
    match (lhs, rhs) {
        (Value::Set(a), Value::Set(b)) => Ok(Value::Set(a.union(b).cloned().collect())),
        _ => Err(unsupported("union", lhs, rhs)),
    }
}

pub(crate) fn strdiff(lhs: &Value, rhs: &Value) -> RuntimeResult<Value> {
    match (lhs, rhs) {
        (Value::Str(a), Value::Str(b)) => Ok(Value::Str(a.replace(b.as_str(), ""))),
        _ => Err(unsupported("strdiff", lhs, rhs)),
    }
}

/// Order-preserving removal of `rhs`'s elements from `lhs`, staying within
/// `lhs`'s container type. Mappings filter by key.
pub(crate) fn seqdiff(lhs: &Value, rhs: &Value) -> RuntimeResult<Value> {
    match (lhs, rhs) {
        (Value::Seq(a), Value::Seq(b)) => Ok(Value::Seq(
            a.iter().filter(|v| !b.contains(v)).cloned().collect(),
        )),
        (Value::Tuple(a), Value::Tuple(b)) => Ok(Value::Tuple(
            a.iter().filter(|v| !b.contains(v)).cloned().collect(),
        )),
        (Value::Bytes(a), Value::Bytes(b)) => Ok(Value::Bytes(
            a.iter().filter(|v| !b.contains(v)).copied().collect(),
        )),
        (Value::Map(a), Value::Map(b)) => Ok(Value::Map(
            a.iter()
                .filter(|(key, _)| !b.contains_key(key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        )),
        _ => Err(unsupported("seqdiff", lhs, rhs)),
    }
}

pub(crate) fn pathjoin(lhs: &Value, rhs: &Value) -> RuntimeResult<Value> {
    match (lhs, rhs) {
        (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{a}/{b}"))),
        _ => Err(unsupported("pathjoin", lhs, rhs)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: impl IntoIterator<Item = i64>) -> Value {
        Value::Set(values.into_iter().map(Value::Int).collect())
    }

    #[test]
    fn numeric_tower_widens() {
        assert_eq!(
            add(&Value::Int(1), &Value::Int(2)).unwrap(),
            Value::Int(3)
        );
        assert_eq!(
            add(&Value::Int(1), &Value::Float(0.5)).unwrap(),
            Value::Float(1.5)
        );
        assert_eq!(
            add(&Value::Bool(true), &Value::Int(1)).unwrap(),
            Value::Int(2)
        );
        assert_eq!(
            mul(&Value::Complex(Complex::new(0.0, 1.0)), &Value::Int(2)).unwrap(),
            Value::Complex(Complex::new(0.0, 2.0))
        );
    }

    #[test]
    fn integer_overflow_is_reported() {
        assert!(matches!(
            add(&Value::Int(i64::MAX), &Value::Int(1)),
            Err(RuntimeError::ArithmeticOverflow)
        ));
        assert!(matches!(
            intdiv(&Value::Int(i64::MIN), &Value::Int(-1)),
            Err(RuntimeError::ArithmeticOverflow)
        ));
    }

    #[test]
    fn concatenation_and_merge() {
        assert_eq!(
            add(&Value::Str("foo".into()), &Value::Str("bar".into())).unwrap(),
            Value::Str("foobar".into())
        );

        let left = Value::Map([(Value::Int(1), Value::Int(10))].into());
        let right = Value::Map(
            [(Value::Int(1), Value::Int(99)), (Value::Int(2), Value::Int(20))].into(),
        );
        assert_eq!(
            add(&left, &right).unwrap(),
            Value::Map(
                [(Value::Int(1), Value::Int(99)), (Value::Int(2), Value::Int(20))].into()
            )
        );

        assert!(add(&set([1]), &Value::Int(1)).is_err());
    }

    #[test]
    fn set_difference_and_union() {
        assert_eq!(sub(&set([1, 2, 3]), &set([2, 3, 4])).unwrap(), set([1]));
        assert_eq!(union(&set([1]), &set([2])).unwrap(), set([1, 2]));
    }

    #[test]
    fn replication() {
        assert_eq!(
            mul(&Value::Str("ab".into()), &Value::Int(3)).unwrap(),
            Value::Str("ababab".into())
        );
        assert_eq!(
            mul(&Value::Int(2), &Value::Seq(vec![Value::Int(1)])).unwrap(),
            Value::Seq(vec![Value::Int(1), Value::Int(1)])
        );
        assert_eq!(
            mul(&Value::Str("ab".into()), &Value::Int(-1)).unwrap(),
            Value::Str(String::new())
        );
        assert_eq!(
            mul(&Value::Str("ab".into()), &Value::Bool(true)).unwrap(),
            Value::Str("ab".into())
        );
    }

    #[test]
    fn flooring_division_tracks_the_divisor_sign() {
        assert_eq!(
            intdiv(&Value::Int(-7), &Value::Int(2)).unwrap(),
            Value::Int(-4)
        );
        assert_eq!(
            modulo(&Value::Int(-7), &Value::Int(2)).unwrap(),
            Value::Int(1)
        );
        assert_eq!(
            modulo(&Value::Int(7), &Value::Int(-2)).unwrap(),
            Value::Int(-1)
        );
        assert_eq!(
            divmod(&Value::Int(7), &Value::Int(2)).unwrap(),
            Value::Tuple(vec![Value::Int(3), Value::Int(1)])
        );
        assert!(matches!(
            intdiv(&Value::Int(1), &Value::Int(0)),
            Err(RuntimeError::DivisionByZero)
        ));
    }

    #[test]
    fn differences() {
        assert_eq!(
            strdiff(&Value::Str("banana".into()), &Value::Str("an".into())).unwrap(),
            Value::Str("ba".into())
        );
        assert_eq!(
            seqdiff(
                &Value::Seq(vec![Value::Int(1), Value::Int(2), Value::Int(1)]),
                &Value::Seq(vec![Value::Int(2)])
            )
            .unwrap(),
            Value::Seq(vec![Value::Int(1), Value::Int(1)])
        );
        assert_eq!(
            pathjoin(&Value::Str("a".into()), &Value::Str("b".into())).unwrap(),
            Value::Str("a/b".into())
        );
    }
}
