//! Arithmetic, comparison and logic operators.
//!
//! Integers and booleans are both numbers here (`true` is 1). Arithmetic
//! wraps at 32 bits. `+` with a string on either side concatenates display
//! forms; every other operator rejects strings mixed with numbers.

use std::cmp::Ordering;

use intvm_foundation::{Error, ErrorKind, Result, Type, Value};

fn number(value: &Value) -> Result<i32> {
    value
        .as_int()
        .ok_or_else(|| Error::type_mismatch(Type::Number, value.value_type()))
}

fn numbers(a: &Value, b: &Value) -> Result<(i32, i32)> {
    Ok((number(a)?, number(b)?))
}

/// Adds two values.
pub(crate) fn add(a: Value, b: Value) -> Result<Value> {
    if a.is_string() || b.is_string() {
        return Ok(Value::from(format!("{a}{b}")));
    }
    let (x, y) = numbers(&a, &b)?;
    Ok(Value::Int(x.wrapping_add(y)))
}

/// Subtracts two values.
pub(crate) fn sub(a: Value, b: Value) -> Result<Value> {
    let (x, y) = numbers(&a, &b)?;
    Ok(Value::Int(x.wrapping_sub(y)))
}

/// Multiplies two values.
pub(crate) fn mul(a: Value, b: Value) -> Result<Value> {
    let (x, y) = numbers(&a, &b)?;
    Ok(Value::Int(x.wrapping_mul(y)))
}

/// Integer division, truncated toward zero.
pub(crate) fn div_truncating(a: Value, b: Value) -> Result<Value> {
    let (x, y) = numbers(&a, &b)?;
    if y == 0 {
        return Err(Error::new(ErrorKind::DivisionByZero));
    }
    Ok(Value::Int(x.wrapping_div(y)))
}

/// Remainder with the sign of the dividend.
pub(crate) fn rem(a: Value, b: Value) -> Result<Value> {
    let (x, y) = numbers(&a, &b)?;
    if y == 0 {
        return Err(Error::new(ErrorKind::DivisionByZero));
    }
    Ok(Value::Int(x.wrapping_rem(y)))
}

/// Negates a value.
pub(crate) fn negate(a: Value) -> Result<Value> {
    Ok(Value::Int(number(&a)?.wrapping_neg()))
}

/// Equality as the `==` operator sees it. Never fails: values of
/// incomparable types are simply unequal.
pub(crate) fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::String(x), Value::String(y)) => x == y,
        (Value::String(_), _) | (_, Value::String(_)) => false,
        _ => a.as_int() == b.as_int(),
    }
}

pub(crate) fn equal(a: Value, b: Value) -> Result<Value> {
    Ok(Value::Bool(loosely_equal(&a, &b)))
}

pub(crate) fn not_equal(a: Value, b: Value) -> Result<Value> {
    Ok(Value::Bool(!loosely_equal(&a, &b)))
}

/// Orders two numbers or two strings and applies `pred`.
pub(crate) fn compare<F>(a: Value, b: Value, pred: F) -> Result<Value>
where
    F: FnOnce(Ordering) -> bool,
{
    let ord = match (&a, &b) {
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::String(_), other) | (other, Value::String(_)) => {
            return Err(Error::type_mismatch(Type::String, other.value_type()));
        }
        _ => {
            let (x, y) = numbers(&a, &b)?;
            x.cmp(&y)
        }
    };
    Ok(Value::Bool(pred(ord)))
}

pub(crate) fn and(a: Value, b: Value) -> Result<Value> {
    Ok(Value::Bool(a.is_truthy() && b.is_truthy()))
}

pub(crate) fn or(a: Value, b: Value) -> Result<Value> {
    Ok(Value::Bool(a.is_truthy() || b.is_truthy()))
}
