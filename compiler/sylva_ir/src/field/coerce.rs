//! Automatic argument coercion for `auto_convert` fields.

use crate::types::{Primitive, TypeDesc};
use crate::value::Value;

/// Coerce scalar values towards `ty`. Non-scalar targets pass through and
/// are left to the validator.
pub(crate) fn coerce(ty: &TypeDesc, value: Value) -> Result<Value, String> {
    match ty {
        TypeDesc::Optional(_) if value.is_none() => Ok(value),
        TypeDesc::Optional(inner) => coerce(inner, value),
        TypeDesc::Primitive(primitive) => coerce_primitive(primitive, value),
        _ => Ok(value),
    }
}

fn coerce_primitive(target: &Primitive, value: Value) -> Result<Value, String> {
    match (target, value) {
        (Primitive::Int, Value::Bool(b)) => Ok(Value::Int(i64::from(b))),
        #[expect(clippy::cast_possible_truncation, reason = "truncation toward zero is the int() semantics")]
        (Primitive::Int, Value::Float(x)) if x.is_finite() => Ok(Value::Int(x.trunc() as i64)),
        (Primitive::Int, Value::Str(s)) => s
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|e| format!("invalid literal for int: '{s}' ({e})")),
        #[expect(clippy::cast_precision_loss, reason = "float() semantics")]
        (Primitive::Float, Value::Int(i)) => Ok(Value::Float(i as f64)),
        (Primitive::Float, Value::Str(s)) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|e| format!("could not convert string to float: '{s}' ({e})")),
        (Primitive::Bool, Value::Int(i)) => Ok(Value::Bool(i != 0)),
        (Primitive::Bool, Value::Str(s)) => Ok(Value::Bool(!s.is_empty())),
        (
            Primitive::Str | Primitive::SymbolName(_) | Primitive::SymbolRef,
            v @ (Value::Int(_) | Value::Float(_) | Value::Bool(_)),
        ) => Ok(Value::Str(display_scalar(&v))),
        (Primitive::Bytes, Value::Str(s)) => Ok(Value::Bytes(s.into_bytes())),
        (_, v) => Ok(v),
    }
}

fn display_scalar(value: &Value) -> String {
    match value {
        Value::Str(s) => s.clone(),
        other => other.to_string(),
    }
}
