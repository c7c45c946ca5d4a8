//! Strict type validators.
//!
//! [`validate`] checks a value against a [`TypeDesc`] and explains the first
//! mismatch it finds as a [`Rejection`]. Matching is strict: no implicit
//! numeric widening, and `bool` is not an `int`.
//!
//! # Design
//!
//! - Unions try their alternatives in order; the first match wins.
//! - Containers report the position (or key) of the offending element,
//!   nesting the inner rejection.
//! - Records match by subtype. Applied generics match when some type in the
//!   instance's lineage was concretized from the same generic with matching
//!   arguments.


use crate::error::Rejection;
use crate::model::RecordTypeRef;
use crate::record::Record;
use crate::stack::ensure_sufficient_stack;
use crate::types::{Primitive, TypeDesc};
use crate::value::{Value, ValueRef};

/// Check `value` against `ty`.
pub fn validate<'a>(ty: &TypeDesc, value: impl Into<ValueRef<'a>>) -> Result<(), Rejection> {
    check(ty, value.into())
}

fn mismatch(ty: &TypeDesc, value: ValueRef<'_>) -> Rejection {
    Rejection::Mismatch {
        expected: ty.to_string(),
        found: value.type_name().to_owned(),
        value: value.to_string(),
    }
}

fn check(ty: &TypeDesc, value: ValueRef<'_>) -> Result<(), Rejection> {
    ensure_sufficient_stack(|| match ty {
        TypeDesc::Any => Ok(()),
        TypeDesc::Primitive(primitive) => check_primitive(ty, primitive, value),
        TypeDesc::Literal(literals) => match value.as_value() {
            Some(v) if literals.iter().any(|l| l.matches(v)) => Ok(()),
            _ => Err(Rejection::Literal {
                expected: ty.to_string(),
                value: value.to_string(),
            }),
        },
        TypeDesc::Optional(inner) => match value {
            ValueRef::Value(Value::None) => Ok(()),
            _ => check(inner, value),
        },
        TypeDesc::Union(alternatives) => {
            if alternatives.iter().any(|alt| check(alt, value).is_ok()) {
                Ok(())
            } else {
                Err(Rejection::NoAlternative {
                    expected: ty.to_string(),
                    value: value.to_string(),
                })
            }
        }
        TypeDesc::Tuple(elements) => match value {
            ValueRef::Value(Value::Tuple(items)) => {
                if items.len() != elements.len() {
                    return Err(Rejection::Arity {
                        expected: elements.len(),
                        found: items.len(),
                        index: items.len().min(elements.len()),
                    });
                }
                elements
                    .iter()
                    .zip(items)
                    .enumerate()
                    .try_for_each(|(index, (element, item))| check_element(element, item, index))
            }
            _ => Err(mismatch(ty, value)),
        },
        TypeDesc::Sequence(element) => match value {
            ValueRef::Value(Value::List(items)) => items
                .iter()
                .enumerate()
                .try_for_each(|(index, item)| check_element(element, item, index)),
            _ => Err(mismatch(ty, value)),
        },
        TypeDesc::Set(element) => match value {
            ValueRef::Value(Value::Set(items)) => items
                .iter()
                .enumerate()
                .try_for_each(|(index, item)| check_element(element, item, index)),
            _ => Err(mismatch(ty, value)),
        },
        TypeDesc::Mapping(key_ty, value_ty) => match value {
            ValueRef::Value(Value::Map(entries)) => entries.iter().try_for_each(|(k, v)| {
                check(key_ty, k.into()).map_err(|reason| Rejection::Key {
                    key: k.to_string(),
                    reason: Box::new(reason),
                })?;
                check(value_ty, v.into()).map_err(|reason| Rejection::Entry {
                    key: k.to_string(),
                    reason: Box::new(reason),
                })
            }),
            _ => Err(mismatch(ty, value)),
        },
        TypeDesc::Enum(enum_ty) => match value {
            ValueRef::Value(Value::Enum(member)) if member.enum_type() == enum_ty => Ok(()),
            _ => Err(mismatch(ty, value)),
        },
        TypeDesc::Record(record_ty) => match value {
            ValueRef::Record(record) if record.is_instance_of(record_ty) => Ok(()),
            _ => Err(mismatch(ty, value)),
        },
        TypeDesc::TypeVar(var) => match var.bound() {
            Some(bound) => check(bound, value),
            None => Ok(()),
        },
        TypeDesc::Generic(base, args) => match value {
            ValueRef::Record(record) if specialization_matches(record, base, args) => Ok(()),
            _ => Err(mismatch(ty, value)),
        },
    })
}

fn check_element(ty: &TypeDesc, item: &Value, index: usize) -> Result<(), Rejection> {
    check(ty, item.into()).map_err(|reason| Rejection::Element {
        index,
        reason: Box::new(reason),
    })
}

fn check_primitive(ty: &TypeDesc, primitive: &Primitive, value: ValueRef<'_>) -> Result<(), Rejection> {
    let ok = match (primitive, value) {
        (Primitive::None, ValueRef::Value(Value::None))
        | (Primitive::Bool, ValueRef::Value(Value::Bool(_)))
        | (Primitive::Int, ValueRef::Value(Value::Int(_)))
        | (Primitive::Float, ValueRef::Value(Value::Float(_)))
        | (Primitive::Str | Primitive::SymbolRef, ValueRef::Value(Value::Str(_)))
        | (Primitive::Bytes, ValueRef::Value(Value::Bytes(_))) => true,
        (Primitive::SymbolName(pattern), ValueRef::Value(Value::Str(name))) => {
            if pattern.is_match(name) {
                true
            } else {
                return Err(Rejection::SymbolPattern {
                    pattern: pattern.as_str().to_owned(),
                    value: name.clone(),
                });
            }
        }
        _ => false,
    };
    if ok {
        Ok(())
    } else {
        Err(mismatch(ty, value))
    }
}

/// Whether `record` is an instance of `base` applied to `args`.
fn specialization_matches(record: &Record, base: &RecordTypeRef, args: &[TypeDesc]) -> bool {
    let ty = record.record_type();
    for candidate in std::iter::once(ty).chain(ty.ancestors()) {
        if let Some(spec) = candidate.specialization() {
            if spec.generic == *base {
                return spec.args.len() == args.len()
                    && spec.args.iter().zip(args).all(|(have, want)| argument_matches(have, want));
            }
        }
    }
    // An instance of the unapplied generic matches when every argument is
    // still a type variable.
    record.is_instance_of(base) && args.iter().all(|a| matches!(a, TypeDesc::TypeVar(_)))
}

fn argument_matches(have: &TypeDesc, want: &TypeDesc) -> bool {
    match (have, want) {
        (_, TypeDesc::TypeVar(var)) => var.bound().map_or(true, |bound| argument_matches(have, bound)),
        (_, TypeDesc::Any) => true,
        (_, TypeDesc::Union(alternatives)) => alternatives.iter().any(|alt| argument_matches(have, alt)),
        (TypeDesc::Record(h), TypeDesc::Record(w)) => h.is_subtype_of(w),
        _ => have == want,
    }
}
