use std::fmt;

use crate::record::Record;
use crate::types::TypeDesc;
use crate::validate::validate;

use super::Value;

/// Borrowed view of anything that can sit in a tree: a record or a value.
///
/// Constructing from `&Value` normalizes `Value::Record` into
/// [`ValueRef::Record`], so matching on the record case is enough.
#[derive(Clone, Copy)]
pub enum ValueRef<'a> {
    Record(&'a Record),
    Value(&'a Value),
}

impl<'a> ValueRef<'a> {
    pub fn as_record(self) -> Option<&'a Record> {
        match self {
            ValueRef::Record(r) => Some(r),
            ValueRef::Value(_) => None,
        }
    }

    pub fn as_value(self) -> Option<&'a Value> {
        match self {
            ValueRef::Value(v) => Some(v),
            ValueRef::Record(_) => None,
        }
    }

    /// Whether this is a node record.
    pub fn is_node(self) -> bool {
        self.as_record().is_some_and(Record::is_node)
    }

    /// Record type name, or the value's shape name.
    pub fn type_name(self) -> &'a str {
        match self {
            ValueRef::Record(r) => r.type_name(),
            ValueRef::Value(v) => v.kind_name(),
        }
    }

    /// Whether the item satisfies `ty`.
    pub fn is_instance(self, ty: &TypeDesc) -> bool {
        validate(ty, self).is_ok()
    }

    /// Owned copy of the item.
    pub fn to_value(self) -> Value {
        match self {
            ValueRef::Record(r) => Value::Record(Box::new(r.clone())),
            ValueRef::Value(v) => v.clone(),
        }
    }

    /// Identity comparison.
    pub fn ptr_eq(self, other: ValueRef<'_>) -> bool {
        match (self, other) {
            (ValueRef::Record(a), ValueRef::Record(b)) => std::ptr::eq(a, b),
            (ValueRef::Value(a), ValueRef::Value(b)) => std::ptr::eq(a, b),
            _ => false,
        }
    }
}

impl<'a> From<&'a Value> for ValueRef<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Record(r) => ValueRef::Record(r),
            other => ValueRef::Value(other),
        }
    }
}

impl<'a> From<&'a Record> for ValueRef<'a> {
    fn from(record: &'a Record) -> Self {
        ValueRef::Record(record)
    }
}

impl PartialEq for ValueRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ValueRef::Record(a), ValueRef::Record(b)) => a == b,
            (ValueRef::Value(a), ValueRef::Value(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for ValueRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueRef::Record(r) => write!(f, "{r:?}"),
            ValueRef::Value(v) => write!(f, "{v}"),
        }
    }
}

impl fmt::Debug for ValueRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
