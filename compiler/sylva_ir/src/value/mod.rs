//! Dynamic value model.
//!
//! Every field of every record holds a [`Value`]. The model is closed:
//! scalars, enumeration members, the four container shapes and nested
//! records. Type descriptions are checked against it by the validators.
//!
//! # Design
//!
//! - `Float` compares and hashes by bit pattern so that `Value` can be a
//!   hash-map key; ordering goes through `f64::partial_cmp` instead.
//! - `Set` and `Map` keep insertion order (`IndexSet`/`IndexMap`), so
//!   traversal and code generation are deterministic.
//! - Sets, maps and lists are unhashable. Using them (or records whose type is
//!   not hashable) as set elements or map keys is rejected by [`Value::set`]
//!   and [`Value::map`].

mod value_ref;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::error::ValueError;
use crate::record::Record;

pub use value_ref::ValueRef;

/// Enumeration type: a name and an ordered list of member names.
#[derive(Debug)]
pub struct EnumType {
    name: String,
    members: Vec<String>,
}

/// Shared handle to an [`EnumType`], compared by identity.
#[derive(Clone, Debug)]
pub struct EnumTypeRef(Arc<EnumType>);

impl EnumType {
    pub fn new<I, S>(name: impl Into<String>, members: I) -> EnumTypeRef
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EnumTypeRef(Arc::new(EnumType {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }
}

impl EnumTypeRef {
    /// Member by name.
    pub fn member(&self, name: &str) -> Option<EnumValue> {
        self.0
            .members
            .iter()
            .position(|m| m == name)
            .map(|index| EnumValue {
                ty: self.clone(),
                index,
            })
    }

    /// Member by name, as a [`Value`].
    pub fn value(&self, name: &str) -> Option<Value> {
        self.member(name).map(Value::Enum)
    }
}

impl std::ops::Deref for EnumTypeRef {
    type Target = EnumType;

    fn deref(&self) -> &EnumType {
        &self.0
    }
}

impl PartialEq for EnumTypeRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for EnumTypeRef {}

impl Hash for EnumTypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

/// A member of an [`EnumType`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumValue {
    ty: EnumTypeRef,
    index: usize,
}

impl EnumValue {
    pub fn enum_type(&self) -> &EnumTypeRef {
        &self.ty
    }

    pub fn name(&self) -> &str {
        &self.ty.members[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.ty.name, self.name())
    }
}

/// A dynamically typed field value.
#[derive(Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Enum(EnumValue),
    Tuple(Vec<Value>),
    List(Vec<Value>),
    Set(IndexSet<Value>),
    Map(IndexMap<Value, Value>),
    Record(Box<Record>),
}

impl Value {
    pub fn list<I: IntoIterator<Item = V>, V: Into<Value>>(items: I) -> Value {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    pub fn tuple<I: IntoIterator<Item = V>, V: Into<Value>>(items: I) -> Value {
        Value::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// Build a set, rejecting unhashable elements.
    pub fn set<I: IntoIterator<Item = V>, V: Into<Value>>(items: I) -> Result<Value, ValueError> {
        let mut set = IndexSet::new();
        for item in items {
            let item = item.into();
            item.ensure_hashable()?;
            set.insert(item);
        }
        Ok(Value::Set(set))
    }

    /// Build a mapping, rejecting unhashable keys. Later entries overwrite
    /// earlier ones with an equal key.
    pub fn map<I, K, V>(entries: I) -> Result<Value, ValueError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        let mut map = IndexMap::new();
        for (key, value) in entries {
            let key = key.into();
            key.ensure_hashable()?;
            map.insert(key, value.into());
        }
        Ok(Value::Map(map))
    }

    /// Short name of the value's runtime shape, used in diagnostics.
    pub fn kind_name(&self) -> &str {
        match self {
            Value::None => "None",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::Enum(e) => e.ty.name(),
            Value::Tuple(_) => "tuple",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Map(_) => "dict",
            Value::Record(r) => r.type_name(),
        }
    }

    /// Whether the value may be used as a set element or mapping key.
    pub fn is_hashable(&self) -> bool {
        match self {
            Value::List(_) | Value::Set(_) | Value::Map(_) => false,
            Value::Tuple(items) => items.iter().all(Value::is_hashable),
            Value::Record(r) => r.record_type().is_hashable(),
            _ => true,
        }
    }

    pub(crate) fn ensure_hashable(&self) -> Result<(), ValueError> {
        if self.is_hashable() {
            Ok(())
        } else {
            Err(ValueError::Unhashable {
                value: self.to_string(),
            })
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            Value::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Elements of a tuple or list.
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(items) | Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Total-or-fail ordering between two values.
    ///
    /// Numbers compare across `int`/`float`; tuples and lists compare
    /// lexicographically; records compare through their ordered fields.
    pub fn try_cmp(&self, other: &Value) -> Result<Ordering, ValueError> {
        let unordered = || ValueError::Unordered {
            left: self.to_string(),
            right: other.to_string(),
        };
        match (self, other) {
            (Value::None, Value::None) => Ok(Ordering::Equal),
            (Value::Bool(a), Value::Bool(b)) => Ok(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b).ok_or_else(unordered),
            #[expect(clippy::cast_precision_loss, reason = "mixed int/float comparison")]
            (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b).ok_or_else(unordered),
            #[expect(clippy::cast_precision_loss, reason = "mixed int/float comparison")]
            (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)).ok_or_else(unordered),
            (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
            (Value::Bytes(a), Value::Bytes(b)) => Ok(a.cmp(b)),
            (Value::Enum(a), Value::Enum(b)) if a.ty == b.ty => Ok(a.index.cmp(&b.index)),
            (Value::Tuple(a), Value::Tuple(b)) | (Value::List(a), Value::List(b)) => {
                for (x, y) in a.iter().zip(b) {
                    match x.try_cmp(y)? {
                        Ordering::Equal => {}
                        other => return Ok(other),
                    }
                }
                Ok(a.len().cmp(&b.len()))
            }
            (Value::Record(a), Value::Record(b)) => a.try_cmp(b),
            _ => Err(unordered()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) | (Value::List(a), Value::List(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::None => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Str(s) => s.hash(state),
            Value::Bytes(b) => b.hash(state),
            Value::Enum(e) => e.hash(state),
            Value::Tuple(items) | Value::List(items) => items.hash(state),
            // Unhashable as keys; length keeps Hash consistent with the
            // order-insensitive equality.
            Value::Set(s) => s.len().hash(state),
            Value::Map(m) => m.len().hash(state),
            Value::Record(r) => r.hash(state),
        }
    }
}

fn write_joined<'v>(
    f: &mut fmt::Formatter<'_>,
    items: impl IntoIterator<Item = &'v Value>,
) -> fmt::Result {
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Str(s) => write!(f, "'{s}'"),
            Value::Bytes(b) => write!(f, "b'{}'", b.escape_ascii()),
            Value::Enum(e) => write!(f, "{e}"),
            Value::Tuple(items) => {
                f.write_str("(")?;
                write_joined(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Value::List(items) => {
                f.write_str("[")?;
                write_joined(f, items)?;
                f.write_str("]")
            }
            Value::Set(items) => {
                f.write_str("{")?;
                write_joined(f, items)?;
                f.write_str("}")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Value::Record(r) => write!(f, "{r:?}"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
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

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<EnumValue> for Value {
    fn from(e: EnumValue) -> Self {
        Value::Enum(e)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(Box::new(r))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::None, Into::into)
    }
}
