//! Record instances.
//!
//! A [`Record`] is an instance of a [`crate::RecordType`]: one value per field of the
//! type's field table, plus node state when the type is a node type.
//! Instances only come out of the validating constructor.
//!
//! Equality, hashing, ordering and the textual representation all follow the
//! per-field flags of the record type.

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::ValueError;
use crate::field::FieldFlags;
use crate::model::RecordTypeRef;
use crate::node::NodeState;
use crate::value::Value;

/// Record instance.
#[derive(Clone)]
pub struct Record {
    pub(crate) ty: RecordTypeRef,
    pub(crate) values: Vec<Value>,
    pub(crate) node: Option<Box<NodeState>>,
}

impl Record {
    pub fn record_type(&self) -> &RecordTypeRef {
        &self.ty
    }

    pub fn type_name(&self) -> &str {
        self.ty.name()
    }

    /// Field value by name; dynamic annotations are included for nodes.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self.ty.field_index(name) {
            Some(index) => Some(&self.values[index]),
            None => self.node.as_ref().and_then(|n| n.extra.get(name)),
        }
    }

    /// Field value by name, failing on unknown names.
    pub fn field(&self, name: &str) -> Result<&Value, ValueError> {
        self.get(name).ok_or_else(|| self.unknown_field(name))
    }

    /// All declared fields in table order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.ty.fields().iter().map(|f| f.name()).zip(&self.values)
    }

    /// Assign a declared field. Frozen records reject assignment; mutable
    /// records accept it without re-running validation.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ValueError> {
        let slot = self.writable_slot(name)?;
        self.values[slot] = value.into();
        Ok(())
    }

    /// Mutable access to a declared field of a mutable record.
    pub fn get_mut(&mut self, name: &str) -> Result<&mut Value, ValueError> {
        let slot = self.writable_slot(name)?;
        Ok(&mut self.values[slot])
    }

    /// Whether the record's type is `ty` or derives from it.
    pub fn is_instance_of(&self, ty: &RecordTypeRef) -> bool {
        self.ty.is_subtype_of(ty)
    }

    /// Ordering through the `ORDER` fields. Both records must be of the same
    /// ordered type.
    pub fn try_cmp(&self, other: &Record) -> Result<Ordering, ValueError> {
        if self.ty != other.ty || !self.ty.is_ordered() {
            return Err(ValueError::Unordered {
                left: self.type_name().to_owned(),
                right: other.type_name().to_owned(),
            });
        }
        for (index, field) in self.ty.fields().iter().enumerate() {
            if !field.flags().contains(FieldFlags::ORDER) {
                continue;
            }
            match self.values[index].try_cmp(&other.values[index])? {
                Ordering::Equal => {}
                ordering => return Ok(ordering),
            }
        }
        Ok(Ordering::Equal)
    }

    fn writable_slot(&self, name: &str) -> Result<usize, ValueError> {
        let slot = self
            .ty
            .field_index(name)
            .ok_or_else(|| self.unknown_field(name))?;
        if self.ty.is_frozen() {
            return Err(ValueError::Frozen {
                record: self.type_name().to_owned(),
                field: name.to_owned(),
            });
        }
        Ok(slot)
    }

    fn unknown_field(&self, name: &str) -> ValueError {
        ValueError::UnknownField {
            record: self.type_name().to_owned(),
            field: name.to_owned(),
        }
    }

    fn flagged(&self, flag: FieldFlags) -> impl Iterator<Item = (&str, &Value)> {
        self.ty
            .fields()
            .iter()
            .zip(&self.values)
            .filter(move |(field, _)| field.flags().contains(flag))
            .map(|(field, value)| (field.name(), value))
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty
            && self
                .flagged(FieldFlags::EQ)
                .zip(other.flagged(FieldFlags::EQ))
                .all(|((_, a), (_, b))| a == b)
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ty.hash(state);
        for (_, value) in self.flagged(FieldFlags::HASH) {
            value.hash(state);
        }
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.type_name())?;
        for (i, (name, value)) in self.flagged(FieldFlags::REPR).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
