//! Node identity and node-only record state.
//!
//! A node is a record whose type was built with [`crate::RecordBuilder::node`].
//! Besides its field values it carries:
//! - a [`NodeId`], unique within its session
//! - dynamic data annotations, assignable without a schema declaration
//! - the symbol table, when its type opens a symbol scope
//!
//! Field roles follow the naming convention in [`crate::FieldKind`].


use std::fmt;

use indexmap::IndexMap;

use crate::error::ValueError;
use crate::field::FieldKind;
use crate::record::Record;
use crate::symtable::SymbolTable;
use crate::value::Value;

/// Unique node identity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl NodeId {
    pub const fn new(raw: u64) -> Self {
        NodeId(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct NodeState {
    pub(crate) id: NodeId,
    pub(crate) extra: IndexMap<String, Value>,
    pub(crate) symtable: Option<SymbolTable>,
}

impl NodeState {
    pub(crate) fn new(id: NodeId) -> Self {
        NodeState {
            id,
            extra: IndexMap::new(),
            symtable: None,
        }
    }
}

impl Record {
    pub fn is_node(&self) -> bool {
        self.node.is_some()
    }

    pub fn node_id(&self) -> Option<NodeId> {
        self.node.as_ref().map(|n| n.id)
    }

    /// Textual node label, `<TypeName>_<id>`.
    pub fn node_label(&self) -> Option<String> {
        self.node_id().map(|id| format!("{}_{id}", self.type_name()))
    }

    /// Child fields in declaration order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields_of_kind(FieldKind::Child)
    }

    /// Internal (`_`-suffixed) fields in declaration order.
    pub fn internals(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields_of_kind(FieldKind::Internal)
    }

    /// Declared annotation fields followed by dynamic annotations.
    pub fn annotations(&self) -> impl Iterator<Item = (&str, &Value)> {
        let dynamic = self
            .node
            .iter()
            .flat_map(|n| n.extra.iter().map(|(k, v)| (k.as_str(), v)));
        self.fields_of_kind(FieldKind::Annotation).chain(dynamic)
    }

    /// Annotation by name, declared or dynamic.
    pub fn annotation(&self, name: &str) -> Option<&Value> {
        self.annotations().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// Set a data annotation.
    ///
    /// Declared annotation fields are assigned in place; other names are
    /// stored as dynamic annotations. Fails on non-nodes and frozen nodes.
    pub fn set_annotation(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ValueError> {
        if self.ty.is_frozen() {
            return Err(ValueError::Frozen {
                record: self.type_name().to_owned(),
                field: name.to_owned(),
            });
        }
        if let Some(index) = self.ty.field_index(name) {
            if self.ty.fields()[index].kind() != FieldKind::Annotation {
                return Err(ValueError::UnexpectedArgument {
                    record: self.type_name().to_owned(),
                    field: name.to_owned(),
                });
            }
            self.values[index] = value.into();
            return Ok(());
        }
        let record = self.type_name().to_owned();
        match self.node.as_mut() {
            Some(node) => {
                node.extra.insert(name.to_owned(), value.into());
                Ok(())
            }
            None => Err(ValueError::UnknownField {
                record,
                field: name.to_owned(),
            }),
        }
    }

    fn fields_of_kind(&self, kind: FieldKind) -> impl Iterator<Item = (&str, &Value)> {
        self.ty
            .fields()
            .iter()
            .zip(&self.values)
            .filter(move |(field, _)| field.kind() == kind)
            .map(|(field, value)| (field.name(), value))
    }
}
