//! Symbol tables for scope nodes.
//!
//! A node type built with `symbol_scope()` collects, at construction, a map
//! from every symbol name declared in its subtree to the node declaring it.
//! A field declares a symbol when its type is a symbol name (possibly
//! optional). Nested scope nodes declare their own names in the enclosing
//! scope but keep their subtrees to themselves.


use indexmap::IndexMap;

use crate::error::ValueError;
use crate::node::NodeId;
use crate::record::Record;
use crate::traverse::{children_of, traverse, TraversalOrder};
use crate::value::{Value, ValueRef};

/// Symbol name to declaring node, in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolTable {
    entries: IndexMap<String, NodeId>,
}

impl SymbolTable {
    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.entries.iter().map(|(name, id)| (name.as_str(), *id))
    }
}

/// Collect the symbols declared in `scope`'s subtree.
#[tracing::instrument(level = "trace", skip_all, fields(scope = %scope.type_name()))]
pub(crate) fn collect(scope: &Record) -> Result<SymbolTable, ValueError> {
    let mut table = SymbolTable::default();
    let mut pending: Vec<ValueRef<'_>> = vec![ValueRef::Record(scope)];

    while let Some(item) = pending.pop() {
        if let ValueRef::Record(record) = item {
            if let Some(id) = record.node_id() {
                declare(&mut table, scope, record, id)?;
            }
            let nested = !std::ptr::eq(record, scope) && record.record_type().is_symbol_scope();
            if nested {
                continue;
            }
        }
        pending.extend(children_of(item).into_iter().rev().map(|(_, child)| child));
    }

    tracing::trace!(symbols = table.len(), "symbol table collected");
    Ok(table)
}

fn declare(table: &mut SymbolTable, scope: &Record, record: &Record, id: NodeId) -> Result<(), ValueError> {
    for field in record.record_type().fields() {
        if !field.ty().is_symbol_name() {
            continue;
        }
        let Some(Value::Str(name)) = record.get(field.name()) else {
            continue;
        };
        if table.entries.insert(name.clone(), id).is_some() {
            return Err(ValueError::DuplicateSymbol {
                name: name.clone(),
                scope: scope.type_name().to_owned(),
            });
        }
    }
    Ok(())
}

impl Record {
    /// Symbol table of a scope node.
    pub fn symbol_table(&self) -> Option<&SymbolTable> {
        self.node.as_ref().and_then(|n| n.symtable.as_ref())
    }

    /// Node declaring `name` in this scope.
    pub fn resolve_symbol(&self, name: &str) -> Option<&Record> {
        let id = self.symbol_table()?.get(name)?;
        traverse(self, TraversalOrder::PreOrder)
            .filter_map(ValueRef::as_record)
            .find(|record| record.node_id() == Some(id))
    }
}
