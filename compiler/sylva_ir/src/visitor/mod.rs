//! Tree visitors and translators.
//!
//! # Design
//!
//! - [`Visitor`]: read-only, recursive visiting. Default methods call the
//!   `walk_*` functions, which visit children. Override `visit_node` (and
//!   dispatch on the record type, often through a
//!   [`DispatchTable`](crate::DispatchTable)) to act on specific nodes.
//! - [`Translator`]: rebuilds a tree bottom-up. Returning `None` for an item
//!   removes it from its parent container; returning `None` for a node
//!   child leaves the field to its default.
//! - [`Pass`]: a named unit of work applied to a root.
//!
//! # Example
//!
//! ```text
//! struct CountNodes {
//!     count: usize,
//! }
//!
//! impl<'a> Visitor<'a> for CountNodes {
//!     fn visit_node(&mut self, node: &'a Record) {
//!         self.count += 1;
//!         walk_node(self, node);
//!     }
//! }
//! ```


use indexmap::{IndexMap, IndexSet};

use crate::error::ValueError;
use crate::field::FieldKind;
use crate::record::Record;
use crate::stack::ensure_sufficient_stack;
use crate::traverse::children_of;
use crate::value::{Value, ValueRef};

/// Recursive read-only visitor.
pub trait Visitor<'a> {
    /// Visit any item; dispatches to `visit_node` or `visit_value`.
    fn visit(&mut self, item: ValueRef<'a>) {
        match item {
            ValueRef::Record(record) if record.is_node() => self.visit_node(record),
            _ => self.visit_value(item),
        }
    }

    /// Visit a node record.
    fn visit_node(&mut self, node: &'a Record) {
        walk_node(self, node);
    }

    /// Visit a container, a leaf or a plain data record.
    fn visit_value(&mut self, item: ValueRef<'a>) {
        walk_value(self, item);
    }
}

/// Visit each child of `node`.
pub fn walk_node<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, node: &'a Record) {
    walk_value(visitor, ValueRef::Record(node));
}

/// Visit each child of `item`.
pub fn walk_value<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, item: ValueRef<'a>) {
    ensure_sufficient_stack(|| {
        for (_, child) in children_of(item) {
            visitor.visit(child);
        }
    });
}

/// Bottom-up tree rebuilder.
pub trait Translator {
    /// Translate any value. `None` removes it from its parent.
    fn translate(&mut self, value: &Value) -> Result<Option<Value>, ValueError> {
        match value {
            Value::Record(record) if record.is_node() => self.translate_node(record),
            _ => translate_children(self, value),
        }
    }

    /// Translate a node record. Default rebuilds it from translated children.
    fn translate_node(&mut self, node: &Record) -> Result<Option<Value>, ValueError> {
        rebuild_node(self, node).map(|record| Some(Value::from(record)))
    }
}

/// Rebuild `node` with every child translated.
///
/// The rebuilt node goes through the validating constructor again, so it
/// gets a fresh id and a fresh symbol table. Annotations are carried over.
pub fn rebuild_node<T: Translator + ?Sized>(translator: &mut T, node: &Record) -> Result<Record, ValueError> {
    ensure_sufficient_stack(|| {
        let ty = node.record_type();
        let mut args: Vec<(&str, Value)> = Vec::with_capacity(ty.fields().len());
        for (field, value) in ty.fields().iter().zip(&node.values) {
            if !field.is_init() {
                continue;
            }
            let translated = match field.kind() {
                FieldKind::Child => translator.translate(value)?,
                FieldKind::Annotation | FieldKind::Internal => Some(value.clone()),
            };
            if let Some(translated) = translated {
                args.push((field.name(), translated));
            }
        }
        let mut rebuilt = ty.construct(args)?;
        if let (Some(old), Some(new)) = (node.node.as_ref(), rebuilt.node.as_mut()) {
            new.extra.clone_from(&old.extra);
        }
        Ok(rebuilt)
    })
}

/// Translate the elements of a container; leaves are copied.
pub fn translate_children<T: Translator + ?Sized>(
    translator: &mut T,
    value: &Value,
) -> Result<Option<Value>, ValueError> {
    ensure_sufficient_stack(|| {
        let translated = match value {
            Value::List(items) => Value::List(translate_all(translator, items)?),
            Value::Tuple(items) => Value::Tuple(translate_all(translator, items)?),
            Value::Set(items) => {
                let mut out = IndexSet::with_capacity(items.len());
                for item in items {
                    if let Some(item) = translator.translate(item)? {
                        item.ensure_hashable()?;
                        out.insert(item);
                    }
                }
                Value::Set(out)
            }
            Value::Map(entries) => {
                let mut out = IndexMap::with_capacity(entries.len());
                for (key, item) in entries {
                    if let Some(item) = translator.translate(item)? {
                        out.insert(key.clone(), item);
                    }
                }
                Value::Map(out)
            }
            other => other.clone(),
        };
        Ok(Some(translated))
    })
}

fn translate_all<T: Translator + ?Sized>(translator: &mut T, items: &[Value]) -> Result<Vec<Value>, ValueError> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if let Some(item) = translator.translate(item)? {
            out.push(item);
        }
    }
    Ok(out)
}

/// A unit of analysis or rewriting applied to a tree root.
pub trait Pass {
    type Output;

    fn apply(&mut self, root: &Value) -> Self::Output;
}
