//! Tree traversal.
//!
//! Walks node trees in pre-order, post-order or breadth-first order, yielding
//! every reachable item once: nodes, the containers between them and the
//! leaf values in child fields.
//!
//! # Children
//!
//! - node records: child fields, keyed by field name (annotations and
//!   internal fields are not children)
//! - tuples and lists: elements, keyed by index
//! - sets: elements, keyed by the element itself
//! - mappings: values, keyed by their key
//! - everything else, including strings, bytes and plain data records: none
//!
//! # Design
//!
//! Traversals are pull-based cursors over an explicit frontier (a stack for
//! the depth-first orders, a queue for breadth-first), so depth is bounded by
//! heap, not by the call stack. A traversal is consumed as it is iterated.

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;

use std::collections::VecDeque;
use std::fmt;

use smallvec::SmallVec;

use crate::model::RecordTypeRef;
use crate::record::Record;
use crate::types::TypeDesc;
use crate::value::{Value, ValueRef};

/// Visiting order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TraversalOrder {
    #[default]
    PreOrder,
    PostOrder,
    BreadthFirst,
}

/// Position of an item within its parent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TreeKey<'a> {
    Field(&'a str),
    Index(usize),
    Key(&'a Value),
}

impl fmt::Display for TreeKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeKey::Field(name) => f.write_str(name),
            TreeKey::Index(index) => write!(f, "{index}"),
            TreeKey::Key(key) => write!(f, "{key}"),
        }
    }
}

/// Children buffer; most nodes have few children.
pub type Children<'a> = SmallVec<[(TreeKey<'a>, ValueRef<'a>); 4]>;

/// Direct children of `item`, in order.
pub fn children_of(item: ValueRef<'_>) -> Children<'_> {
    match item {
        ValueRef::Record(record) if record.is_node() => record
            .children()
            .map(|(name, value)| (TreeKey::Field(name), ValueRef::from(value)))
            .collect(),
        ValueRef::Record(_) => SmallVec::new(),
        ValueRef::Value(value) => match value {
            Value::Tuple(items) | Value::List(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| (TreeKey::Index(i), ValueRef::from(v)))
                .collect(),
            Value::Set(items) => items
                .iter()
                .map(|v| (TreeKey::Key(v), ValueRef::from(v)))
                .collect(),
            Value::Map(entries) => entries
                .iter()
                .map(|(k, v)| (TreeKey::Key(k), ValueRef::from(v)))
                .collect(),
            _ => SmallVec::new(),
        },
    }
}

struct Frame<'a> {
    key: Option<TreeKey<'a>>,
    item: ValueRef<'a>,
    expanded: bool,
}

enum Frontier<'a> {
    Stack(Vec<Frame<'a>>),
    Queue(VecDeque<Frame<'a>>),
}

/// Keyed traversal cursor. Yields `(key, item)`; the root has no key.
pub struct Traverse<'a> {
    order: TraversalOrder,
    frontier: Frontier<'a>,
}

impl<'a> Traverse<'a> {
    pub fn new(root: impl Into<ValueRef<'a>>, order: TraversalOrder) -> Self {
        let root = Frame {
            key: None,
            item: root.into(),
            expanded: false,
        };
        let frontier = match order {
            TraversalOrder::BreadthFirst => Frontier::Queue(VecDeque::from([root])),
            TraversalOrder::PreOrder | TraversalOrder::PostOrder => Frontier::Stack(vec![root]),
        };
        Traverse { order, frontier }
    }

    /// Drop keys, yielding items only.
    pub fn items(self) -> Items<'a> {
        Items(self)
    }

    fn push_children(stack: &mut Vec<Frame<'a>>, item: ValueRef<'a>) {
        stack.extend(children_of(item).into_iter().rev().map(|(key, child)| Frame {
            key: Some(key),
            item: child,
            expanded: false,
        }));
    }
}

impl<'a> Iterator for Traverse<'a> {
    type Item = (Option<TreeKey<'a>>, ValueRef<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        match (&mut self.frontier, self.order) {
            (Frontier::Queue(queue), _) => {
                let frame = queue.pop_front()?;
                queue.extend(children_of(frame.item).into_iter().map(|(key, child)| Frame {
                    key: Some(key),
                    item: child,
                    expanded: false,
                }));
                Some((frame.key, frame.item))
            }
            (Frontier::Stack(stack), TraversalOrder::PostOrder) => loop {
                let frame = stack.pop()?;
                if frame.expanded {
                    return Some((frame.key, frame.item));
                }
                let item = frame.item;
                stack.push(Frame {
                    expanded: true,
                    ..frame
                });
                Traverse::push_children(stack, item);
            },
            (Frontier::Stack(stack), _) => {
                let frame = stack.pop()?;
                Traverse::push_children(stack, frame.item);
                Some((frame.key, frame.item))
            }
        }
    }
}

/// Item-only traversal, see [`Traverse::items`].
pub struct Items<'a>(Traverse<'a>);

impl<'a> Iterator for Items<'a> {
    type Item = ValueRef<'a>;

    fn next(&mut self) -> Option<ValueRef<'a>> {
        self.0.next().map(|(_, item)| item)
    }
}

/// Items reachable from `root`, root included.
pub fn traverse<'a>(root: impl Into<ValueRef<'a>>, order: TraversalOrder) -> Items<'a> {
    Traverse::new(root, order).items()
}

/// Items reachable from `root` with their keys within their parents.
pub fn traverse_with_keys<'a>(root: impl Into<ValueRef<'a>>, order: TraversalOrder) -> Traverse<'a> {
    Traverse::new(root, order)
}

/// Items of `root`'s tree satisfying `ty`.
pub struct Select<'a, 't> {
    items: Items<'a>,
    ty: &'t TypeDesc,
}

impl<'a> Iterator for Select<'a, '_> {
    type Item = ValueRef<'a>;

    fn next(&mut self) -> Option<ValueRef<'a>> {
        let ty = self.ty;
        self.items.by_ref().find(|item| item.is_instance(ty))
    }
}

/// Traverse and keep items satisfying `ty`.
pub fn select<'a, 't>(root: impl Into<ValueRef<'a>>, order: TraversalOrder, ty: &'t TypeDesc) -> Select<'a, 't> {
    Select {
        items: traverse(root, order),
        ty,
    }
}

/// Records of `root`'s tree that are instances of `ty`.
pub fn select_records<'a, 't>(
    root: impl Into<ValueRef<'a>>,
    order: TraversalOrder,
    ty: &'t RecordTypeRef,
) -> impl Iterator<Item = &'a Record> + 't
where
    'a: 't,
{
    traverse(root, order)
        .filter_map(ValueRef::as_record)
        .filter(move |record| record.is_instance_of(ty))
}
