//! Sylva IR - Typed Tree Node Framework
//!
//! This crate is the foundation every concrete IR is declared on:
//! - Values: a closed dynamic value model (`Value`, `ValueRef`)
//! - Type descriptions: structural field types (`TypeDesc`) and their validators
//! - Records: schema-driven, validated record types (`RecordBuilder`, `RecordType`, `Record`)
//! - Generics: type-variable parametrized records and their concretization
//! - Nodes: records with identity, child fields and data annotations
//! - Traversal: pre-order, post-order and breadth-first walks over node trees
//! - Symbol tables: per-scope name -> declaring node maps built at construction
//! - Visitors: type-dispatched visiting and tree translation
//! - Sequence utilities: chunking, striding, diffing and tree item filters
//!
//! # Design
//!
//! - **Explicit schemas**: record types are built from an explicit field table,
//!   never discovered by reflection. Building is two-phase: `RecordBuilder`
//!   collects declarations, `RecordBuilder::build` checks them and produces an
//!   immutable `RecordType` whose constructor validates every instance.
//! - **Explicit state**: node identities and the concretization cache live in a
//!   `Session` that every record type captures when it is built.
//! - **Single inheritance**: each record type keeps its ancestor chain, used for
//!   subtype checks and most-derived-first dispatch.

mod dispatch;
mod error;
mod field;
mod generic;
pub mod iter;
mod model;
mod node;
mod record;
mod session;
pub mod stack;
mod symtable;
pub mod traverse;
mod types;
mod validate;
mod value;
pub mod visitor;

pub use dispatch::DispatchTable;
pub use error::{DefinitionError, Rejection, ValueError};
pub use field::{
    Converter, Factory, Field, FieldDefault, FieldDescriptor, FieldFlags, FieldKind,
    FieldValidator, ANNOTATION_SUFFIX, INTERNAL_SUFFIX,
};
pub use generic::concretize;
pub use iter::{TreeItems, XIter};
pub use model::{ModelFlags, RecordBuilder, RecordKind, RecordType, RecordTypeRef, RootValidator, Specialization};
pub use node::NodeId;
pub use record::Record;
pub use session::{Session, SharedSession};
pub use symtable::SymbolTable;
pub use traverse::{children_of, select, select_records, traverse, traverse_with_keys, TraversalOrder, TreeKey};
pub use types::{Literal, Primitive, SymbolPattern, TypeDesc, TypeFolder, TypeVar};
pub use validate::validate;
pub use value::{EnumType, EnumTypeRef, EnumValue, Value, ValueRef};
pub use visitor::{Pass, Translator, Visitor};
