//! Record types.
//!
//! A [`RecordType`] is the built, immutable schema of a record: its ordered
//! field table, root validators, flags, ancestor chain and (for generics)
//! its type parameters. Types are handled through [`RecordTypeRef`], a cheap
//! shared handle compared by identity.
//!
//! # Design
//!
//! - **Two phases**: [`RecordBuilder`] collects declarations and checks them
//!   once in `build`; the instance constructor (`construct`) then only runs
//!   value-level checks.
//! - **Inheritance**: a derived type copies its parent's field table and
//!   replaces redefined fields in place, so field order is always
//!   ancestors-first. Root validators accumulate the same way.

mod builder;
mod construct;


use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use bitflags::bitflags;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::field::FieldDescriptor;
use crate::record::Record;
use crate::session::SharedSession;
use crate::types::{TypeDesc, TypeVar};

pub use builder::RecordBuilder;

/// Whole-instance check run after all field validators.
pub type RootValidator = Arc<dyn Fn(&Record) -> Result<(), String> + Send + Sync>;

bitflags! {
    /// Record type options.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct ModelFlags: u8 {
        /// Field assignment after construction is rejected.
        const FROZEN = 1 << 0;
        /// Instances may be set elements and mapping keys.
        const HASHABLE = 1 << 1;
        /// Instances support ordering comparisons.
        const ORDERED = 1 << 2;
        /// The type cannot be instantiated.
        const ABSTRACT = 1 << 3;
        /// Instances collect a symbol table at construction.
        const SYMBOL_SCOPE = 1 << 4;
    }
}

/// Plain data record or tree node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Model,
    Node,
}

/// A generic type applied to arguments.
#[derive(Clone, Debug)]
pub struct Specialization {
    pub generic: RecordTypeRef,
    pub args: Vec<TypeDesc>,
}

/// Built record schema.
pub struct RecordType {
    pub(crate) name: String,
    pub(crate) kind: RecordKind,
    pub(crate) flags: ModelFlags,
    pub(crate) params: Vec<TypeVar>,
    pub(crate) fields: Vec<FieldDescriptor>,
    pub(crate) index: FxHashMap<String, usize>,
    pub(crate) root_validators: Vec<RootValidator>,
    /// Nearest first.
    pub(crate) ancestors: SmallVec<[RecordTypeRef; 4]>,
    pub(crate) origin: Option<Specialization>,
    pub(crate) session: SharedSession,
}

impl RecordType {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn flags(&self) -> ModelFlags {
        self.flags
    }

    pub fn is_node(&self) -> bool {
        self.kind == RecordKind::Node
    }

    pub fn is_frozen(&self) -> bool {
        self.flags.contains(ModelFlags::FROZEN)
    }

    pub fn is_hashable(&self) -> bool {
        self.flags.contains(ModelFlags::HASHABLE)
    }

    pub fn is_ordered(&self) -> bool {
        self.flags.contains(ModelFlags::ORDERED)
    }

    pub fn is_abstract(&self) -> bool {
        self.flags.contains(ModelFlags::ABSTRACT)
    }

    pub fn is_instantiable(&self) -> bool {
        !self.is_abstract()
    }

    pub fn is_symbol_scope(&self) -> bool {
        self.flags.contains(ModelFlags::SYMBOL_SCOPE)
    }

    /// Whether the type still has unbound type parameters.
    pub fn is_generic(&self) -> bool {
        !self.params.is_empty()
    }

    pub fn params(&self) -> &[TypeVar] {
        &self.params
    }

    /// Full field table, inherited fields first.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.field_index(name).map(|i| &self.fields[i])
    }

    pub(crate) fn field_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn root_validators(&self) -> usize {
        self.root_validators.len()
    }

    /// Ancestor chain, nearest first.
    pub fn ancestors(&self) -> &[RecordTypeRef] {
        &self.ancestors
    }

    pub fn parent(&self) -> Option<&RecordTypeRef> {
        self.ancestors.first()
    }

    /// The generic this type was concretized from, with its arguments.
    pub fn specialization(&self) -> Option<&Specialization> {
        self.origin.as_ref()
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    /// Own name followed by ancestor names, nearest first.
    pub fn lineage(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.ancestors.iter().map(|a| a.name()))
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordType")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("flags", &self.flags)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// Shared handle to a [`RecordType`], compared and hashed by identity.
#[derive(Clone)]
pub struct RecordTypeRef(pub(crate) Arc<RecordType>);

impl RecordTypeRef {
    /// Whether `self` is `other` or derives from it.
    pub fn is_subtype_of(&self, other: &RecordTypeRef) -> bool {
        self == other || self.ancestors.iter().any(|a| a == other)
    }

    pub fn ptr_eq(&self, other: &RecordTypeRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for RecordTypeRef {
    type Target = RecordType;

    fn deref(&self) -> &RecordType {
        &self.0
    }
}

impl PartialEq for RecordTypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for RecordTypeRef {}

impl Hash for RecordTypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

impl fmt::Debug for RecordTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.name)
    }
}

impl fmt::Display for RecordTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
