//! Field declarations and descriptors.
//!
//! [`Field`] is what users write when declaring a record type; the builder
//! turns each one into a [`FieldDescriptor`] after checking it. Descriptors
//! are immutable and shared by every instance of the record type.
//!
//! # Naming convention (node types)
//!
//! - `name_attr_`: data annotation, not a child, excluded from equality
//! - `name_`: internal field
//! - anything else: child

mod coerce;


use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use crate::types::TypeDesc;
use crate::value::Value;

pub(crate) use coerce::coerce;

/// Suffix marking a data annotation field.
pub const ANNOTATION_SUFFIX: &str = "_attr_";

/// Suffix marking an internal field.
pub const INTERNAL_SUFFIX: &str = "_";

/// Produces a fresh default value per instance.
pub type Factory = Arc<dyn Fn() -> Value + Send + Sync>;

/// Converts a raw argument before validation.
pub type Converter = Arc<dyn Fn(Value) -> Result<Value, String> + Send + Sync>;

/// Extra check run after the type validator.
pub type FieldValidator = Arc<dyn Fn(&FieldDescriptor, &Value) -> Result<(), String> + Send + Sync>;

bitflags! {
    /// Per-field participation flags.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct FieldFlags: u8 {
        /// Accepted by the constructor.
        const INIT = 1 << 0;
        /// Compared by equality.
        const EQ = 1 << 1;
        /// Compared by ordering.
        const ORDER = 1 << 2;
        /// Contributes to the hash.
        const HASH = 1 << 3;
        /// Shown in the textual representation.
        const REPR = 1 << 4;
    }
}

impl Default for FieldFlags {
    fn default() -> Self {
        FieldFlags::all()
    }
}

/// Role of a node field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Child,
    Annotation,
    Internal,
}

impl FieldKind {
    /// Classify by naming convention.
    pub fn classify(name: &str) -> Self {
        if name.ends_with(ANNOTATION_SUFFIX) {
            FieldKind::Annotation
        } else if name.ends_with(INTERNAL_SUFFIX) {
            FieldKind::Internal
        } else {
            FieldKind::Child
        }
    }
}

/// Field declaration.
#[derive(Clone)]
pub struct Field {
    pub(crate) name: String,
    pub(crate) ty: Option<TypeDesc>,
    pub(crate) default: Option<Value>,
    pub(crate) factory: Option<Factory>,
    pub(crate) converter: Option<Converter>,
    pub(crate) auto_convert: bool,
    pub(crate) flags: FieldFlags,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeDesc) -> Self {
        Field {
            ty: Some(ty),
            ..Field::untyped(name)
        }
    }

    /// Declaration without a type. Rejected at build time unless a type is
    /// set with [`Field::ty`].
    pub fn untyped(name: impl Into<String>) -> Self {
        Field {
            name: name.into(),
            ty: None,
            default: None,
            factory: None,
            converter: None,
            auto_convert: false,
            flags: FieldFlags::default(),
        }
    }

    #[must_use]
    pub fn ty(mut self, ty: TypeDesc) -> Self {
        self.ty = Some(ty);
        self
    }

    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub fn default_factory(mut self, factory: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.factory = Some(Arc::new(factory));
        self
    }

    #[must_use]
    pub fn converter(
        mut self,
        converter: impl Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        self.converter = Some(Arc::new(converter));
        self
    }

    /// Coerce scalar arguments to the declared type before validation.
    #[must_use]
    pub fn auto_convert(mut self) -> Self {
        self.auto_convert = true;
        self
    }

    /// Exclude from the constructor. Needs a default.
    #[must_use]
    pub fn no_init(mut self) -> Self {
        self.flags.remove(FieldFlags::INIT);
        self
    }

    /// Exclude from equality, ordering and hashing.
    #[must_use]
    pub fn no_compare(mut self) -> Self {
        self.flags.remove(FieldFlags::EQ | FieldFlags::ORDER | FieldFlags::HASH);
        self
    }

    #[must_use]
    pub fn hash(mut self, enabled: bool) -> Self {
        self.flags.set(FieldFlags::HASH, enabled);
        self
    }

    #[must_use]
    pub fn no_repr(mut self) -> Self {
        self.flags.remove(FieldFlags::REPR);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("ty", &self.ty.as_ref().map(ToString::to_string))
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

/// Default of a built field.
#[derive(Clone)]
pub enum FieldDefault {
    Required,
    Value(Value),
    Factory(Factory),
}

impl FieldDefault {
    pub fn is_required(&self) -> bool {
        matches!(self, FieldDefault::Required)
    }

    pub(crate) fn produce(&self) -> Option<Value> {
        match self {
            FieldDefault::Required => None,
            FieldDefault::Value(v) => Some(v.clone()),
            FieldDefault::Factory(f) => Some(f()),
        }
    }
}

/// Built, immutable field.
#[derive(Clone)]
pub struct FieldDescriptor {
    pub(crate) name: String,
    pub(crate) ty: TypeDesc,
    pub(crate) default: FieldDefault,
    pub(crate) converter: Option<Converter>,
    pub(crate) auto_convert: bool,
    pub(crate) validators: Vec<FieldValidator>,
    pub(crate) flags: FieldFlags,
    pub(crate) kind: FieldKind,
}

impl FieldDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeDesc {
        &self.ty
    }

    pub fn default(&self) -> &FieldDefault {
        &self.default
    }

    pub fn flags(&self) -> FieldFlags {
        self.flags
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn validators(&self) -> usize {
        self.validators.len()
    }

    pub fn is_init(&self) -> bool {
        self.flags.contains(FieldFlags::INIT)
    }

    /// Apply the field's conversion to a raw argument. Automatic coercion
    /// targets the current type, so specialized fields coerce to their
    /// bound arguments.
    pub(crate) fn convert(&self, value: Value) -> Result<Value, String> {
        match &self.converter {
            Some(convert) => convert(value),
            None if self.auto_convert => coerce(&self.ty, value),
            None => Ok(value),
        }
    }

    pub(crate) fn converts(&self) -> bool {
        self.converter.is_some() || self.auto_convert
    }

    /// Copy with a different type, used by the generic specializer.
    pub(crate) fn with_type(&self, ty: TypeDesc) -> Self {
        FieldDescriptor {
            ty,
            ..self.clone()
        }
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("ty", &self.ty.to_string())
            .field("kind", &self.kind)
            .field("flags", &self.flags)
            .field("validators", &self.validators.len())
            .finish_non_exhaustive()
    }
}
