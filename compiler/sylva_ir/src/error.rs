//! Error types.
//!
//! Two classes of failures exist:
//! - [`DefinitionError`]: a schema, type description or generic application
//!   is malformed. Raised while building types, before any instance exists.
//! - [`ValueError`]: a concrete value does not satisfy its declaration.
//!   Always names the offending record/field and the received value.
//!
//! [`Rejection`] is the structural reason produced by the type validators and
//! carried inside [`ValueError::TypeMismatch`].

use thiserror::Error;

/// Malformed declaration.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum DefinitionError {
    #[error("field `{field}` of `{record}` has no type description")]
    MissingType { record: String, field: String },

    #[error("field `{field}` is declared twice in `{record}`")]
    DuplicateField { record: String, field: String },

    #[error("field `{field}` of `{record}` specifies both a default value and a default factory")]
    ConflictingDefault { record: String, field: String },

    #[error("field `{field}` of `{record}` is excluded from the constructor but has no default")]
    NoInitWithoutDefault { record: String, field: String },

    #[error("field `{field}` of `{record}` takes part in hashing but not in equality")]
    HashWithoutEq { record: String, field: String },

    #[error("validator assigned to non-existing field `{field}` in `{record}`")]
    UnknownValidatorField { record: String, field: String },

    #[error("invalid type description for field `{field}` of `{record}`: {reason}")]
    InvalidType {
        record: String,
        field: String,
        reason: String,
    },

    #[error("`{record}` expects {expected} type argument(s), got {found}")]
    GenericArity {
        record: String,
        expected: usize,
        found: usize,
    },

    #[error("`{record}` is not a generic record type")]
    NotGeneric { record: String },

    #[error("type parameter `{param}` is declared twice in `{record}`")]
    DuplicateTypeParam { record: String, param: String },

    #[error("invalid type argument for `{record}`: {reason}")]
    InvalidTypeArgument { record: String, reason: String },

    #[error("`{record}` declares a symbol table but is not a node type")]
    ScopeNotNode { record: String },

    #[error("invalid symbol name pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Structural reason a value does not match a type description.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum Rejection {
    #[error("expected {expected}, got {found} `{value}`")]
    Mismatch {
        expected: String,
        found: String,
        value: String,
    },

    #[error("`{value}` fails for all the alternatives of {expected}")]
    NoAlternative { expected: String, value: String },

    #[error("`{value}` does not match {expected}")]
    Literal { expected: String, value: String },

    #[error("`{value}` does not match symbol pattern `{pattern}`")]
    SymbolPattern { pattern: String, value: String },

    #[error("tuple contains {found} elements instead of {expected} (mismatch at index {index})")]
    Arity {
        expected: usize,
        found: usize,
        index: usize,
    },

    #[error("invalid value at index {index}: {reason}")]
    Element { index: usize, reason: Box<Rejection> },

    #[error("invalid key `{key}`: {reason}")]
    Key { key: String, reason: Box<Rejection> },

    #[error("invalid value for key `{key}`: {reason}")]
    Entry { key: String, reason: Box<Rejection> },
}

impl Rejection {
    /// Position of the offending element, for tuple and sequence rejections.
    pub fn index(&self) -> Option<usize> {
        match self {
            Rejection::Arity { index, .. } | Rejection::Element { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Value that does not satisfy its declaration.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ValueError {
    #[error("in `{record}.{field}` validation, got `{value}`: {reason}")]
    TypeMismatch {
        record: String,
        field: String,
        value: String,
        reason: Rejection,
    },

    #[error("in `{record}.{field}` validation, `{value}` was rejected: {message}")]
    ValidatorFailed {
        record: String,
        field: String,
        value: String,
        message: String,
    },

    #[error("`{record}` instance failed validation: {message}")]
    RootValidatorFailed { record: String, message: String },

    #[error("missing required argument `{field}` for `{record}`")]
    MissingField { record: String, field: String },

    #[error("`{record}` got an unexpected argument `{field}`")]
    UnexpectedArgument { record: String, field: String },

    #[error("argument `{field}` passed twice to `{record}`")]
    DuplicateArgument { record: String, field: String },

    #[error("trying to instantiate abstract type `{record}`")]
    NotInstantiable { record: String },

    #[error("trying to modify field `{field}` of a frozen `{record}` instance")]
    Frozen { record: String, field: String },

    #[error("`{record}` has no field `{field}`")]
    UnknownField { record: String, field: String },

    #[error("symbol `{name}` is declared more than once in `{scope}` scope")]
    DuplicateSymbol { name: String, scope: String },

    #[error("unhashable value `{value}` used as set element or mapping key")]
    Unhashable { value: String },

    #[error("cannot convert `{value}` for `{record}.{field}`: {message}")]
    ConversionFailed {
        record: String,
        field: String,
        value: String,
        message: String,
    },

    #[error("`{left}` and `{right}` cannot be ordered")]
    Unordered { left: String, right: String },
}

impl ValueError {
    /// Name of the field the error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValueError::TypeMismatch { field, .. }
            | ValueError::ValidatorFailed { field, .. }
            | ValueError::MissingField { field, .. }
            | ValueError::UnexpectedArgument { field, .. }
            | ValueError::DuplicateArgument { field, .. }
            | ValueError::Frozen { field, .. }
            | ValueError::UnknownField { field, .. }
            | ValueError::ConversionFailed { field, .. } => Some(field),
            _ => None,
        }
    }
}
