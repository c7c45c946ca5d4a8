//! Structural type descriptions for record fields.
//!
//! A [`TypeDesc`] describes the shape a field value must have. It is checked
//! for well-formedness when the owning record type is built
//! ([`TypeDesc::check`]) and matched against values by [`crate::validate`].
//!
//! # Design
//!
//! Type descriptions are plain data: `Clone + Eq + Hash`, so the generic
//! specializer can key its cache on argument lists. Record and enumeration
//! references compare by identity; symbol patterns compare by their source.

mod fold;
mod symbol;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;

use std::fmt;
use std::sync::Arc;

use crate::error::DefinitionError;
use crate::model::RecordTypeRef;
use crate::value::{EnumTypeRef, EnumValue, Value};

pub use fold::TypeFolder;
pub(crate) use fold::Substitution;
pub use symbol::SymbolPattern;

/// Scalar field types.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    None,
    Bool,
    Int,
    Float,
    Str,
    Bytes,
    /// A string naming a declared symbol, matching a pattern.
    SymbolName(SymbolPattern),
    /// A string referring to a symbol declared elsewhere.
    SymbolRef,
}

/// A value allowed by a literal type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Literal {
    None,
    Bool(bool),
    Int(i64),
    Str(String),
    Bytes(Vec<u8>),
    Enum(EnumValue),
}

impl Literal {
    /// Booleans match by identity, everything else by equality. With a
    /// strict value model both reduce to a variant-wise comparison.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Literal::None, Value::None) => true,
            (Literal::Bool(a), Value::Bool(b)) => a == b,
            (Literal::Int(a), Value::Int(b)) => a == b,
            (Literal::Str(a), Value::Str(b)) => a == b,
            (Literal::Bytes(a), Value::Bytes(b)) => a == b,
            (Literal::Enum(a), Value::Enum(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

impl From<i64> for Literal {
    fn from(i: i64) -> Self {
        Literal::Int(i)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::Str(s.to_owned())
    }
}

impl From<EnumValue> for Literal {
    fn from(e: EnumValue) -> Self {
        Literal::Enum(e)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::None => f.write_str("None"),
            Literal::Bool(true) => f.write_str("True"),
            Literal::Bool(false) => f.write_str("False"),
            Literal::Int(i) => write!(f, "{i}"),
            Literal::Str(s) => write!(f, "'{s}'"),
            Literal::Bytes(b) => write!(f, "b'{}'", b.escape_ascii()),
            Literal::Enum(e) => write!(f, "{e}"),
        }
    }
}

/// A type variable, optionally bounded.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeVar {
    name: Arc<str>,
    bound: Option<Box<TypeDesc>>,
}

impl TypeVar {
    pub fn new(name: &str) -> Self {
        TypeVar {
            name: Arc::from(name),
            bound: None,
        }
    }

    pub fn bounded(name: &str, bound: TypeDesc) -> Self {
        TypeVar {
            name: Arc::from(name),
            bound: Some(Box::new(bound)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bound(&self) -> Option<&TypeDesc> {
        self.bound.as_deref()
    }
}

/// Field type description.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeDesc {
    Any,
    Primitive(Primitive),
    Literal(Vec<Literal>),
    Optional(Box<TypeDesc>),
    Union(Vec<TypeDesc>),
    Tuple(Vec<TypeDesc>),
    Sequence(Box<TypeDesc>),
    Set(Box<TypeDesc>),
    Mapping(Box<TypeDesc>, Box<TypeDesc>),
    Enum(EnumTypeRef),
    Record(RecordTypeRef),
    TypeVar(TypeVar),
    /// Application of a generic record type to type arguments.
    Generic(RecordTypeRef, Vec<TypeDesc>),
}

impl TypeDesc {
    pub fn none() -> Self {
        TypeDesc::Primitive(Primitive::None)
    }

    pub fn bool() -> Self {
        TypeDesc::Primitive(Primitive::Bool)
    }

    pub fn int() -> Self {
        TypeDesc::Primitive(Primitive::Int)
    }

    pub fn float() -> Self {
        TypeDesc::Primitive(Primitive::Float)
    }

    pub fn str() -> Self {
        TypeDesc::Primitive(Primitive::Str)
    }

    pub fn bytes() -> Self {
        TypeDesc::Primitive(Primitive::Bytes)
    }

    /// Symbol name with the default identifier pattern.
    pub fn symbol_name() -> Self {
        TypeDesc::Primitive(Primitive::SymbolName(SymbolPattern::identifier()))
    }

    /// Symbol name constrained to a custom pattern.
    pub fn symbol_name_matching(pattern: &str) -> Result<Self, DefinitionError> {
        SymbolPattern::new(pattern).map(|p| TypeDesc::Primitive(Primitive::SymbolName(p)))
    }

    pub fn symbol_ref() -> Self {
        TypeDesc::Primitive(Primitive::SymbolRef)
    }

    pub fn literal<I: IntoIterator<Item = L>, L: Into<Literal>>(values: I) -> Self {
        TypeDesc::Literal(values.into_iter().map(Into::into).collect())
    }

    pub fn optional(inner: TypeDesc) -> Self {
        TypeDesc::Optional(Box::new(inner))
    }

    pub fn union<I: IntoIterator<Item = TypeDesc>>(alternatives: I) -> Self {
        TypeDesc::Union(alternatives.into_iter().collect())
    }

    pub fn tuple<I: IntoIterator<Item = TypeDesc>>(elements: I) -> Self {
        TypeDesc::Tuple(elements.into_iter().collect())
    }

    pub fn list(element: TypeDesc) -> Self {
        TypeDesc::Sequence(Box::new(element))
    }

    pub fn set(element: TypeDesc) -> Self {
        TypeDesc::Set(Box::new(element))
    }

    pub fn mapping(key: TypeDesc, value: TypeDesc) -> Self {
        TypeDesc::Mapping(Box::new(key), Box::new(value))
    }

    pub fn enumeration(ty: &EnumTypeRef) -> Self {
        TypeDesc::Enum(ty.clone())
    }

    pub fn record(ty: &RecordTypeRef) -> Self {
        TypeDesc::Record(ty.clone())
    }

    pub fn var(var: &TypeVar) -> Self {
        TypeDesc::TypeVar(var.clone())
    }

    pub fn generic<I: IntoIterator<Item = TypeDesc>>(base: &RecordTypeRef, args: I) -> Self {
        TypeDesc::Generic(base.clone(), args.into_iter().collect())
    }

    /// Whether the description is a symbol name, possibly optional.
    pub fn is_symbol_name(&self) -> bool {
        match self {
            TypeDesc::Primitive(Primitive::SymbolName(_)) => true,
            TypeDesc::Optional(inner) => inner.is_symbol_name(),
            _ => false,
        }
    }

    /// Type variables in order of first appearance.
    pub fn type_vars(&self) -> Vec<TypeVar> {
        let mut out = Vec::new();
        self.collect_type_vars(&mut out);
        out
    }

    pub(crate) fn collect_type_vars(&self, out: &mut Vec<TypeVar>) {
        match self {
            TypeDesc::TypeVar(var) => {
                if !out.iter().any(|v| v.name == var.name) {
                    out.push(var.clone());
                }
            }
            TypeDesc::Optional(inner) | TypeDesc::Sequence(inner) | TypeDesc::Set(inner) => {
                inner.collect_type_vars(out);
            }
            TypeDesc::Mapping(key, value) => {
                key.collect_type_vars(out);
                value.collect_type_vars(out);
            }
            TypeDesc::Union(items) | TypeDesc::Tuple(items) | TypeDesc::Generic(_, items) => {
                for item in items {
                    item.collect_type_vars(out);
                }
            }
            TypeDesc::Any
            | TypeDesc::Primitive(_)
            | TypeDesc::Literal(_)
            | TypeDesc::Enum(_)
            | TypeDesc::Record(_) => {}
        }
    }

    /// Whether the description contains no type variables.
    pub fn is_concrete(&self) -> bool {
        self.type_vars().is_empty()
    }

    /// Whether values of this type may be used as set elements or map keys.
    pub fn is_hashable(&self) -> bool {
        match self {
            TypeDesc::Sequence(_) | TypeDesc::Set(_) | TypeDesc::Mapping(..) => false,
            TypeDesc::Optional(inner) => inner.is_hashable(),
            TypeDesc::Union(items) | TypeDesc::Tuple(items) => items.iter().all(TypeDesc::is_hashable),
            TypeDesc::Record(ty) | TypeDesc::Generic(ty, _) => ty.is_hashable(),
            TypeDesc::Any
            | TypeDesc::Primitive(_)
            | TypeDesc::Literal(_)
            | TypeDesc::Enum(_)
            | TypeDesc::TypeVar(_) => true,
        }
    }

    /// Well-formedness check.
    ///
    /// `scope` lists the type variables that may appear; `None` accepts any
    /// type variable (used for partially concrete generic arguments).
    pub fn check(&self, scope: Option<&[TypeVar]>) -> Result<(), String> {
        match self {
            TypeDesc::Any | TypeDesc::Primitive(_) | TypeDesc::Enum(_) | TypeDesc::Record(_) => Ok(()),
            TypeDesc::Literal(values) if values.is_empty() => {
                Err("a literal type needs at least one value".to_owned())
            }
            TypeDesc::Literal(_) => Ok(()),
            TypeDesc::Union(items) if items.is_empty() => {
                Err("a union needs at least one alternative".to_owned())
            }
            TypeDesc::Union(items) | TypeDesc::Tuple(items) => {
                items.iter().try_for_each(|item| item.check(scope))
            }
            TypeDesc::Optional(inner) | TypeDesc::Sequence(inner) => inner.check(scope),
            TypeDesc::Set(element) => {
                element.check(scope)?;
                if element.is_hashable() {
                    Ok(())
                } else {
                    Err(format!("set element type `{element}` is not hashable"))
                }
            }
            TypeDesc::Mapping(key, value) => {
                key.check(scope)?;
                value.check(scope)?;
                if key.is_hashable() {
                    Ok(())
                } else {
                    Err(format!("mapping key type `{key}` is not hashable"))
                }
            }
            TypeDesc::TypeVar(var) => match scope {
                Some(vars) if !vars.iter().any(|v| v.name == var.name) => {
                    Err(format!("type variable `{}` is not a parameter of the record", var.name))
                }
                _ => Ok(()),
            },
            TypeDesc::Generic(base, args) => {
                if !base.is_generic() {
                    return Err(format!("`{}` is not a generic record type", base.name()));
                }
                if base.params().len() != args.len() {
                    return Err(format!(
                        "`{}` expects {} type argument(s), got {}",
                        base.name(),
                        base.params().len(),
                        args.len()
                    ));
                }
                args.iter().try_for_each(|arg| arg.check(scope))
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[TypeDesc]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Any => f.write_str("Any"),
            TypeDesc::Primitive(p) => match p {
                Primitive::None => f.write_str("None"),
                Primitive::Bool => f.write_str("bool"),
                Primitive::Int => f.write_str("int"),
                Primitive::Float => f.write_str("float"),
                Primitive::Str => f.write_str("str"),
                Primitive::Bytes => f.write_str("bytes"),
                Primitive::SymbolName(pattern) => write!(f, "SymbolName[{}]", pattern.as_str()),
                Primitive::SymbolRef => f.write_str("SymbolRef"),
            },
            TypeDesc::Literal(values) => {
                f.write_str("Literal[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
            TypeDesc::Optional(inner) => write!(f, "Optional[{inner}]"),
            TypeDesc::Union(items) => {
                f.write_str("Union[")?;
                write_list(f, items)?;
                f.write_str("]")
            }
            TypeDesc::Tuple(items) => {
                f.write_str("Tuple[")?;
                write_list(f, items)?;
                f.write_str("]")
            }
            TypeDesc::Sequence(inner) => write!(f, "List[{inner}]"),
            TypeDesc::Set(inner) => write!(f, "Set[{inner}]"),
            TypeDesc::Mapping(key, value) => write!(f, "Dict[{key}, {value}]"),
            TypeDesc::Enum(ty) => f.write_str(ty.name()),
            TypeDesc::Record(ty) => f.write_str(ty.name()),
            TypeDesc::TypeVar(var) => f.write_str(&var.name),
            TypeDesc::Generic(base, args) => {
                write!(f, "{}[", base.name())?;
                write_list(f, args)?;
                f.write_str("]")
            }
        }
    }
}
