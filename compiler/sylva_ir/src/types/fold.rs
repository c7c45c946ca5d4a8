//! Structural folding over type descriptions.

use rustc_hash::FxHashMap;

use super::{TypeDesc, TypeVar};

/// Generate fold methods for single-inner containers.
macro_rules! impl_single_inner_fold {
    ($( ($method:ident, $variant:ident, $doc:literal) ),+ $(,)?) => {
        $(
            #[doc = $doc]
            fn $method(&mut self, inner: &TypeDesc) -> TypeDesc {
                TypeDesc::$variant(Box::new(self.fold(inner)))
            }
        )+
    };
}

/// Transform type descriptions by structural recursion.
///
/// The default `fold` dispatches to the `fold_*` methods, which rebuild the
/// description from folded parts. Override the ones you need.
pub trait TypeFolder {
    fn fold(&mut self, ty: &TypeDesc) -> TypeDesc {
        match ty {
            TypeDesc::TypeVar(var) => self.fold_var(var),
            TypeDesc::Optional(inner) => self.fold_optional(inner),
            TypeDesc::Sequence(inner) => self.fold_sequence(inner),
            TypeDesc::Set(inner) => self.fold_set(inner),
            TypeDesc::Union(items) => TypeDesc::Union(items.iter().map(|t| self.fold(t)).collect()),
            TypeDesc::Tuple(items) => TypeDesc::Tuple(items.iter().map(|t| self.fold(t)).collect()),
            TypeDesc::Mapping(key, value) => self.fold_mapping(key, value),
            TypeDesc::Generic(base, args) => {
                TypeDesc::Generic(base.clone(), args.iter().map(|a| self.fold(a)).collect())
            }
            TypeDesc::Any
            | TypeDesc::Primitive(_)
            | TypeDesc::Literal(_)
            | TypeDesc::Enum(_)
            | TypeDesc::Record(_) => ty.clone(),
        }
    }

    /// Fold a type variable. Default keeps it.
    fn fold_var(&mut self, var: &TypeVar) -> TypeDesc {
        TypeDesc::TypeVar(var.clone())
    }

    impl_single_inner_fold!(
        (fold_optional, Optional, "Fold an optional type. Default folds the inner type."),
        (fold_sequence, Sequence, "Fold a sequence type. Default folds the element type."),
        (fold_set, Set, "Fold a set type. Default folds the element type."),
    );

    /// Fold a mapping type. Default folds key and value types.
    fn fold_mapping(&mut self, key: &TypeDesc, value: &TypeDesc) -> TypeDesc {
        TypeDesc::Mapping(Box::new(self.fold(key)), Box::new(self.fold(value)))
    }
}

/// Replaces type variables by name.
pub(crate) struct Substitution<'a> {
    bindings: FxHashMap<&'a str, &'a TypeDesc>,
}

impl<'a> Substitution<'a> {
    pub(crate) fn new(params: &'a [TypeVar], args: &'a [TypeDesc]) -> Self {
        Substitution {
            bindings: params.iter().map(TypeVar::name).zip(args).collect(),
        }
    }
}

impl TypeFolder for Substitution<'_> {
    fn fold_var(&mut self, var: &TypeVar) -> TypeDesc {
        match self.bindings.get(var.name()) {
            Some(bound) => (*bound).clone(),
            None => TypeDesc::TypeVar(var.clone()),
        }
    }
}
