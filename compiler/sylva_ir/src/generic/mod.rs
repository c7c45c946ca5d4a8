//! Generic record specialization.
//!
//! [`concretize`] applies a generic record type to type arguments and
//! returns the specialized type. Results are cached per session on
//! `(generic, args)`, so equal applications yield the identical type.
//!
//! # Design
//!
//! - The specialized type derives from its generic: instances of
//!   `Node[int]` are instances of `Node`.
//! - Field types are substituted structurally. Nested applications
//!   (`Generic(Other, [T])`) keep their substituted arguments and are not
//!   concretized eagerly, which keeps self-referential shapes finite.
//! - Arguments that are still type variables become the parameters of the
//!   specialized type (partial concretization). Applying such a type again
//!   composes the arguments and concretizes the original generic.

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;

use std::sync::Arc;

use smallvec::SmallVec;

use crate::error::DefinitionError;
use crate::model::{RecordType, RecordTypeRef, Specialization};
use crate::session::SpecializationKey;
use crate::types::{Substitution, TypeDesc, TypeFolder, TypeVar};

/// Apply `generic` to `args`.
pub fn concretize(generic: &RecordTypeRef, args: &[TypeDesc]) -> Result<RecordTypeRef, DefinitionError> {
    generic.concretize(args)
}

impl RecordTypeRef {
    /// Apply this generic type to `args`, reusing the session's cached
    /// specialization when one exists.
    #[tracing::instrument(level = "debug", skip_all, fields(generic = %self.name))]
    pub fn concretize(&self, args: &[TypeDesc]) -> Result<RecordTypeRef, DefinitionError> {
        if !self.is_generic() {
            return Err(DefinitionError::NotGeneric {
                record: self.name.clone(),
            });
        }
        if args.len() != self.params.len() {
            return Err(DefinitionError::GenericArity {
                record: self.name.clone(),
                expected: self.params.len(),
                found: args.len(),
            });
        }
        for arg in args {
            arg.check(None)
                .map_err(|reason| DefinitionError::InvalidTypeArgument {
                    record: self.name.clone(),
                    reason,
                })?;
        }

        // Re-applying a partial specialization composes onto the root generic,
        // so `Pair[int, U][str]` is `Pair[int, str]`.
        if let Some(origin) = &self.origin {
            let mut substitution = Substitution::new(&self.params, args);
            let composed: Vec<TypeDesc> = origin.args.iter().map(|arg| substitution.fold(arg)).collect();
            return origin.generic.concretize(&composed);
        }

        let key = SpecializationKey {
            generic: self.clone(),
            args: args.to_vec(),
        };
        if let Some(cached) = self.session.specializations.read().get(&key) {
            tracing::trace!(specialization = %cached.name, "cache hit");
            return Ok(cached.clone());
        }

        let specialized = self.specialize(args)?;
        let mut cache = self.session.specializations.write();
        let entry = cache.entry(key).or_insert(specialized);
        tracing::debug!(specialization = %entry.name, "concretized");
        Ok(entry.clone())
    }

    fn specialize(&self, args: &[TypeDesc]) -> Result<RecordTypeRef, DefinitionError> {
        let name = format!(
            "{}[{}]",
            self.name,
            args.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
        );

        let mut params: Vec<TypeVar> = Vec::new();
        for arg in args {
            arg.collect_type_vars(&mut params);
        }

        let mut substitution = Substitution::new(&self.params, args);
        let mut fields = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let ty = substitution.fold(field.ty());
            ty.check(Some(&params))
                .map_err(|reason| DefinitionError::InvalidType {
                    record: name.clone(),
                    field: field.name().to_owned(),
                    reason,
                })?;
            fields.push(field.with_type(ty));
        }

        let ancestors: SmallVec<[RecordTypeRef; 4]> = std::iter::once(self.clone())
            .chain(self.ancestors.iter().cloned())
            .collect();

        Ok(RecordTypeRef(Arc::new(RecordType {
            name,
            kind: self.kind,
            flags: self.flags,
            params,
            fields,
            index: self.index.clone(),
            root_validators: self.root_validators.clone(),
            ancestors,
            origin: Some(Specialization {
                generic: self.clone(),
                args: args.to_vec(),
            }),
            session: Arc::clone(&self.session),
        })))
    }
}
