//! Two-phase construction of record types.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::error::DefinitionError;
use crate::field::{Field, FieldDefault, FieldDescriptor, FieldFlags, FieldKind, FieldValidator};
use crate::record::Record;
use crate::session::SharedSession;
use crate::types::TypeVar;
use crate::value::Value;

use super::{ModelFlags, RecordKind, RecordType, RecordTypeRef, RootValidator};

/// Collects the declaration of a record type.
///
/// ```text
/// let name = RecordBuilder::node(&session, "Name")
///     .field(Field::new("name", TypeDesc::symbol_name()))
///     .frozen(true)
///     .build()?;
/// ```
pub struct RecordBuilder {
    session: SharedSession,
    name: String,
    kind: RecordKind,
    parent: Option<RecordTypeRef>,
    params: Vec<TypeVar>,
    fields: Vec<Field>,
    validators: Vec<(String, FieldValidator)>,
    root_validators: Vec<RootValidator>,
    frozen: Option<bool>,
    hashable: Option<bool>,
    ordered: Option<bool>,
    is_abstract: bool,
    symbol_scope: bool,
}

impl RecordBuilder {
    /// Declare a plain data record type.
    pub fn model(session: &SharedSession, name: impl Into<String>) -> Self {
        RecordBuilder {
            session: Arc::clone(session),
            name: name.into(),
            kind: RecordKind::Model,
            parent: None,
            params: Vec::new(),
            fields: Vec::new(),
            validators: Vec::new(),
            root_validators: Vec::new(),
            frozen: None,
            hashable: None,
            ordered: None,
            is_abstract: false,
            symbol_scope: false,
        }
    }

    /// Declare a tree node type.
    pub fn node(session: &SharedSession, name: impl Into<String>) -> Self {
        RecordBuilder {
            kind: RecordKind::Node,
            ..RecordBuilder::model(session, name)
        }
    }

    /// Derive from `parent`. A type deriving from a node type is a node type.
    #[must_use]
    pub fn extends(mut self, parent: &RecordTypeRef) -> Self {
        if parent.is_node() {
            self.kind = RecordKind::Node;
        }
        self.parent = Some(parent.clone());
        self
    }

    #[must_use]
    pub fn type_params<I: IntoIterator<Item = TypeVar>>(mut self, params: I) -> Self {
        self.params.extend(params);
        self
    }

    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn fields<I: IntoIterator<Item = Field>>(mut self, fields: I) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Attach a validator to a declared or inherited field.
    #[must_use]
    pub fn validator(
        mut self,
        field: &str,
        validator: impl Fn(&FieldDescriptor, &Value) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.validators.push((field.to_owned(), Arc::new(validator)));
        self
    }

    #[must_use]
    pub fn root_validator(
        mut self,
        validator: impl Fn(&Record) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.root_validators.push(Arc::new(validator));
        self
    }

    #[must_use]
    pub fn frozen(mut self, frozen: bool) -> Self {
        self.frozen = Some(frozen);
        self
    }

    /// Defaults to the frozen setting.
    #[must_use]
    pub fn hashable(mut self, hashable: bool) -> Self {
        self.hashable = Some(hashable);
        self
    }

    #[must_use]
    pub fn ordered(mut self, ordered: bool) -> Self {
        self.ordered = Some(ordered);
        self
    }

    #[must_use]
    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Instances collect a symbol table of the names declared below them.
    #[must_use]
    pub fn symbol_scope(mut self) -> Self {
        self.symbol_scope = true;
        self
    }

    /// Check the declaration and build the type.
    #[tracing::instrument(level = "debug", skip_all, fields(record = %self.name))]
    pub fn build(self) -> Result<RecordTypeRef, DefinitionError> {
        let params = self.merged_params()?;
        let flags = self.merged_flags();
        if flags.contains(ModelFlags::SYMBOL_SCOPE) && self.kind != RecordKind::Node {
            return Err(DefinitionError::ScopeNotNode {
                record: self.name.clone(),
            });
        }

        let mut fields: Vec<FieldDescriptor> = self
            .parent
            .as_ref()
            .map(|p| p.fields.clone())
            .unwrap_or_default();
        let inherited = fields.len();
        let mut own: FxHashSet<&str> = FxHashSet::default();
        for field in &self.fields {
            if !own.insert(field.name.as_str()) {
                return Err(DefinitionError::DuplicateField {
                    record: self.name.clone(),
                    field: field.name.clone(),
                });
            }
            let descriptor = self.describe(field, &params)?;
            match fields.iter().position(|f| f.name == field.name) {
                Some(slot) => {
                    tracing::trace!(field = %field.name, "redefines inherited field");
                    fields[slot] = descriptor;
                }
                None => fields.push(descriptor),
            }
        }

        let index: FxHashMap<String, usize> = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect();

        for (name, validator) in self.validators {
            let Some(&slot) = index.get(&name) else {
                return Err(DefinitionError::UnknownValidatorField {
                    record: self.name,
                    field: name,
                });
            };
            fields[slot].validators.push(validator);
        }

        let mut root_validators = self
            .parent
            .as_ref()
            .map(|p| p.root_validators.clone())
            .unwrap_or_default();
        root_validators.extend(self.root_validators);

        let ancestors: SmallVec<[RecordTypeRef; 4]> = match &self.parent {
            Some(parent) => std::iter::once(parent.clone())
                .chain(parent.ancestors.iter().cloned())
                .collect(),
            None => SmallVec::new(),
        };

        tracing::debug!(
            fields = fields.len(),
            inherited,
            params = params.len(),
            "record type built"
        );

        Ok(RecordTypeRef(Arc::new(RecordType {
            name: self.name,
            kind: self.kind,
            flags,
            params,
            fields,
            index,
            root_validators,
            ancestors,
            origin: None,
            session: self.session,
        })))
    }

    fn merged_params(&self) -> Result<Vec<TypeVar>, DefinitionError> {
        let mut params: Vec<TypeVar> = self
            .parent
            .as_ref()
            .map(|p| p.params.clone())
            .unwrap_or_default();
        for (i, param) in self.params.iter().enumerate() {
            if self.params[..i].iter().any(|p| p.name() == param.name()) {
                return Err(DefinitionError::DuplicateTypeParam {
                    record: self.name.clone(),
                    param: param.name().to_owned(),
                });
            }
            if !params.iter().any(|p| p.name() == param.name()) {
                params.push(param.clone());
            }
        }
        Ok(params)
    }

    fn merged_flags(&self) -> ModelFlags {
        let inherited = self.parent.as_ref().map_or(ModelFlags::empty(), |p| p.flags);
        let frozen = self
            .frozen
            .unwrap_or(inherited.contains(ModelFlags::FROZEN));
        let mut flags = ModelFlags::empty();
        flags.set(ModelFlags::FROZEN, frozen);
        flags.set(ModelFlags::HASHABLE, self.hashable.unwrap_or(frozen));
        flags.set(
            ModelFlags::ORDERED,
            self.ordered.unwrap_or(inherited.contains(ModelFlags::ORDERED)),
        );
        flags.set(ModelFlags::ABSTRACT, self.is_abstract);
        flags.set(
            ModelFlags::SYMBOL_SCOPE,
            self.symbol_scope || inherited.contains(ModelFlags::SYMBOL_SCOPE),
        );
        flags
    }

    fn describe(&self, field: &Field, params: &[TypeVar]) -> Result<FieldDescriptor, DefinitionError> {
        let record = || self.name.clone();
        let name = || field.name.clone();

        let Some(ty) = field.ty.clone() else {
            return Err(DefinitionError::MissingType {
                record: record(),
                field: name(),
            });
        };
        ty.check(Some(params))
            .map_err(|reason| DefinitionError::InvalidType {
                record: record(),
                field: name(),
                reason,
            })?;

        let default = match (&field.default, &field.factory) {
            (Some(_), Some(_)) => {
                return Err(DefinitionError::ConflictingDefault {
                    record: record(),
                    field: name(),
                })
            }
            (Some(value), None) => FieldDefault::Value(value.clone()),
            (None, Some(factory)) => FieldDefault::Factory(Arc::clone(factory)),
            (None, None) => FieldDefault::Required,
        };

        let mut flags = field.flags;
        if !flags.contains(FieldFlags::INIT) && default.is_required() {
            return Err(DefinitionError::NoInitWithoutDefault {
                record: record(),
                field: name(),
            });
        }

        let kind = match self.kind {
            RecordKind::Node => FieldKind::classify(&field.name),
            RecordKind::Model => FieldKind::Child,
        };
        if kind == FieldKind::Annotation {
            flags.remove(FieldFlags::EQ | FieldFlags::ORDER | FieldFlags::HASH);
        }
        if flags.contains(FieldFlags::HASH) && !flags.contains(FieldFlags::EQ) {
            return Err(DefinitionError::HashWithoutEq {
                record: record(),
                field: name(),
            });
        }

        Ok(FieldDescriptor {
            name: field.name.clone(),
            ty,
            default,
            converter: field.converter.clone(),
            auto_convert: field.converter.is_none() && field.auto_convert,
            validators: Vec::new(),
            flags,
            kind,
        })
    }
}
