//! Validated instance construction.

use rustc_hash::FxHashMap;

use crate::error::ValueError;
use crate::node::NodeState;
use crate::record::Record;
use crate::symtable;
use crate::validate::validate;
use crate::value::Value;

use super::{RecordKind, RecordTypeRef};

impl RecordTypeRef {
    /// Build an instance from named arguments.
    ///
    /// Per field, in declaration order: take the argument or the default,
    /// convert, check against the type description, run the field
    /// validators. Then run the root validators, assign the node id and
    /// collect the symbol table. The first failure aborts construction.
    #[tracing::instrument(level = "trace", skip_all, fields(record = %self.name))]
    pub fn construct<'a, I>(&self, args: I) -> Result<Record, ValueError>
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        let record_name = || self.name.clone();
        if self.is_abstract() {
            return Err(ValueError::NotInstantiable {
                record: record_name(),
            });
        }

        let mut given: FxHashMap<&'a str, Value> = FxHashMap::default();
        for (name, value) in args {
            match self.field(name) {
                Some(field) if field.is_init() => {}
                _ => {
                    return Err(ValueError::UnexpectedArgument {
                        record: record_name(),
                        field: name.to_owned(),
                    })
                }
            }
            if given.insert(name, value).is_some() {
                return Err(ValueError::DuplicateArgument {
                    record: record_name(),
                    field: name.to_owned(),
                });
            }
        }

        let mut values = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let raw = match given.remove(field.name()) {
                Some(value) => value,
                None => field.default.produce().ok_or_else(|| ValueError::MissingField {
                    record: record_name(),
                    field: field.name.clone(),
                })?,
            };

            let value = if field.converts() {
                let shown = raw.to_string();
                field.convert(raw).map_err(|message| ValueError::ConversionFailed {
                    record: record_name(),
                    field: field.name.clone(),
                    value: shown,
                    message,
                })?
            } else {
                raw
            };

            validate(&field.ty, &value).map_err(|reason| ValueError::TypeMismatch {
                record: record_name(),
                field: field.name.clone(),
                value: value.to_string(),
                reason,
            })?;

            for check in &field.validators {
                check(field, &value).map_err(|message| ValueError::ValidatorFailed {
                    record: record_name(),
                    field: field.name.clone(),
                    value: value.to_string(),
                    message,
                })?;
            }
            values.push(value);
        }

        let node = match self.kind {
            RecordKind::Node => Some(Box::new(NodeState::new(self.session.next_node_id()))),
            RecordKind::Model => None,
        };
        let mut record = Record {
            ty: self.clone(),
            values,
            node,
        };

        for check in &self.root_validators {
            check(&record).map_err(|message| ValueError::RootValidatorFailed {
                record: record_name(),
                message,
            })?;
        }

        if self.is_symbol_scope() {
            let table = symtable::collect(&record)?;
            if let Some(node) = record.node.as_mut() {
                node.symtable = Some(table);
            }
        }

        Ok(record)
    }

    /// Build an instance with every field defaulted.
    pub fn instantiate(&self) -> Result<Record, ValueError> {
        self.construct(std::iter::empty())
    }
}
