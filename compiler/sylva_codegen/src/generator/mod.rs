//! Template-dispatch code generation.
//!
//! A [`TemplatedGenerator`] holds one [`Template`] per node type name. To
//! generate a node it resolves the rule registered for the node's own type,
//! or failing that for the nearest ancestor, then generates every child and
//! annotation field first and renders the rule over the results.
//!
//! Non-node values are handled structurally: lists and tuples become
//! [`Generated::Seq`], sets [`Generated::Set`], mappings [`Generated::Map`],
//! and scalars go through the leaf dump (plain string conversion unless
//! overridden).
//!
//! # Design
//!
//! - **Built once**: rules are registered through [`GeneratorBuilder`], which
//!   parses text templates eagerly. A built generator is immutable and can be
//!   shared across threads.
//! - **Fatal misses**: a node whose lineage has no rule is a
//!   [`GenerationError::NoRenderRule`]; nothing is silently skipped.
//! - **Bounded recursion**: every recursive step goes through
//!   `ensure_sufficient_stack`, so deep trees do not overflow.

mod context;
mod generated;


use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use sylva_ir::stack::ensure_sufficient_stack;
use sylva_ir::{DispatchTable, Record, Value, ValueRef};
use tracing::{instrument, trace};

use crate::error::{GenerationError, TemplateError};
use crate::template::Template;

pub use context::{Bindings, RenderContext};
pub use generated::Generated;

/// Conversion of scalar values to text.
pub type LeafDump = dyn Fn(&Value) -> String + Send + Sync;

/// Default scalar rendering: strings unquoted, `None` as empty text, enum
/// members by name.
pub fn default_leaf_dump(value: &Value) -> String {
    match value {
        Value::None => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Str(s) => s.clone(),
        Value::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        Value::Enum(member) => member.name().to_owned(),
        other => other.to_string(),
    }
}

/// Node-type dispatched text generator.
#[derive(Clone)]
pub struct TemplatedGenerator {
    name: String,
    rules: DispatchTable<Template>,
    leaf_dump: Option<Arc<LeafDump>>,
}

impl TemplatedGenerator {
    pub fn builder(name: impl Into<String>) -> GeneratorBuilder {
        GeneratorBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rule that would render a node of type `type_name` registered exactly
    /// under that name.
    pub fn template(&self, type_name: &str) -> Option<&Template> {
        self.rules.get(type_name)
    }

    /// Rule resolved along `record`'s lineage, with the name it is registered under.
    pub fn template_for<'r>(&self, record: &'r Record) -> Option<(&'r str, &Template)> {
        self.rules.resolve(record.record_type())
    }

    /// Generate text for `root`.
    pub fn generate<'v>(&self, root: impl Into<ValueRef<'v>>) -> Result<Generated, GenerationError> {
        self.generate_with(root, &Bindings::new())
    }

    /// Generate text for `root`, exposing `extra` to every render rule.
    #[instrument(level = "debug", skip_all, fields(generator = %self.name))]
    pub fn generate_with<'v>(
        &self,
        root: impl Into<ValueRef<'v>>,
        extra: &Bindings,
    ) -> Result<Generated, GenerationError> {
        match root.into() {
            ValueRef::Record(record) => self.generate_record(record, extra),
            ValueRef::Value(value) => self.generate_value(value, extra),
        }
    }

    /// Scalar rendering used for leaves.
    pub fn dump_leaf(&self, value: &Value) -> String {
        match &self.leaf_dump {
            Some(dump) => dump(value),
            None => default_leaf_dump(value),
        }
    }

    pub(crate) fn generate_value(&self, value: &Value, extra: &Bindings) -> Result<Generated, GenerationError> {
        ensure_sufficient_stack(|| match value {
            Value::Record(record) => self.generate_record(record, extra),
            Value::List(items) | Value::Tuple(items) => items
                .iter()
                .map(|item| self.generate_value(item, extra))
                .collect::<Result<Vec<_>, GenerationError>>()
                .map(Generated::Seq),
            Value::Set(items) => items
                .iter()
                .map(|item| self.generate_value(item, extra))
                .collect::<Result<Vec<_>, GenerationError>>()
                .map(Generated::Set),
            Value::Map(entries) => entries
                .iter()
                .map(|(key, item)| Ok((key.clone(), self.generate_value(item, extra)?)))
                .collect::<Result<IndexMap<_, _>, GenerationError>>()
                .map(Generated::Map),
            leaf => Ok(Generated::Text(self.dump_leaf(leaf))),
        })
    }

    fn generate_record(&self, record: &Record, extra: &Bindings) -> Result<Generated, GenerationError> {
        let Some((rule, template)) = self.template_for(record) else {
            if record.is_node() {
                return Err(GenerationError::NoRenderRule {
                    node: record.type_name().to_owned(),
                });
            }
            return Ok(Generated::Text(record.to_string()));
        };
        trace!(node = record.type_name(), rule, "dispatch");

        let fields: Vec<(&str, &Value)> = if record.is_node() {
            record.children().collect()
        } else {
            record.values().collect()
        };
        let children = fields
            .into_iter()
            .map(|(name, value)| Ok((name.to_owned(), self.generate_value(value, extra)?)))
            .collect::<Result<IndexMap<_, _>, GenerationError>>()?;
        let attrs = record
            .annotations()
            .map(|(name, value)| Ok((name.to_owned(), self.generate_value(value, extra)?)))
            .collect::<Result<IndexMap<_, _>, GenerationError>>()?;

        let ctx = RenderContext::new(self, record, rule, children, attrs, extra);
        template.render(&ctx).map(Generated::Text)
    }
}

impl fmt::Debug for TemplatedGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplatedGenerator")
            .field("name", &self.name)
            .field("rules", &self.rules.len())
            .field("custom_leaf_dump", &self.leaf_dump.is_some())
            .finish()
    }
}

/// Collects render rules for a [`TemplatedGenerator`].
///
/// Template parse errors are remembered and reported by [`build`](Self::build),
/// so rule registration chains without intermediate `?`.
pub struct GeneratorBuilder {
    name: String,
    rules: DispatchTable<Template>,
    leaf_dump: Option<Arc<LeafDump>>,
    error: Option<TemplateError>,
}

impl GeneratorBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        GeneratorBuilder {
            name: name.into(),
            rules: DispatchTable::new(),
            leaf_dump: None,
            error: None,
        }
    }

    /// Register a prepared template for `type_name`.
    #[must_use]
    pub fn rule(mut self, type_name: impl Into<String>, template: Template) -> Self {
        self.rules.register(type_name, template);
        self
    }

    #[must_use]
    pub fn format(self, type_name: impl Into<String>, source: &str) -> Self {
        self.parsed(type_name.into(), Template::format(source))
    }

    #[must_use]
    pub fn substitute(self, type_name: impl Into<String>, source: &str) -> Self {
        self.parsed(type_name.into(), Template::substitute(source))
    }

    #[must_use]
    pub fn logic<F>(self, type_name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&RenderContext<'_>) -> Result<String, GenerationError> + Send + Sync + 'static,
    {
        self.rule(type_name, Template::logic(f))
    }

    /// Replace the scalar rendering.
    #[must_use]
    pub fn leaf_dump<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.leaf_dump = Some(Arc::new(f));
        self
    }

    fn parsed(mut self, rule: String, template: Result<Template, TemplateError>) -> Self {
        match template {
            Ok(template) => self.rule(rule, template),
            Err(source) => {
                if self.error.is_none() {
                    self.error = Some(TemplateError::Rule {
                        rule,
                        source: Box::new(source),
                    });
                }
                self
            }
        }
    }

    pub fn build(self) -> Result<TemplatedGenerator, TemplateError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        tracing::debug!(generator = %self.name, rules = self.rules.len(), "generator built");
        Ok(TemplatedGenerator {
            name: self.name,
            rules: self.rules,
            leaf_dump: self.leaf_dump,
        })
    }
}
