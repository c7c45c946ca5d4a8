use indexmap::IndexMap;
use sylva_ir::{Record, Value};

use super::{Generated, TemplatedGenerator};
use crate::error::GenerationError;

/// Extra named values exposed to every render rule of one generation call.
pub type Bindings = IndexMap<String, Generated>;

/// Everything a render rule sees for one node.
///
/// Names resolve against the generated children first, then the generated
/// annotations, then the extra bindings of the call.
pub struct RenderContext<'a> {
    generator: &'a TemplatedGenerator,
    node: &'a Record,
    rule: &'a str,
    children: IndexMap<String, Generated>,
    attrs: IndexMap<String, Generated>,
    extra: &'a Bindings,
}

impl<'a> RenderContext<'a> {
    pub(crate) fn new(
        generator: &'a TemplatedGenerator,
        node: &'a Record,
        rule: &'a str,
        children: IndexMap<String, Generated>,
        attrs: IndexMap<String, Generated>,
        extra: &'a Bindings,
    ) -> Self {
        RenderContext {
            generator,
            node,
            rule,
            children,
            attrs,
            extra,
        }
    }

    /// The node being rendered, before generation.
    pub fn node(&self) -> &'a Record {
        self.node
    }

    /// Type name the rule was registered under.
    pub fn rule(&self) -> &'a str {
        self.rule
    }

    pub fn generator(&self) -> &'a TemplatedGenerator {
        self.generator
    }

    /// Generated child fields, in declaration order.
    pub fn children(&self) -> &IndexMap<String, Generated> {
        &self.children
    }

    /// Generated annotation fields.
    pub fn attrs(&self) -> &IndexMap<String, Generated> {
        &self.attrs
    }

    pub fn extra(&self) -> &'a Bindings {
        self.extra
    }

    pub fn get(&self, key: &str) -> Option<&Generated> {
        self.children
            .get(key)
            .or_else(|| self.attrs.get(key))
            .or_else(|| self.extra.get(key))
    }

    /// Generated text for `key`; containers are joined with `, `.
    pub fn text(&self, key: &str) -> Result<String, GenerationError> {
        self.get(key)
            .map(ToString::to_string)
            .ok_or_else(|| self.missing(key))
    }

    /// Generated container elements for `key` joined with `sep`.
    pub fn join(&self, key: &str, sep: &str) -> Result<String, GenerationError> {
        self.get(key).map(|g| g.join(sep)).ok_or_else(|| self.missing(key))
    }

    /// Raw field value of the node, before generation.
    pub fn value(&self, key: &str) -> Result<&'a Value, GenerationError> {
        self.node.get(key).ok_or_else(|| self.missing(key))
    }

    /// Generate an arbitrary value with this call's bindings.
    pub fn generate(&self, value: &Value) -> Result<Generated, GenerationError> {
        self.generator.generate_value(value, self.extra)
    }

    /// Failure of a logic rule, attributed to this rule.
    pub fn fail(&self, message: impl Into<String>) -> GenerationError {
        GenerationError::Logic {
            rule: self.rule.to_owned(),
            message: message.into(),
        }
    }

    pub(crate) fn missing(&self, key: &str) -> GenerationError {
        GenerationError::MissingKey {
            rule: self.rule.to_owned(),
            key: key.to_owned(),
        }
    }
}
