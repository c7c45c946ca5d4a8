//! Type-name keyed handler registry.
//!
//! Handlers are registered under record type names and resolved against a
//! record type's lineage: the type's own name first, then each ancestor,
//! nearest first. Code generators and visitors use it for
//! most-derived-first dispatch without reflection.

use rustc_hash::FxHashMap;

use crate::model::RecordType;

/// Registry from record type name to handler.
#[derive(Clone, Debug)]
pub struct DispatchTable<H> {
    handlers: FxHashMap<String, H>,
}

impl<H> DispatchTable<H> {
    pub fn new() -> Self {
        DispatchTable {
            handlers: FxHashMap::default(),
        }
    }

    /// Register `handler` for `type_name`, returning the handler it replaces.
    pub fn register(&mut self, type_name: impl Into<String>, handler: H) -> Option<H> {
        self.handlers.insert(type_name.into(), handler)
    }

    #[must_use]
    pub fn with(mut self, type_name: impl Into<String>, handler: H) -> Self {
        self.register(type_name, handler);
        self
    }

    /// Handler registered exactly under `type_name`.
    pub fn get(&self, type_name: &str) -> Option<&H> {
        self.handlers.get(type_name)
    }

    /// Most specific handler for `ty`, with the name it was registered under.
    pub fn resolve<'t>(&self, ty: &'t RecordType) -> Option<(&'t str, &H)> {
        ty.lineage()
            .find_map(|name| self.handlers.get(name).map(|handler| (name, handler)))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<H> Default for DispatchTable<H> {
    fn default() -> Self {
        DispatchTable::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::{RecordBuilder, Session};

    #[test]
    fn test_resolves_most_derived_first() {
        let session = Session::shared();
        let base = RecordBuilder::node(&session, "Expr").abstract_type().build().unwrap();
        let literal = RecordBuilder::node(&session, "Literal").extends(&base).build().unwrap();
        let int_literal = RecordBuilder::node(&session, "IntLiteral").extends(&literal).build().unwrap();

        let table = DispatchTable::new().with("Expr", 1).with("Literal", 2);

        assert_eq!(table.resolve(&int_literal), Some(("Literal", &2)));
        assert_eq!(table.resolve(&literal), Some(("Literal", &2)));
        assert_eq!(table.resolve(&base), Some(("Expr", &1)));
    }

    #[test]
    fn test_unregistered_lineage() {
        let session = Session::shared();
        let lonely = RecordBuilder::node(&session, "Lonely").build().unwrap();
        let table: DispatchTable<u8> = DispatchTable::new().with("Other", 0);
        assert!(table.resolve(&lonely).is_none());
    }

    #[test]
    fn test_register_replaces() {
        let mut table = DispatchTable::new();
        assert_eq!(table.register("A", 1), None);
        assert_eq!(table.register("A", 2), Some(1));
        assert_eq!(table.get("A"), Some(&2));
        assert_eq!(table.len(), 1);
    }
}
