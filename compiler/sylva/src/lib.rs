//! Sylva - Typed IR Toolkit
//!
//! Foundation for compiler-like tools built around typed intermediate
//! representations. Concrete IRs declare their node types on top of
//! [`ir`]; passes walk and rewrite trees with traversals, visitors and
//! translators; [`codegen`] turns finished trees into text.
//!
//! ```text
//! declare (RecordBuilder) -> construct (validated) -> traverse / visit / translate
//!                                                   -> TemplatedGenerator -> text
//! ```
//!
//! Set `SYLVA_LOG` (or `RUST_LOG`) and call [`init_tracing`] to get a
//! hierarchical trace of definitions, concretizations and generation.

use std::sync::Once;

pub use sylva_codegen as codegen;
pub use sylva_ir as ir;

pub use sylva_codegen::{
    format_source, CaseStyle, GenerationError, Generated, Identifier, Template, TemplateError,
    TemplatedGenerator, TextBlock,
};
pub use sylva_ir::{
    concretize, select, traverse, DefinitionError, Field, Record, RecordBuilder, RecordTypeRef,
    Session, SharedSession, TraversalOrder, TypeDesc, TypeVar, Value, ValueError,
};

/// Everything needed to declare, walk and generate an IR.
pub mod prelude {
    pub use sylva_codegen::{Bindings, Generated, RenderContext, Template, TemplatedGenerator, TextBlock};
    pub use sylva_ir::visitor::{rebuild_node, walk_node, walk_value};
    pub use sylva_ir::{
        children_of, concretize, select, select_records, traverse, traverse_with_keys, DispatchTable,
        Field, FieldDefault, Literal, Pass, Primitive, Record, RecordBuilder, RecordTypeRef, Session,
        SharedSession, TraversalOrder, Translator, TreeItems, TreeKey, TypeDesc, TypeVar, Value, ValueRef, Visitor,
        XIter,
    };
}

static TRACING_INIT: Once = Once::new();

/// Environment variables consulted for the log filter, in priority order.
const LOG_ENV_VARS: [&str; 2] = ["SYLVA_LOG", "RUST_LOG"];

/// Install a hierarchical tracing subscriber.
///
/// Does nothing unless `SYLVA_LOG` or `RUST_LOG` is set, e.g.
/// `SYLVA_LOG=sylva_ir=debug,sylva_codegen=trace`. Safe to call multiple
/// times; only the first call has an effect.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        let Some(directives) = LOG_ENV_VARS.iter().find_map(|var| std::env::var(var).ok()) else {
            return;
        };
        let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("warn"));
        let layer = tracing_tree::HierarchicalLayer::new(2)
            .with_targets(true)
            .with_bracketed_fields(true);
        if tracing_subscriber::registry().with(layer).with(filter).try_init().is_err() {
            tracing::debug!("a global tracing subscriber is already installed");
        }
    });
}
