//! Sylva Codegen - Text Generation from IR Trees
//!
//! Turns finished sylva IR trees into source text:
//! - Generator: per node type render rules resolved along the type lineage
//! - Templates: `{name}` format, `$name` substitution and closure rules
//! - Text blocks: indentation-aware line buffers for hand-written emitters
//! - Naming: identifier case conversion between target language conventions
//! - Formatting: piping generated sources through external formatters
//!
//! # Design
//!
//! - **Rules by type name**: a generator is a `DispatchTable` of templates.
//!   Lookup walks the node type's ancestor chain, so a rule for an abstract
//!   base covers every subtype without its own rule.
//! - **Children first**: every child and annotation field is generated
//!   before the node's own rule runs; rules only ever see generated text.

mod error;
pub mod format;
pub mod generator;
pub mod naming;
pub mod template;
pub mod text;

pub use error::{FormatError, GenerationError, TemplateError};
pub use format::{format_source, format_with, formatter_for, ExternalFormatter, SourceFormatter};
pub use generator::{default_leaf_dump, Bindings, Generated, GeneratorBuilder, RenderContext, TemplatedGenerator};
pub use naming::{CaseStyle, Identifier};
pub use template::Template;
pub use text::TextBlock;
