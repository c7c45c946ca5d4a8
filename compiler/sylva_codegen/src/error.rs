//! Error types for templates, generation and source formatting.

use std::io;

use sylva_ir::ValueError;
use thiserror::Error;

/// Malformed template definition. Raised when the template is parsed,
/// before anything is rendered.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TemplateError {
    #[error("unclosed placeholder at offset {offset} in `{template}`")]
    Unclosed { template: String, offset: usize },

    #[error("single `}}` at offset {offset} in `{template}`")]
    StrayBrace { template: String, offset: usize },

    #[error("invalid placeholder `{placeholder}` in `{template}`")]
    InvalidPlaceholder { template: String, placeholder: String },

    #[error("invalid render rule for `{rule}`: {source}")]
    Rule {
        rule: String,
        #[source]
        source: Box<TemplateError>,
    },
}

/// Failure while turning a tree into text.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum GenerationError {
    #[error("no render rule for `{node}` or any of its ancestors")]
    NoRenderRule { node: String },

    #[error("render rule `{rule}` references unknown key `{key}`")]
    MissingKey { rule: String, key: String },

    #[error("render rule `{rule}` failed: {message}")]
    Logic { rule: String, message: String },

    #[error(transparent)]
    Value(#[from] ValueError),
}

/// Failure of an external source formatter.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("no formatter available for `{language}` sources")]
    UnknownLanguage { language: String },

    #[error("failed to run `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("`{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("`{program}` produced non UTF-8 output")]
    Encoding { program: String },
}
