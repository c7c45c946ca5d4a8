//! Render rules.
//!
//! Three kinds of template turn a [`RenderContext`] into text:
//!
//! - **Format** templates use `{name}` placeholders. `{name:sep}` joins a
//!   generated sequence with `sep` (`\n` and `\t` escapes are understood),
//!   and `{{` / `}}` stand for literal braces.
//! - **Substitution** templates use `$name` or `${name}`; `$$` is a literal
//!   dollar sign.
//! - **Logic** rules are closures with full access to the context.
//!
//! Text templates are parsed once, when the template is created, so a
//! malformed template is a [`TemplateError`] at generator build time and
//! never surfaces while rendering.


use std::fmt;
use std::sync::Arc;

use crate::error::{GenerationError, TemplateError};
use crate::generator::RenderContext;

/// Closure type behind a logic rule.
pub type LogicFn = dyn Fn(&RenderContext<'_>) -> Result<String, GenerationError> + Send + Sync;

/// A render rule for one node type.
#[derive(Clone)]
pub enum Template {
    Format(TextTemplate),
    Substitute(TextTemplate),
    Logic(Arc<LogicFn>),
}

impl Template {
    /// Parse a `{name}` format template.
    pub fn format(source: &str) -> Result<Self, TemplateError> {
        parse_format(source).map(Template::Format)
    }

    /// Parse a `$name` substitution template.
    pub fn substitute(source: &str) -> Result<Self, TemplateError> {
        parse_substitute(source).map(Template::Substitute)
    }

    pub fn logic<F>(f: F) -> Self
    where
        F: Fn(&RenderContext<'_>) -> Result<String, GenerationError> + Send + Sync + 'static,
    {
        Template::Logic(Arc::new(f))
    }

    pub fn render(&self, ctx: &RenderContext<'_>) -> Result<String, GenerationError> {
        match self {
            Template::Format(text) | Template::Substitute(text) => text.render(ctx),
            Template::Logic(f) => f(ctx),
        }
    }

    /// Placeholder names a text template refers to, in order of appearance.
    pub fn placeholders(&self) -> Vec<&str> {
        match self {
            Template::Format(text) | Template::Substitute(text) => text.placeholders().collect(),
            Template::Logic(_) => Vec::new(),
        }
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Template::Format(text) => f.debug_tuple("Format").field(&text.source).finish(),
            Template::Substitute(text) => f.debug_tuple("Substitute").field(&text.source).finish(),
            Template::Logic(_) => f.write_str("Logic(..)"),
        }
    }
}

/// Parsed text template: literal runs and placeholders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextTemplate {
    source: String,
    segments: Vec<Segment>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder { name: String, sep: Option<String> },
}

impl TextTemplate {
    pub fn source(&self) -> &str {
        &self.source
    }

    fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder { name, .. } => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<String, GenerationError> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder { name, sep } => {
                    let value = ctx.get(name).ok_or_else(|| ctx.missing(name))?;
                    match sep {
                        Some(sep) => out.push_str(&value.join(sep)),
                        None => out.push_str(&value.to_string()),
                    }
                }
            }
        }
        Ok(out)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn unescape(sep: &str) -> String {
    let mut out = String::with_capacity(sep.len());
    let mut chars = sep.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Accumulates segments, merging adjacent literal text.
struct SegmentBuf {
    segments: Vec<Segment>,
    literal: String,
}

impl SegmentBuf {
    fn new() -> Self {
        SegmentBuf {
            segments: Vec::new(),
            literal: String::new(),
        }
    }

    fn push_char(&mut self, c: char) {
        self.literal.push(c);
    }

    fn push_placeholder(&mut self, name: String, sep: Option<String>) {
        self.flush();
        self.segments.push(Segment::Placeholder { name, sep });
    }

    fn flush(&mut self) {
        if !self.literal.is_empty() {
            self.segments.push(Segment::Literal(std::mem::take(&mut self.literal)));
        }
    }

    fn finish(mut self, source: &str) -> TextTemplate {
        self.flush();
        TextTemplate {
            source: source.to_owned(),
            segments: self.segments,
        }
    }
}

fn parse_format(source: &str) -> Result<TextTemplate, TemplateError> {
    let mut buf = SegmentBuf::new();
    let mut chars = source.char_indices().peekable();
    while let Some((offset, c)) = chars.next() {
        match c {
            '{' if chars.next_if(|&(_, n)| n == '{').is_some() => buf.push_char('{'),
            '}' if chars.next_if(|&(_, n)| n == '}').is_some() => buf.push_char('}'),
            '}' => {
                return Err(TemplateError::StrayBrace {
                    template: source.to_owned(),
                    offset,
                })
            }
            '{' => {
                let body_start = offset + 1;
                let Some(close) = source[body_start..].find('}').map(|i| body_start + i) else {
                    return Err(TemplateError::Unclosed {
                        template: source.to_owned(),
                        offset,
                    });
                };
                let body = &source[body_start..close];
                let (name, sep) = match body.split_once(':') {
                    Some((name, sep)) => (name, Some(unescape(sep))),
                    None => (body, None),
                };
                if !is_identifier(name) || body.contains('{') {
                    return Err(TemplateError::InvalidPlaceholder {
                        template: source.to_owned(),
                        placeholder: body.to_owned(),
                    });
                }
                buf.push_placeholder(name.to_owned(), sep);
                while chars.next_if(|&(i, _)| i <= close).is_some() {}
            }
            c => buf.push_char(c),
        }
    }
    Ok(buf.finish(source))
}

fn parse_substitute(source: &str) -> Result<TextTemplate, TemplateError> {
    let mut buf = SegmentBuf::new();
    let mut chars = source.char_indices().peekable();
    while let Some((offset, c)) = chars.next() {
        if c != '$' {
            buf.push_char(c);
            continue;
        }
        if chars.next_if(|&(_, n)| n == '$').is_some() {
            buf.push_char('$');
        } else if chars.next_if(|&(_, n)| n == '{').is_some() {
            let body_start = offset + 2;
            let Some(close) = source[body_start..].find('}').map(|i| body_start + i) else {
                return Err(TemplateError::Unclosed {
                    template: source.to_owned(),
                    offset,
                });
            };
            let name = &source[body_start..close];
            if !is_identifier(name) {
                return Err(TemplateError::InvalidPlaceholder {
                    template: source.to_owned(),
                    placeholder: name.to_owned(),
                });
            }
            buf.push_placeholder(name.to_owned(), None);
            while chars.next_if(|&(i, _)| i <= close).is_some() {}
        } else {
            let mut name = String::new();
            while let Some((_, n)) = chars.next_if(|&(_, n)| n.is_alphanumeric() || n == '_') {
                name.push(n);
            }
            if !is_identifier(&name) {
                return Err(TemplateError::InvalidPlaceholder {
                    template: source.to_owned(),
                    placeholder: format!("${name}"),
                });
            }
            buf.push_placeholder(name, None);
        }
    }
    Ok(buf.finish(source))
}
