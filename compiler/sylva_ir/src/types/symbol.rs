use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::error::DefinitionError;

const IDENTIFIER: &str = r"[a-zA-Z_]\w*";

#[expect(clippy::expect_used, reason = "constant pattern, covered by tests")]
static IDENTIFIER_PATTERN: LazyLock<SymbolPattern> = LazyLock::new(|| {
    SymbolPattern::new(IDENTIFIER).expect("identifier pattern compiles")
});

/// Full-match pattern constraining symbol names.
#[derive(Clone)]
pub struct SymbolPattern {
    source: Arc<str>,
    regex: Arc<Regex>,
}

impl SymbolPattern {
    /// Compile `pattern`; it must match the whole name.
    pub fn new(pattern: &str) -> Result<Self, DefinitionError> {
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| {
            DefinitionError::InvalidPattern {
                pattern: pattern.to_owned(),
                reason: e.to_string(),
            }
        })?;
        Ok(SymbolPattern {
            source: Arc::from(pattern),
            regex: Arc::new(regex),
        })
    }

    /// The default `[a-zA-Z_]\w*` identifier pattern.
    pub fn identifier() -> Self {
        IDENTIFIER_PATTERN.clone()
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

impl PartialEq for SymbolPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for SymbolPattern {}

impl Hash for SymbolPattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
    }
}

impl fmt::Debug for SymbolPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolPattern({:?})", self.source)
    }
}
