//! Identifier case conversion.
//!
//! Generated code has to follow the naming rules of its target language,
//! while IR names arrive in whatever style the front end used. A name is
//! split into lowercase words according to its [`CaseStyle`] and joined
//! back in another style.
//!
//! | style | example |
//! |---|---|
//! | `Concatenated` | `myvariable` |
//! | `Canonical` | `my variable` |
//! | `Camel` | `myVariable` |
//! | `Pascal` | `MyVariable` |
//! | `Snake` | `my_variable` |
//! | `Kebab` | `my-variable` |
//!
//! Concatenated names carry no word boundaries, so they can be produced but
//! never split.


use std::fmt;

/// Naming convention of an identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CaseStyle {
    Concatenated,
    Canonical,
    Camel,
    Pascal,
    Snake,
    Kebab,
}

impl CaseStyle {
    pub const ALL: [CaseStyle; 6] = [
        CaseStyle::Concatenated,
        CaseStyle::Canonical,
        CaseStyle::Camel,
        CaseStyle::Pascal,
        CaseStyle::Snake,
        CaseStyle::Kebab,
    ];

    /// Split `name` into lowercase words. `None` for concatenated names.
    pub fn split(self, name: &str) -> Option<Vec<String>> {
        let words = match self {
            CaseStyle::Concatenated => return None,
            CaseStyle::Canonical => split_on(name, ' '),
            CaseStyle::Snake => split_on(name, '_'),
            CaseStyle::Kebab => split_on(name, '-'),
            CaseStyle::Camel | CaseStyle::Pascal => split_camel(name),
        };
        Some(words)
    }

    /// Join words in this style.
    pub fn join<S: AsRef<str>>(self, words: &[S]) -> String {
        let lower = words.iter().map(|w| w.as_ref().to_lowercase());
        match self {
            CaseStyle::Concatenated => lower.collect(),
            CaseStyle::Canonical => lower.collect::<Vec<_>>().join(" "),
            CaseStyle::Snake => lower.collect::<Vec<_>>().join("_"),
            CaseStyle::Kebab => lower.collect::<Vec<_>>().join("-"),
            CaseStyle::Pascal => words.iter().map(|w| title_case(w.as_ref())).collect(),
            CaseStyle::Camel => words
                .iter()
                .enumerate()
                .map(|(i, w)| {
                    if i == 0 {
                        w.as_ref().to_lowercase()
                    } else {
                        title_case(w.as_ref())
                    }
                })
                .collect(),
        }
    }

    /// Re-spell `name` from this style into `target`.
    pub fn convert(self, name: &str, target: CaseStyle) -> Option<String> {
        self.split(name).map(|words| target.join(&words))
    }
}

impl fmt::Display for CaseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CaseStyle::Concatenated => "concatenated",
            CaseStyle::Canonical => "canonical",
            CaseStyle::Camel => "camel",
            CaseStyle::Pascal => "pascal",
            CaseStyle::Snake => "snake",
            CaseStyle::Kebab => "kebab",
        };
        f.write_str(name)
    }
}

fn split_on(name: &str, sep: char) -> Vec<String> {
    name.split(sep)
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Word boundaries fall before an uppercase letter that follows a lowercase
/// letter or digit, and before the last capital of an acronym followed by a
/// lowercase letter (`HTTPServer` -> `http`, `server`).
fn split_camel(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        let boundary = c.is_uppercase()
            && i > 0
            && (chars[i - 1].is_lowercase()
                || chars[i - 1].is_ascii_digit()
                || (chars[i - 1].is_uppercase() && chars.get(i + 1).is_some_and(|n| n.is_lowercase())));
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Identifier held as lowercase words, spelled on demand.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Identifier {
    words: Vec<String>,
}

impl Identifier {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Identifier {
            words: words.into_iter().map(|w| w.as_ref().to_lowercase()).collect(),
        }
    }

    /// Parse `name` written in `style`.
    pub fn parse(name: &str, style: CaseStyle) -> Option<Self> {
        style.split(name).map(|words| Identifier { words })
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn to_style(&self, style: CaseStyle) -> String {
        style.join(&self.words)
    }

    pub fn as_snake(&self) -> String {
        self.to_style(CaseStyle::Snake)
    }

    pub fn as_camel(&self) -> String {
        self.to_style(CaseStyle::Camel)
    }

    pub fn as_pascal(&self) -> String {
        self.to_style(CaseStyle::Pascal)
    }

    pub fn as_kebab(&self) -> String {
        self.to_style(CaseStyle::Kebab)
    }

    pub fn as_canonical(&self) -> String {
        self.to_style(CaseStyle::Canonical)
    }

    pub fn as_concatenated(&self) -> String {
        self.to_style(CaseStyle::Concatenated)
    }

    /// Upper snake case, for constants and macros.
    pub fn as_screaming_snake(&self) -> String {
        self.as_snake().to_uppercase()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_canonical())
    }
}
