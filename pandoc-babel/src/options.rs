//! Option declarations and their command-line form
//!
//!     Callers describe pandoc options as an ordered list of declarations: bare flags
//!     (`s`, `table_of_contents`), key/value pairs (`to` → `rst`), or a group of pairs
//!     given together. Serialization walks the list in order and never reorders,
//!     deduplicates or validates anything; pandoc is the one that decides whether a
//!     flag exists.
//!
//!     Naming rule:
//!         - one character:   `s`                 → `-s`
//!         - anything longer: `table_of_contents` → `--table-of-contents`
//!
//!     A value follows its flag as a separate token.

use std::fmt;

/// A single option declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionDecl {
    /// Bare flag, e.g. `s` or `no_wrap`
    Flag(String),
    /// Flag with an argument, e.g. `to` → `rst`
    Value(String, String),
    /// Several key/value pairs declared together, kept in insertion order
    Group(Vec<(String, String)>),
}

impl OptionDecl {
    pub fn flag(name: impl Into<String>) -> Self {
        OptionDecl::Flag(name.into())
    }

    pub fn value(name: impl Into<String>, value: impl fmt::Display) -> Self {
        OptionDecl::Value(name.into(), value.to_string())
    }

    /// Build a group from ordered pairs.
    pub fn group<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: fmt::Display,
    {
        OptionDecl::Group(
            pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.to_string()))
                .collect(),
        )
    }

    /// Parse the textual form used by configuration files and the CLI.
    ///
    /// `name=value` becomes [`OptionDecl::Value`], anything else a
    /// [`OptionDecl::Flag`]. Leading dashes are dropped so `--toc` and `toc`
    /// declare the same flag. Returns `None` for an empty name.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim().trim_start_matches('-');
        let decl = match raw.split_once('=') {
            Some((name, value)) => OptionDecl::Value(name.trim().to_string(), value.to_string()),
            None => OptionDecl::Flag(raw.to_string()),
        };
        match &decl {
            OptionDecl::Flag(name) | OptionDecl::Value(name, _) if name.is_empty() => None,
            _ => Some(decl),
        }
    }

    /// Flattened `(name, value)` entries of this declaration.
    pub fn entries(&self) -> Vec<(&str, Option<&str>)> {
        match self {
            OptionDecl::Flag(name) => vec![(name.as_str(), None)],
            OptionDecl::Value(name, value) => vec![(name.as_str(), Some(value.as_str()))],
            OptionDecl::Group(pairs) => pairs
                .iter()
                .map(|(name, value)| (name.as_str(), Some(value.as_str())))
                .collect(),
        }
    }
}

impl From<&str> for OptionDecl {
    fn from(name: &str) -> Self {
        OptionDecl::Flag(name.to_string())
    }
}

impl From<String> for OptionDecl {
    fn from(name: String) -> Self {
        OptionDecl::Flag(name)
    }
}

impl<V: fmt::Display> From<(&str, V)> for OptionDecl {
    fn from((name, value): (&str, V)) -> Self {
        OptionDecl::value(name, value)
    }
}

impl<V: fmt::Display> From<(String, V)> for OptionDecl {
    fn from((name, value): (String, V)) -> Self {
        OptionDecl::value(name, value)
    }
}

/// Command-line spelling of an option identifier.
pub fn option_name(id: &str) -> String {
    if id.chars().count() == 1 {
        format!("-{id}")
    } else {
        format!("--{}", id.replace('_', "-"))
    }
}

/// Serialize declarations into argv-level tokens, preserving order.
pub fn tokens(decls: &[OptionDecl]) -> Vec<String> {
    let mut out = Vec::new();
    for decl in decls {
        for (name, value) in decl.entries() {
            out.push(option_name(name));
            if let Some(value) = value {
                out.push(value.to_string());
            }
        }
    }
    out
}

/// Serialize declarations into a single space-joined string.
pub fn serialize(decls: &[OptionDecl]) -> String {
    tokens(decls).join(" ")
}

fn same_option(a: &str, b: &str) -> bool {
    a.replace('_', "-") == b.replace('_', "-")
}

/// Last value declared under any of `names`.
///
/// Names compare after underscore/hyphen normalization, so `email_obfuscation`
/// matches `email-obfuscation`.
pub fn declared_value<'a>(decls: &'a [OptionDecl], names: &[&str]) -> Option<&'a str> {
    decls
        .iter()
        .flat_map(|decl| decl.entries())
        .filter(|(name, _)| names.iter().any(|n| same_option(name, n)))
        .filter_map(|(_, value)| value)
        .last()
}

/// Whether any declaration uses one of `names`, with or without a value.
pub fn is_declared(decls: &[OptionDecl], names: &[&str]) -> bool {
    decls
        .iter()
        .flat_map(|decl| decl.entries())
        .any(|(name, _)| names.iter().any(|n| same_option(name, n)))
}
