//! Program-level shorthand aliases.
//!
//! A [`ShorthandTable`] maps single words to multi-token expansions, so a
//! user can type `tool gm` for `tool greet morning`. Expansion applies
//! only to the first argument and only once, before resolution; nothing
//! deeper in the argument vector is rewritten.

use std::collections::BTreeMap;

/// First-argument shorthand expansions.
///
/// Backed by a `BTreeMap` so completion candidates come out in a stable
/// sorted order.
///
/// # Examples
///
/// ```
/// use cmdtree_dispatch::ShorthandTable;
///
/// let table = ShorthandTable::new()
///     .with("gm", &["greet", "morning"])
///     .with("ge", &["greet", "evening"]);
///
/// let args: Vec<String> = vec!["gm".into(), "world".into()];
/// assert_eq!(table.expand(&args), ["greet", "morning", "world"]);
/// assert_eq!(table.names_with_prefix("g"), ["ge", "gm"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShorthandTable {
    entries: BTreeMap<String, Vec<String>>,
}

impl ShorthandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an expansion, replacing any previous one under `name`.
    pub fn insert(&mut self, name: impl Into<String>, expansion: &[&str]) {
        self.entries.insert(
            name.into(),
            expansion.iter().map(|t| t.to_string()).collect(),
        );
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, expansion: &[&str]) -> Self {
        self.insert(name, expansion);
        self
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrites `args` by replacing a matching first token with its
    /// expansion. Non-matching vectors come back unchanged.
    pub fn expand(&self, args: &[String]) -> Vec<String> {
        match args.first().and_then(|first| self.entries.get(first)) {
            Some(expansion) => expansion
                .iter()
                .chain(args.iter().skip(1))
                .cloned()
                .collect(),
            None => args.to_vec(),
        }
    }

    /// Shorthand names starting with `prefix`, in sorted order.
    pub fn names_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.entries
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect()
    }
}
