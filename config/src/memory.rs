//! In-memory configuration store.

use std::collections::BTreeMap;

use cmdtree_core::ConfigStore;

/// A configuration store over an in-memory key table.
///
/// Keys are full dotted paths matched exactly. Useful for tests and for
/// embedders that assemble configuration programmatically.
///
/// # Examples
///
/// ```
/// use cmdtree_config::MemoryConfig;
/// use cmdtree_core::ConfigStore;
///
/// let config = MemoryConfig::new()
///     .with("greet.color", "green")
///     .with("motd", "hello");
///
/// assert_eq!(config.query("greet.color").as_deref(), Some("green"));
/// assert_eq!(config.query("greet"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryConfig {
    values: BTreeMap<String, String>,
}

impl MemoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, path: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(path, value);
        self
    }

    /// Stores `value` under the full dotted `path`, replacing any
    /// previous value.
    pub fn set(&mut self, path: impl Into<String>, value: impl Into<String>) {
        self.values.insert(path.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

impl ConfigStore for MemoryConfig {
    fn query(&self, path: &str) -> Option<String> {
        self.values.get(path).cloned()
    }
}
