//! File-backed configuration store.
//!
//! Loads a whole YAML or JSON document once and answers dotted-path
//! queries against it, so a tree of commands shares one file whose
//! nesting mirrors the command paths.
//!
//! # Example YAML
//!
//! ```yaml
//! motd: welcome
//! greet:
//!   color: green
//!   morning:
//!     text: rise and shine
//! ```
//!
//! `greet.morning.text` answers `rise and shine`; `greet` itself is a
//! mapping and answers nothing.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use cmdtree_core::ConfigStore;
use serde_yaml::Value;

use crate::error::{ConfigError, Result};

/// A read-only configuration store backed by one YAML or JSON file.
///
/// The format is chosen by file extension (`.yaml`/`.yml` or `.json`);
/// both parse into the same document model, so queries behave
/// identically. Only scalar leaves (strings, numbers, booleans) produce
/// values; null and structured nodes report absence.
///
/// # Examples
///
/// ```no_run
/// use cmdtree_config::FileConfig;
/// use cmdtree_core::ConfigStore;
///
/// let config = FileConfig::load("tool.yaml").unwrap();
/// if let Some(color) = config.query("greet.color") {
///     println!("greeting in {color}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileConfig {
    root: Value,
}

impl FileConfig {
    /// Loads and parses the file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let reader = BufReader::new(File::open(path)?);
        let root = match extension.as_str() {
            "yaml" | "yml" => serde_yaml::from_reader(reader)?,
            "json" => {
                let document: serde_json::Value = serde_json::from_reader(reader)?;
                serde_yaml::to_value(document)?
            }
            _ => {
                return Err(ConfigError::UnsupportedFormat(
                    path.display().to_string(),
                ));
            }
        };
        Ok(Self { root })
    }

    fn lookup(&self, path: &str) -> Option<&Value> {
        let mut current = &self.root;
        for segment in path.split('.') {
            current = current.get(segment)?;
        }
        Some(current)
    }
}

impl ConfigStore for FileConfig {
    fn query(&self, path: &str) -> Option<String> {
        match self.lookup(path)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}
