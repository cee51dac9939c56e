//! Configuration stores for command tree dispatch.
//!
//! Implementations of the `cmdtree_core::ConfigStore` seam:
//!
//! - [`MemoryConfig`] — exact-key table assembled in code, handy for
//!   tests and embedders.
//! - [`FileConfig`] — one YAML or JSON document queried by dotted path,
//!   with the file's nesting mirroring the command tree's paths.
//!
//! # Example
//!
//! ```
//! use cmdtree_config::MemoryConfig;
//! use cmdtree_core::ConfigStore;
//!
//! let config = MemoryConfig::new().with("greet.morning.text", "rise");
//! assert_eq!(config.query("greet.morning.text").as_deref(), Some("rise"));
//! ```

mod error;
mod file;
mod memory;

pub use error::{ConfigError, Result};
pub use file::FileConfig;
pub use memory::MemoryConfig;
