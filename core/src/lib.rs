//! Command tree model and shared dispatch primitives.
//!
//! This crate defines the foundational types for rooted command trees:
//!
//! - [`Command`] — one node: name, aliases, embedded docs, children,
//!   params, and the [`Action`] to run when the node is dispatched.
//! - [`Invocation`] — the context handed to an action: dispatched node,
//!   path from the root, residual arguments, configuration handle.
//! - [`ConfigStore`] — the seam through which actions read configuration
//!   values by dotted path.
//! - [`Section`] — a titled block of embedded documentation.
//!
//! Usage inference ([`inferred_usage`], [`alternation`]) derives one-line
//! usage hints from a node's params and children, and validation
//! ([`validate_tree`]) catches structural errors such as empty nodes and
//! duplicate sibling names.
//!
//! The resolution and dispatch machinery lives in `cmdtree-dispatch`;
//! this crate stays free of process concerns so trees can be built and
//! inspected anywhere.
//!
//! # Example
//!
//! ```
//! use cmdtree_core::*;
//!
//! // Build a tree for a fictional tool
//! let root = Command::new("tool")
//!     .with_summary("demo multitool")
//!     .with_child(
//!         Command::new("greet")
//!             .with_child(
//!                 Command::new("morning")
//!                     .with_aliases(["m"])
//!                     .with_action(|inv| {
//!                         println!("good morning {:?}", inv.args());
//!                         Ok(())
//!                     }),
//!             ),
//!     );
//!
//! let greet = root.find_child("greet").unwrap();
//! assert_eq!(greet.find_child("m").unwrap().name, "morning");
//! assert_eq!(inferred_usage(greet), "(m|morning)");
//! assert!(validate_tree(&root).is_empty());
//! ```

mod command;
mod config;
mod invocation;
mod usage;
mod validate;

pub use command::{Action, Command, Completer, Section, UsageFn};
pub use config::ConfigStore;
pub use invocation::Invocation;
pub use usage::{alternation, inferred_usage};
pub use validate::{ValidationError, validate_tree};
