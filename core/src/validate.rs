//! Structural validation for command trees.
//!
//! Resolution and dispatch are total and never fail on a malformed tree;
//! they degrade to inline error usage text or a runtime dispatch error
//! instead. [`validate_tree`] exists for callers that prefer to fail fast
//! at startup: it walks the whole tree and collects every structural
//! problem it finds.
//!
//! # Examples
//!
//! ```
//! use cmdtree_core::*;
//!
//! let root = Command::new("tool")
//!     .with_child(Command::new("run").with_action(|_| Ok(())));
//! assert!(validate_tree(&root).is_empty());
//!
//! // Invalid: a node with nothing to do and nowhere to go
//! let broken = Command::new("tool").with_child(Command::new("stub"));
//! assert!(!validate_tree(&broken).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::command::Command;

/// A structural problem found in a command tree.
///
/// Each variant describes a specific defect. The `Display` impl provides
/// a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A non-root node has an empty name and can never be resolved.
    #[error("unnamed command under {parent:?}")]
    UnnamedCommand { parent: String },
    /// Params guide an action's arguments; without an action they are
    /// unreachable.
    #[error("{name:?} declares params without an action")]
    ParamsWithoutAction { name: String },
    /// A node with neither an action nor children can never do anything.
    #[error("{name:?} defines neither an action nor children")]
    NoActionNoChildren { name: String },
    /// Two siblings answer to the same name or alias; resolution will
    /// always pick the first declared one.
    #[error("duplicate name or alias {token:?} among children of {parent:?}")]
    DuplicateSibling { parent: String, token: String },
    /// `min_params` exceeds a bounded `max_params`.
    #[error("{name:?} has min_params {min} greater than max_params {max}")]
    ParamBounds { name: String, min: usize, max: usize },
}

/// Walks `root` and collects every structural error in the tree.
///
/// The root itself may be unnamed (multicall registration supplies its
/// invocation name), but its content and all descendants are checked.
pub fn validate_tree(root: &Command) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    check_content(root, &mut errors);
    check_children(root, &mut errors);
    errors
}

fn check_content(node: &Command, errors: &mut Vec<ValidationError>) {
    if node.action.is_none() && node.children.is_empty() {
        errors.push(ValidationError::NoActionNoChildren {
            name: node.name.clone(),
        });
    } else if node.action.is_none() && !node.params.is_empty() {
        errors.push(ValidationError::ParamsWithoutAction {
            name: node.name.clone(),
        });
    }
    if node.max_params != 0 && node.min_params > node.max_params {
        errors.push(ValidationError::ParamBounds {
            name: node.name.clone(),
            min: node.min_params,
            max: node.max_params,
        });
    }
}

fn check_children(parent: &Command, errors: &mut Vec<ValidationError>) {
    let mut seen: HashSet<String> = HashSet::new();
    for child in &parent.children {
        if child.name.is_empty() {
            errors.push(ValidationError::UnnamedCommand {
                parent: parent.name.clone(),
            });
        }
        for token in child.names() {
            if !token.is_empty() && !seen.insert(token.clone()) {
                errors.push(ValidationError::DuplicateSibling {
                    parent: parent.name.clone(),
                    token,
                });
            }
        }
        check_content(child, errors);
        check_children(child, errors);
    }
}
