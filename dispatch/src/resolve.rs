//! Greedy resolution of argument vectors against a command tree.
//!
//! Resolution walks from the root, consuming one token per matched child
//! name or alias, and stops at the first token that matches nothing. It
//! never backtracks and never fails: the worst case is the root itself
//! with every argument left over.
//!
//! # Example
//!
//! ```
//! use cmdtree_core::Command;
//! use cmdtree_dispatch::resolve;
//!
//! let root = Command::new("tool").with_child(
//!     Command::new("greet")
//!         .with_child(Command::new("morning").with_aliases(["m"]).with_action(|_| Ok(()))),
//! );
//!
//! let args: Vec<String> = vec!["greet".into(), "m".into(), "world".into()];
//! let res = resolve(&root, &args);
//! assert_eq!(res.command.name, "morning");
//! assert_eq!(res.rest, ["world"]);
//! assert_eq!(res.path(), ["greet", "morning"]);
//! ```

use cmdtree_core::Command;

/// Outcome of resolving an argument vector: the deepest matched node, the
/// ancestors walked to reach it, and the arguments left unconsumed.
#[derive(Debug)]
pub struct Resolution<'a> {
    /// Deepest node the argument vector selected.
    pub command: &'a Command,
    /// Ancestors of `command` from the root down, excluding `command`
    /// itself. Empty when the root resolved to itself.
    pub trail: Vec<&'a Command>,
    /// Arguments left over once descent stopped.
    pub rest: &'a [String],
}

impl Resolution<'_> {
    /// Display and configuration path for the resolved node; see
    /// [`display_path`].
    pub fn path(&self) -> Vec<String> {
        display_path(&self.trail, self.command)
    }
}

/// Resolves `args` against the tree rooted at `root`.
///
/// Each token is matched with [`Command::find_child`], so aliases work at
/// every level and an exact sibling name beats an alias. Descent is
/// greedy: the first token with no match ends it, and that token plus
/// everything after it is returned untouched.
pub fn resolve<'a>(root: &'a Command, args: &'a [String]) -> Resolution<'a> {
    let mut command = root;
    let mut trail = Vec::new();
    let mut consumed = 0;
    for token in args {
        match command.find_child(token) {
            Some(child) => {
                trail.push(command);
                command = child;
                consumed += 1;
            }
            None => break,
        }
    }
    Resolution {
        command,
        trail,
        rest: &args[consumed..],
    }
}

/// Names from just below the root down to `target` inclusive.
///
/// The root's own name is excluded, so a root-level target yields an
/// empty path. Joined with dots this becomes the configuration key
/// prefix for the target's actions.
pub fn display_path(trail: &[&Command], target: &Command) -> Vec<String> {
    let mut names: Vec<String> = trail.iter().map(|c| c.name.clone()).collect();
    names.push(target.name.clone());
    names.split_off(1)
}
