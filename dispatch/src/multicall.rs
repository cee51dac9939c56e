//! Multicall binaries: one executable, several command identities.
//!
//! A multicall binary inspects the name it was invoked under (its
//! `argv[0]`, typically varied through hardlinks or symlinks) and
//! dispatches a different command tree, or a different subtree, for each
//! identity. Registrations may prepend arguments, so a link named
//! `greet` can land inside a larger tool's `greet` branch.
//!
//! # Example
//!
//! ```no_run
//! use cmdtree_core::Command;
//! use cmdtree_dispatch::{Dispatcher, Multicall};
//!
//! let tree = || {
//!     Command::new("tool").with_child(
//!         Command::new("greet").with_action(|inv| {
//!             println!("hello {:?}", inv.args());
//!             Ok(())
//!         }),
//!     )
//! };
//!
//! Multicall::new(Dispatcher::new())
//!     .register("tool", tree(), &[])
//!     .register("greet", tree(), &["greet"])
//!     .run();
//! ```

use std::collections::BTreeMap;
use std::env;
use std::path::Path;

use cmdtree_core::Command;
use tracing::debug;

use crate::complete::split_line;
use crate::dispatcher::{COMPLETION_LINE_VAR, Dispatcher, Outcome};
use crate::error::DispatchError;

struct Registration {
    command: Command,
    prepend: Vec<String>,
}

/// Maps invocation names to command trees and dispatches by identity.
pub struct Multicall {
    dispatcher: Dispatcher,
    table: BTreeMap<String, Registration>,
}

impl Multicall {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            table: BTreeMap::new(),
        }
    }

    /// Registers `command` under an invocation name. `prepend` tokens are
    /// inserted ahead of the real arguments on every dispatch, which is
    /// how a registration selects a subtree of a larger tool.
    pub fn register(
        mut self,
        name: impl Into<String>,
        command: Command,
        prepend: &[&str],
    ) -> Self {
        self.table.insert(
            name.into(),
            Registration {
                command,
                prepend: prepend.iter().map(|t| t.to_string()).collect(),
            },
        );
        self
    }

    /// Registered invocation names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.table.keys().cloned().collect()
    }

    /// Determines the process identity, dispatches accordingly, prints
    /// and exits per the wrapped dispatcher's policy.
    pub fn run(&self) -> Outcome {
        let invoked = invocation_name().unwrap_or_default();
        let args: Vec<String> = env::args_os()
            .skip(1)
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        let completion_line = env::var(COMPLETION_LINE_VAR)
            .ok()
            .filter(|line| !line.is_empty());
        let outcome = self.execute(&invoked, &args, completion_line.as_deref());
        self.dispatcher.finish(outcome)
    }

    /// Dispatches `args` under the identity `invoked` without touching
    /// the process environment.
    ///
    /// Prepend tokens apply to completion lines too, so an identity that
    /// selects a subtree completes at that subtree rather than at the
    /// registered root.
    pub fn execute(
        &self,
        invoked: &str,
        args: &[String],
        completion_line: Option<&str>,
    ) -> Outcome {
        let Some(registration) = self.table.get(invoked) else {
            return Outcome::Failed(DispatchError::UnmappedMulticall(invoked.to_string()));
        };
        debug!(
            invoked,
            prepend = registration.prepend.len(),
            "multicall identity selected"
        );
        let full: Vec<String> = registration
            .prepend
            .iter()
            .chain(args.iter())
            .cloned()
            .collect();
        let spliced = completion_line.map(|line| splice_prepend(line, &registration.prepend));
        self.dispatcher
            .execute(&registration.command, &full, spliced.as_deref())
    }
}

// Inserts prepend tokens after the program name of a completion line,
// preserving a trailing empty token through the rejoin.
fn splice_prepend(line: &str, prepend: &[String]) -> String {
    let tokens = split_line(line);
    if prepend.is_empty() || tokens.len() < 2 {
        return line.to_string();
    }
    let mut rebuilt: Vec<&str> = vec![tokens[0].as_str()];
    rebuilt.extend(prepend.iter().map(String::as_str));
    rebuilt.extend(tokens.iter().skip(1).map(String::as_str));
    rebuilt.join(" ")
}

/// The name this process was invoked under: the file stem of `argv[0]`,
/// falling back to the current executable's stem when `argv[0]` is
/// missing or empty.
pub fn invocation_name() -> Option<String> {
    let from_argv = env::args_os().next().and_then(|argv0| stem(argv0.as_ref()));
    match from_argv {
        Some(name) if !name.is_empty() => Some(name),
        _ => env::current_exe().ok().and_then(|path| stem(&path)),
    }
}

fn stem(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().into_owned())
}
