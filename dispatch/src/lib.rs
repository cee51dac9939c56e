//! Command tree resolution, dispatch, completion and multicall.
//!
//! This crate is the engine that turns a `cmdtree_core` tree into a
//! running program. It resolves argument vectors to dispatch targets,
//! enforces each node's declared requirements, answers shell completion
//! queries over the same tree, expands first-argument shorthands, and
//! maps invocation identities for multicall binaries.
//!
//! # Main entry points
//!
//! - [`Dispatcher::run`] — dispatch the process's own arguments and exit
//!   with the mapped status.
//! - [`Dispatcher::execute`] — the same cycle as a pure call, for
//!   embedding and testing.
//! - [`Multicall::run`] — dispatch by invocation identity (`argv[0]`).
//! - [`resolve`] — just the tree walk, no dispatch.
//! - [`complete_line`] — just the completion answer for a command line.
//!
//! # Example
//!
//! ```
//! use cmdtree_core::Command;
//! use cmdtree_dispatch::{Dispatcher, Outcome, ShorthandTable};
//!
//! let root = Command::new("tool").with_child(
//!     Command::new("greet").with_child(
//!         Command::new("morning")
//!             .with_aliases(["m"])
//!             .with_action(|inv| {
//!                 println!("good morning {}", inv.args().join(" "));
//!                 Ok(())
//!             }),
//!     ),
//! );
//!
//! let dispatcher = Dispatcher::new()
//!     .with_shorthand(ShorthandTable::new().with("gm", &["greet", "morning"]))
//!     .with_exit(false);
//!
//! // "tool gm world" and "tool greet m world" mean the same thing.
//! let args: Vec<String> = vec!["gm".into(), "world".into()];
//! let outcome = dispatcher.execute(&root, &args, None);
//! assert!(matches!(outcome, Outcome::Dispatched));
//! ```

use std::io::{self, Read};

pub mod complete;
pub mod dispatcher;
pub mod error;
pub mod multicall;
pub mod resolve;
pub mod shorthand;

pub use complete::{candidates, complete_line, split_line};
pub use dispatcher::{COMPLETION_LINE_VAR, Dispatcher, Outcome};
pub use error::DispatchError;
pub use multicall::{Multicall, invocation_name};
pub use resolve::{Resolution, display_path, resolve};
pub use shorthand::ShorthandTable;

/// Joins `args` with single spaces, or reads standard input to end when
/// there are none, trimming one trailing newline.
///
/// Lets an action accept its text equally from arguments or a pipe:
/// `tool echo hello` and `echo hello | tool echo` look the same to the
/// action.
pub fn args_or_stdin(args: &[String]) -> io::Result<String> {
    if !args.is_empty() {
        return Ok(args.join(" "));
    }
    let mut text = String::new();
    io::stdin().read_to_string(&mut text)?;
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    Ok(text)
}
