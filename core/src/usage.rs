//! Usage-string inference.
//!
//! When a dispatched action rejects its arguments the dispatcher needs a
//! one-line usage hint. Rather than demanding hand-written usage text for
//! every node, [`inferred_usage`] derives one from the node's params and
//! child names, and [`alternation`] renders the individual groups.
//!
//! # Example
//!
//! ```
//! use cmdtree_core::{Command, inferred_usage};
//!
//! let speak = Command::new("speak")
//!     .with_params(["en", "fr", "de"])
//!     .with_param_bounds(1, 1)
//!     .with_action(|_| Ok(()));
//! assert_eq!(inferred_usage(&speak), "(en|fr|de)");
//! ```

use crate::command::Command;

/// Renders `items` as a usage alternation with repetition bounds.
///
/// Empty items are dropped. A single surviving item renders bare, several
/// render as `(a|b|c)`. Bounds append a `{min,max}` suffix unless they
/// describe a plain single occurrence; an unbounded `max` of `0` renders
/// as `{min,}`.
///
/// # Examples
///
/// ```
/// use cmdtree_core::alternation;
///
/// let langs: Vec<String> = vec!["en".into(), "fr".into()];
/// assert_eq!(alternation(&langs, 1, 1), "(en|fr)");
///
/// let word: Vec<String> = vec!["word".into()];
/// assert_eq!(alternation(&word, 1, 1), "word");
/// assert_eq!(alternation(&word, 2, 0), "word{2,}");
/// assert_eq!(alternation(&[], 1, 1), "");
/// ```
pub fn alternation(items: &[String], min: usize, max: usize) -> String {
    let kept: Vec<&str> = items
        .iter()
        .map(String::as_str)
        .filter(|item| !item.is_empty())
        .collect();
    if kept.is_empty() {
        return String::new();
    }
    let group = if kept.len() == 1 {
        kept[0].to_string()
    } else {
        format!("({})", kept.join("|"))
    };
    match (min, max) {
        (1, 1) | (0, 0) => group,
        (_, 0) => format!("{group}{{{min},}}"),
        _ => format!("{group}{{{min},{max}}}"),
    }
}

/// Derives a usage line for `cmd` from its params and visible children.
///
/// Malformed nodes render an inline `{ERROR: ...}` placeholder instead of
/// failing, so a usage line can always be produced. A node with both
/// params and children renders `(params|children)`; an action-only leaf
/// renders an empty string.
pub fn inferred_usage(cmd: &Command) -> String {
    if cmd.action.is_none() && cmd.children.is_empty() {
        return "{ERROR: neither action nor children defined}".to_string();
    }
    if cmd.action.is_none() && !cmd.params.is_empty() {
        return format!(
            "{{ERROR: params without action: {}}}",
            cmd.params.join(", ")
        );
    }

    let params = alternation(&cmd.params, cmd.min_params, cmd.max_params);
    let child_groups: Vec<String> = cmd
        .children
        .iter()
        .filter(|c| !cmd.is_hidden(&c.name))
        .map(Command::usage_names)
        .collect();
    let names = alternation(&child_groups, 1, 1);

    match (params.is_empty(), names.is_empty()) {
        (false, false) => format!("({params}|{names})"),
        (false, true) => params,
        (true, _) => names,
    }
}
