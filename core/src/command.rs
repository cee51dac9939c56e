//! The command tree node type and its construction helpers.
//!
//! A [`Command`] is one node in a rooted tree: it names itself, optionally
//! carries an [`Action`] to run when dispatched, and lists child commands
//! and parameter literals that guide resolution and completion. Trees are
//! built declaratively with struct literals or fluent builders, then handed
//! to a dispatcher by shared reference; nothing in the tree is mutated
//! while it is being resolved.
//!
//! # Example
//!
//! ```
//! use cmdtree_core::Command;
//!
//! let git = Command::new("git")
//!     .with_summary("toy version control")
//!     .with_child(
//!         Command::new("checkout")
//!             .with_aliases(["co"])
//!             .with_action(|inv| {
//!                 println!("checking out {:?}", inv.args());
//!                 Ok(())
//!             }),
//!     );
//!
//! let checkout = git.find_child("co").unwrap();
//! assert_eq!(checkout.name, "checkout");
//! assert_eq!(checkout.usage_names(), "(co|checkout)");
//! ```

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::invocation::Invocation;
use crate::usage;

/// Work performed when a command is dispatched.
///
/// Receives the full [`Invocation`] context: the dispatched node, the path
/// that reached it, the residual arguments and the optional configuration
/// handle. Failures are opaque [`anyhow::Error`] values reported verbatim
/// by the dispatcher.
pub type Action = Arc<dyn Fn(&Invocation<'_>) -> anyhow::Result<()> + Send + Sync>;

/// Completion override for a single node.
///
/// Given the node and the residual arguments of a completion query, returns
/// the candidate list. When present it fully replaces the default
/// visible-children-and-params behavior.
pub type Completer = Arc<dyn Fn(&Command, &[String]) -> Vec<String> + Send + Sync>;

/// Usage-string override for a single node, consulted before the
/// dispatcher's default inference when reporting argument-arity errors.
pub type UsageFn = Arc<dyn Fn(&Command) -> String + Send + Sync>;

/// A titled block of embedded documentation attached to a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: String,
    pub body: String,
}

impl Section {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// One node of a command tree.
///
/// Every field is public so trees can be written as nested struct literals
/// in the style of a declarative manifest, with `..Default::default()`
/// closing each node. The fluent `with_*` builders cover the common cases.
///
/// A node is useful when it has an [`Action`], children, or both. A node
/// with an action is directly runnable; a node with children routes
/// resolution further down; a node with both runs its action only when no
/// child name follows it on the command line.
///
/// Serialization covers the declarative surface (names, docs, children,
/// params) and skips runtime capabilities and arity bounds, so a
/// serialized tree is a faithful structural snapshot.
///
/// # Examples
///
/// Struct-literal construction:
///
/// ```
/// use cmdtree_core::Command;
///
/// let cmd = Command {
///     name: "serve".into(),
///     summary: "start the demo server".into(),
///     params: vec!["8080".into(), "9090".into()],
///     min_params: 0,
///     max_params: 1,
///     ..Default::default()
/// };
/// assert_eq!(cmd.usage_names(), "serve");
/// ```
#[derive(Clone, Default, Serialize)]
pub struct Command {
    /// Single lowercase word used to reach this node during resolution.
    /// May be empty only on a root node.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Alternative names that resolve to this node. An exact sibling name
    /// always wins over an alias.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    /// One-line description used in summary listings.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub summary: String,

    /// Hand-written usage text. When set it wins over [`Command::usage_fn`]
    /// and the dispatcher's inference in arity error messages.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub usage: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub version: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub copyright: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub license: String,

    /// Long-form embedded documentation.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Child commands in declaration order. Order is meaningful: it sets
    /// resolution precedence among duplicates and selects the default
    /// child when this node has no action of its own.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Command>,

    /// Parameter literals accepted by this node's action, used for usage
    /// inference and completion. Only meaningful alongside an action.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,

    /// Names of children or params suppressed from completion and
    /// summary listings. Hidden entries still resolve normally.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hidden: Vec<String>,

    /// Additional titled documentation sections.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<Section>,

    /// Work to run when this node is the dispatch target.
    #[serde(skip)]
    pub action: Option<Action>,

    /// Completion override replacing the default candidate generation.
    #[serde(skip)]
    pub completer: Option<Completer>,

    /// Usage-string override for arity error messages.
    #[serde(skip)]
    pub usage_fn: Option<UsageFn>,

    /// Minimum number of residual arguments the action requires.
    #[serde(skip)]
    pub min_args: usize,

    /// Minimum number of params; rendered as a repetition bound in
    /// inferred usage.
    #[serde(skip)]
    pub min_params: usize,

    /// Maximum number of params, `0` meaning unbounded.
    #[serde(skip)]
    pub max_params: usize,

    /// Refuse to dispatch this node unless the dispatcher carries a
    /// configuration store. Set on a root, it gates the whole tree.
    #[serde(skip)]
    pub requires_config: bool,
}

impl Command {
    /// Creates a named node with everything else empty.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Appends a child built from a name and aliases and returns a mutable
    /// reference to it, for callers assembling trees imperatively.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdtree_core::Command;
    ///
    /// let mut root = Command::new("tool");
    /// root.add("version", &["v"]).summary = "print version".into();
    /// assert_eq!(root.find_child("v").unwrap().name, "version");
    /// ```
    pub fn add(&mut self, name: impl Into<String>, aliases: &[&str]) -> &mut Command {
        let mut child = Command::new(name);
        child.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self.children.push(child);
        self.children
            .last_mut()
            .expect("children is non-empty after push")
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Sets a literal usage string, which takes precedence over any
    /// usage function when a usage error is reported.
    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_copyright(mut self, copyright: impl Into<String>) -> Self {
        self.copyright = copyright.into();
        self
    }

    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = license.into();
        self
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_hidden<I, S>(mut self, hidden: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hidden = hidden.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the param repetition bounds; `max` of `0` means unbounded.
    pub fn with_param_bounds(mut self, min: usize, max: usize) -> Self {
        self.min_params = min;
        self.max_params = max;
        self
    }

    pub fn with_min_args(mut self, min_args: usize) -> Self {
        self.min_args = min_args;
        self
    }

    pub fn with_child(mut self, child: Command) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_action<F>(mut self, action: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(action));
        self
    }

    pub fn with_completer<F>(mut self, completer: F) -> Self
    where
        F: Fn(&Command, &[String]) -> Vec<String> + Send + Sync + 'static,
    {
        self.completer = Some(Arc::new(completer));
        self
    }

    pub fn with_usage_fn<F>(mut self, usage_fn: F) -> Self
    where
        F: Fn(&Command) -> String + Send + Sync + 'static,
    {
        self.usage_fn = Some(Arc::new(usage_fn));
        self
    }

    pub fn require_config(mut self) -> Self {
        self.requires_config = true;
        self
    }

    /// All names this node answers to: aliases first, primary name last.
    pub fn names(&self) -> Vec<String> {
        let mut names = self.aliases.clone();
        names.push(self.name.clone());
        names
    }

    /// Renders this node's names as a usage alternation, e.g.
    /// `(co|checkout)` for an aliased node or a bare name otherwise.
    pub fn usage_names(&self) -> String {
        usage::alternation(&self.names(), 1, 1)
    }

    /// Finds the child a command-line token selects.
    ///
    /// An exact name match over all children takes precedence over any
    /// alias match; within each pass the first declared match wins, which
    /// keeps resolution deterministic even when siblings collide.
    pub fn find_child(&self, token: &str) -> Option<&Command> {
        self.children
            .iter()
            .find(|c| c.name == token)
            .or_else(|| {
                self.children
                    .iter()
                    .find(|c| c.aliases.iter().any(|a| a == token))
            })
    }

    /// Names of all children in declaration order, hidden ones included
    /// and unnamed ones skipped.
    pub fn child_names(&self) -> Vec<String> {
        self.children
            .iter()
            .filter(|c| !c.name.is_empty())
            .map(|c| c.name.clone())
            .collect()
    }

    /// Child names followed by param literals, with hidden entries
    /// removed. This is the default completion candidate pool.
    pub fn visible_entries(&self) -> Vec<String> {
        self.child_names()
            .into_iter()
            .chain(self.params.iter().cloned())
            .filter(|entry| !self.is_hidden(entry))
            .collect()
    }

    pub fn is_hidden(&self, entry: &str) -> bool {
        self.hidden.iter().any(|h| h == entry)
    }

    /// Looks up an embedded documentation section by its title.
    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }

    /// `name - summary` when a summary is present, the bare name
    /// otherwise.
    pub fn title(&self) -> String {
        if self.summary.is_empty() {
            self.name.clone()
        } else {
            format!("{} - {}", self.name, self.summary)
        }
    }

    /// Copyright, license and version folded into a short legal notice.
    /// Empty when no copyright is set.
    pub fn legal(&self) -> String {
        match (
            self.copyright.is_empty(),
            self.license.is_empty(),
            self.version.is_empty(),
        ) {
            (true, _, _) => String::new(),
            (false, true, true) => format!("{} {}", self.name, self.copyright),
            (false, true, false) => {
                format!("{} ({}) {}", self.name, self.version, self.copyright)
            }
            (false, false, true) => {
                format!("{} {}\nLicense: {}", self.name, self.copyright, self.license)
            }
            (false, false, false) => format!(
                "{} ({}) {}\nLicense: {}",
                self.name, self.version, self.copyright, self.license
            ),
        }
    }

    /// One aligned `name - summary` line per visible child, names padded
    /// to the widest visible name.
    pub fn summaries(&self) -> Vec<String> {
        let visible: Vec<&Command> = self
            .children
            .iter()
            .filter(|c| !self.is_hidden(&c.name))
            .collect();
        let width = visible.iter().map(|c| c.name.len()).max().unwrap_or(0);
        visible
            .iter()
            .map(|c| {
                if c.summary.is_empty() {
                    c.name.clone()
                } else {
                    format!("{:width$} - {}", c.name, c.summary)
                }
            })
            .collect()
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("children", &self.children)
            .field("params", &self.params)
            .field("hidden", &self.hidden)
            .field("min_args", &self.min_args)
            .field("min_params", &self.min_params)
            .field("max_params", &self.max_params)
            .field("requires_config", &self.requires_config)
            .field("action", &self.action.is_some())
            .field("completer", &self.completer.is_some())
            .field("usage_fn", &self.usage_fn.is_some())
            .finish()
    }
}
