//! Dispatch-time context handed to command actions.
//!
//! An [`Invocation`] bundles everything an action may consult: the node
//! that was dispatched, the path of names that reached it, the residual
//! arguments, and an optional configuration handle. The dispatcher builds
//! one per cycle; the tree itself is never mutated to record who called
//! whom.

use std::fmt;

use crate::command::Command;
use crate::config::ConfigStore;

/// Context for a single action invocation.
///
/// The path excludes the root command's own name and ends with the
/// dispatched node's name, so a root-level dispatch has an empty path and
/// `tool greet morning` yields `["greet", "morning"]`. Configuration keys
/// derive from the same path, which keeps config layout congruent with
/// the command tree.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Command, ConfigStore, Invocation};
///
/// struct Fixed;
/// impl ConfigStore for Fixed {
///     fn query(&self, path: &str) -> Option<String> {
///         (path == "greet.color").then(|| "green".to_string())
///     }
/// }
///
/// let cmd = Command::new("greet");
/// let args = vec!["world".to_string()];
/// let inv = Invocation::new(&cmd, vec!["greet".into()], &args, Some(&Fixed));
///
/// assert_eq!(inv.path_string(), "greet");
/// assert_eq!(inv.args(), ["world"]);
/// assert_eq!(inv.query("color").as_deref(), Some("green"));
/// assert_eq!(inv.query("missing"), None);
/// ```
pub struct Invocation<'a> {
    command: &'a Command,
    path: Vec<String>,
    args: &'a [String],
    config: Option<&'a dyn ConfigStore>,
}

impl<'a> Invocation<'a> {
    pub fn new(
        command: &'a Command,
        path: Vec<String>,
        args: &'a [String],
        config: Option<&'a dyn ConfigStore>,
    ) -> Self {
        Self {
            command,
            path,
            args,
            config,
        }
    }

    /// The dispatched node.
    pub fn command(&self) -> &'a Command {
        self.command
    }

    /// Residual arguments left over after resolution.
    pub fn args(&self) -> &'a [String] {
        self.args
    }

    /// Names from just below the root down to the dispatched node.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// The path joined with dots, empty for a root-level dispatch.
    pub fn path_string(&self) -> String {
        self.path.join(".")
    }

    /// The configuration store supplied to the dispatcher, if any.
    pub fn config(&self) -> Option<&'a dyn ConfigStore> {
        self.config
    }

    /// Fully qualified configuration key for `key` under this command's
    /// path. At the root the bare key is returned unchanged.
    pub fn config_key(&self, key: &str) -> String {
        let path = self.path_string();
        if path.is_empty() {
            key.to_string()
        } else {
            format!("{path}.{key}")
        }
    }

    /// Queries the configuration store for `key` scoped to this command.
    /// `None` when no store is attached or the key is absent.
    pub fn query(&self, key: &str) -> Option<String> {
        self.config?.query(&self.config_key(key))
    }

    /// Error value for actions to return when a required configuration
    /// key has no value.
    pub fn missing_config(&self, key: &str) -> anyhow::Error {
        anyhow::anyhow!("missing config: {}", self.config_key(key))
    }
}

impl fmt::Debug for Invocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("command", &self.command.name)
            .field("path", &self.path)
            .field("args", &self.args)
            .field("config", &self.config.is_some())
            .finish()
    }
}
