//! Dispatch failure classification.
//!
//! Every way a dispatch cycle can fail maps to one [`DispatchError`]
//! variant. All of them share a single nonzero exit status; the variants
//! exist so embedders and tests can tell the failure classes apart and so
//! each one renders its own message.

use thiserror::Error;

/// A failed dispatch cycle.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The resolved node can never act: no action and no children, or
    /// params declared without an action to consume them.
    #[error("malformed command {name:?}: {detail}")]
    MalformedNode { name: String, detail: String },

    /// The action's argument-arity requirement was not met.
    #[error("{text}: {name} {usage}")]
    Usage {
        text: String,
        name: String,
        usage: String,
    },

    /// No action is reachable from the resolved node, not even through
    /// the default-child fallback.
    #[error("{0:?} has not yet been implemented")]
    Unimplemented(String),

    /// The node demands a configuration store and the dispatcher carries
    /// none.
    #[error("{0:?} requires a configuration store and none was supplied")]
    MissingConfig(String),

    /// The executable was invoked under a name with no registered
    /// command tree.
    #[error("unmapped multicall command: {0}")]
    UnmappedMulticall(String),

    /// The action itself failed; its message is reported verbatim.
    #[error(transparent)]
    Action(#[from] anyhow::Error),

    /// A panic escaped an action and was trapped by the dispatcher.
    #[error("{0}")]
    Fault(String),
}
