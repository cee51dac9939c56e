//! Configuration access seam between the dispatcher and storage backends.

/// Read-only source of configuration values addressed by dotted path.
///
/// The engine never interprets values: a store returns the raw text for a
/// path like `greet.color` or reports absence with `None`. Absence and
/// empty string are distinct answers and both meaningful to callers.
///
/// Implementations live outside the dispatch engine (see the
/// `cmdtree-config` crate); actions reach the store through
/// [`Invocation::query`](crate::Invocation::query), which scopes keys to
/// the dispatched command's path.
pub trait ConfigStore: Send + Sync {
    /// Returns the value stored at `path`, if any.
    fn query(&self, path: &str) -> Option<String>;
}
