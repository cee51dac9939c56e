//! The dispatch cycle.
//!
//! A [`Dispatcher`] owns everything a dispatch needs besides the tree
//! itself: shorthand expansions, an optional configuration store, usage
//! wording, and process-exit policy. All of it is explicit state supplied
//! at the entry point; there are no process-wide tables to populate.
//!
//! The cycle in order: answer a pending completion query, expand a
//! shorthand first argument, resolve the tree, fall back to the default
//! child when the target has no action, enforce the argument minimum and
//! the configuration requirement, then invoke the action with its
//! [`Invocation`] context.
//!
//! # Example
//!
//! ```
//! use cmdtree_core::Command;
//! use cmdtree_dispatch::{Dispatcher, Outcome};
//!
//! let root = Command::new("tool").with_child(
//!     Command::new("greet").with_action(|inv| {
//!         println!("hello {:?}", inv.args());
//!         Ok(())
//!     }),
//! );
//!
//! let dispatcher = Dispatcher::new().with_exit(false);
//! let args: Vec<String> = vec!["greet".into(), "world".into()];
//! let outcome = dispatcher.execute(&root, &args, None);
//! assert!(matches!(outcome, Outcome::Dispatched));
//! assert_eq!(outcome.status(), 0);
//! ```

use std::any::Any;
use std::env;
use std::panic::{self, AssertUnwindSafe};
use std::process;
use std::sync::Arc;

use cmdtree_core::{Command, ConfigStore, Invocation, UsageFn, inferred_usage};
use tracing::{debug, error};

use crate::complete;
use crate::error::DispatchError;
use crate::resolve::{display_path, resolve};
use crate::shorthand::ShorthandTable;

/// Environment variable through which completion-capable shells hand over
/// the line being completed (the bash `complete -C` protocol).
pub const COMPLETION_LINE_VAR: &str = "COMP_LINE";

/// Result of one dispatch cycle.
///
/// Successful dispatch and answered completion queries both map to exit
/// status `0`; every failure maps to `1`, with the error message carrying
/// the distinction.
#[derive(Debug)]
pub enum Outcome {
    /// An action ran to successful completion.
    Dispatched,
    /// A completion query was answered with these candidates.
    Completed(Vec<String>),
    /// The cycle failed.
    Failed(DispatchError),
}

impl Outcome {
    pub fn status(&self) -> i32 {
        match self {
            Outcome::Failed(_) => 1,
            _ => 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status() == 0
    }
}

/// Entry point and settings for dispatching argument vectors against a
/// command tree.
///
/// # Examples
///
/// ```
/// use cmdtree_dispatch::{Dispatcher, ShorthandTable};
///
/// let dispatcher = Dispatcher::new()
///     .with_shorthand(ShorthandTable::new().with("gm", &["greet", "morning"]))
///     .with_usage_text("usage")
///     .with_exit(false);
/// # let _ = dispatcher;
/// ```
pub struct Dispatcher {
    shorthand: ShorthandTable,
    config: Option<Arc<dyn ConfigStore>>,
    usage_text: String,
    usage_fn: UsageFn,
    exit: bool,
    allow_panic: bool,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self {
            shorthand: ShorthandTable::new(),
            config: None,
            usage_text: "usage".to_string(),
            usage_fn: Arc::new(inferred_usage),
            exit: true,
            allow_panic: false,
        }
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the shorthand table consulted for the first argument.
    pub fn with_shorthand(mut self, shorthand: ShorthandTable) -> Self {
        self.shorthand = shorthand;
        self
    }

    /// Attaches the configuration store handed to actions.
    pub fn with_config(mut self, config: impl ConfigStore + 'static) -> Self {
        self.config = Some(Arc::new(config));
        self
    }

    /// Replaces the word prefixing usage errors, e.g. for localization.
    pub fn with_usage_text(mut self, text: impl Into<String>) -> Self {
        self.usage_text = text.into();
        self
    }

    /// Replaces the default usage inference applied to nodes without
    /// their own usage function.
    pub fn with_usage_fn<F>(mut self, usage_fn: F) -> Self
    where
        F: Fn(&Command) -> String + Send + Sync + 'static,
    {
        self.usage_fn = Arc::new(usage_fn);
        self
    }

    /// Controls whether [`run`](Self::run) terminates the process. On by
    /// default; disable to embed the dispatcher in a larger program.
    pub fn with_exit(mut self, exit: bool) -> Self {
        self.exit = exit;
        self
    }

    /// Lets panics escape instead of trapping them as faults, which is
    /// mainly useful under test harnesses.
    pub fn with_allow_panic(mut self, allow_panic: bool) -> Self {
        self.allow_panic = allow_panic;
        self
    }

    pub fn shorthand(&self) -> &ShorthandTable {
        &self.shorthand
    }

    /// Dispatches the process's own argument vector against `root`.
    ///
    /// Completion requests are detected through [`COMPLETION_LINE_VAR`],
    /// candidates go to stdout, failures to stderr. Unless exiting was
    /// disabled this terminates the process with the outcome's status.
    /// Arguments are decoded lossily, so non-UTF-8 bytes become
    /// replacement characters rather than faults.
    pub fn run(&self, root: &Command) -> Outcome {
        let args: Vec<String> = env::args_os()
            .skip(1)
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        let completion_line = env::var(COMPLETION_LINE_VAR)
            .ok()
            .filter(|line| !line.is_empty());
        let outcome = self.execute(root, &args, completion_line.as_deref());
        self.finish(outcome)
    }

    /// Runs one dispatch cycle without touching the process environment,
    /// printing nothing and exiting never. This is the embeddable and
    /// testable face of [`run`](Self::run).
    pub fn execute(
        &self,
        root: &Command,
        args: &[String],
        completion_line: Option<&str>,
    ) -> Outcome {
        if self.allow_panic {
            return self.cycle(root, args, completion_line);
        }
        match panic::catch_unwind(AssertUnwindSafe(|| self.cycle(root, args, completion_line))) {
            Ok(outcome) => outcome,
            Err(payload) => {
                let message = fault_message(payload);
                error!(message = %message, "dispatch cycle panicked");
                Outcome::Failed(DispatchError::Fault(message))
            }
        }
    }

    pub(crate) fn finish(&self, outcome: Outcome) -> Outcome {
        match &outcome {
            Outcome::Dispatched => {}
            Outcome::Completed(candidates) => {
                for candidate in candidates {
                    println!("{candidate}");
                }
            }
            Outcome::Failed(err) => eprintln!("{err}"),
        }
        if self.exit {
            process::exit(outcome.status());
        }
        outcome
    }

    fn cycle(&self, root: &Command, args: &[String], completion_line: Option<&str>) -> Outcome {
        if let Some(line) = completion_line {
            let candidates = complete::complete_line(root, line, &self.shorthand);
            debug!(line, count = candidates.len(), "answered completion query");
            return Outcome::Completed(candidates);
        }

        let args = self.shorthand.expand(args);
        let resolution = resolve(root, &args);
        debug!(
            command = %resolution.command.name,
            residual = resolution.rest.len(),
            "resolved dispatch target"
        );

        let mut trail = resolution.trail;
        let mut target = resolution.command;
        let rest = resolution.rest;

        let action = match &target.action {
            Some(action) => action.clone(),
            None => {
                if target.children.is_empty() {
                    let detail = if target.params.is_empty() {
                        "neither action nor children defined"
                    } else {
                        "params declared without an action"
                    };
                    return Outcome::Failed(DispatchError::MalformedNode {
                        name: target.name.clone(),
                        detail: detail.to_string(),
                    });
                }
                let first = &target.children[0];
                match &first.action {
                    Some(action) => {
                        debug!(from = %target.name, to = %first.name, "default child selected");
                        trail.push(target);
                        target = first;
                        action.clone()
                    }
                    None => {
                        return Outcome::Failed(DispatchError::Unimplemented(
                            target.name.clone(),
                        ));
                    }
                }
            }
        };

        if rest.len() < target.min_args {
            return Outcome::Failed(self.usage_error(target));
        }

        if (target.requires_config || root.requires_config) && self.config.is_none() {
            return Outcome::Failed(DispatchError::MissingConfig(target.name.clone()));
        }

        let path = display_path(&trail, target);
        let invocation = Invocation::new(target, path, rest, self.config.as_deref());
        match action(&invocation) {
            Ok(()) => Outcome::Dispatched,
            Err(err) => Outcome::Failed(DispatchError::Action(err)),
        }
    }

    // Usage precedence: the node's literal usage string, then its usage
    // function, then the dispatcher-wide default.
    fn usage_error(&self, target: &Command) -> DispatchError {
        let usage = if !target.usage.is_empty() {
            target.usage.clone()
        } else {
            match &target.usage_fn {
                Some(usage_fn) => usage_fn(target),
                None => (self.usage_fn)(target),
            }
        };
        DispatchError::Usage {
            text: self.usage_text.clone(),
            name: target.name.clone(),
            usage,
        }
    }
}

fn fault_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "dispatch fault".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    type CallLog = Arc<Mutex<Vec<(String, Vec<String>)>>>;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    fn recording(log: CallLog) -> impl Fn(&Invocation<'_>) -> anyhow::Result<()> {
        move |inv| {
            log.lock()
                .unwrap()
                .push((inv.path_string(), inv.args().to_vec()));
            Ok(())
        }
    }

    fn tree(log: &CallLog) -> Command {
        Command::new("tool")
            .with_child(
                Command::new("checkout")
                    .with_aliases(["co"])
                    .with_child(Command::new("main").with_action(recording(log.clone())))
                    .with_child(Command::new("branch").with_action(recording(log.clone()))),
            )
            .with_child(
                Command::new("upper")
                    .with_params(["word", "text"])
                    .with_param_bounds(1, 0)
                    .with_min_args(1)
                    .with_action(recording(log.clone())),
            )
    }

    fn quiet() -> Dispatcher {
        Dispatcher::new().with_exit(false)
    }

    #[test]
    fn test_dispatch_records_path_and_residual_args() {
        let log: CallLog = Arc::default();
        let root = tree(&log);
        let outcome = quiet().execute(&root, &args(&["checkout", "main", "--force"]), None);
        assert!(matches!(outcome, Outcome::Dispatched));
        assert_eq!(
            log.lock().unwrap().as_slice(),
            [("checkout.main".to_string(), args(&["--force"]))]
        );
    }

    #[test]
    fn test_default_child_fallback_extends_path() {
        let log: CallLog = Arc::default();
        let root = tree(&log);
        let outcome = quiet().execute(&root, &args(&["checkout"]), None);
        assert!(matches!(outcome, Outcome::Dispatched));
        // "main" is the first declared child and inherits the dispatch.
        assert_eq!(
            log.lock().unwrap().as_slice(),
            [("checkout.main".to_string(), Vec::new())]
        );
    }

    #[test]
    fn test_root_action_runs_with_empty_path() {
        let log: CallLog = Arc::default();
        let root = Command::new("tool").with_action(recording(log.clone()));
        let outcome = quiet().execute(&root, &args(&["leftover"]), None);
        assert!(matches!(outcome, Outcome::Dispatched));
        assert_eq!(
            log.lock().unwrap().as_slice(),
            [(String::new(), args(&["leftover"]))]
        );
    }

    #[test]
    fn test_actionless_first_child_is_unimplemented() {
        let root = Command::new("tool").with_child(
            Command::new("greet").with_child(Command::new("stub").with_child(
                Command::new("deeper").with_action(|_| Ok(())),
            )),
        );
        let outcome = quiet().execute(&root, &args(&["greet"]), None);
        match outcome {
            Outcome::Failed(DispatchError::Unimplemented(name)) => {
                assert_eq!(name, "greet");
            }
            other => panic!("expected unimplemented, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_node_is_malformed() {
        let root = Command::new("tool").with_child(Command::new("stub"));
        let outcome = quiet().execute(&root, &args(&["stub"]), None);
        match outcome {
            Outcome::Failed(DispatchError::MalformedNode { name, detail }) => {
                assert_eq!(name, "stub");
                assert_eq!(detail, "neither action nor children defined");
            }
            other => panic!("expected malformed node, got {other:?}"),
        }
    }

    #[test]
    fn test_params_without_action_is_malformed() {
        let root =
            Command::new("tool").with_child(Command::new("speak").with_params(["en", "fr"]));
        let outcome = quiet().execute(&root, &args(&["speak", "en"]), None);
        match outcome {
            Outcome::Failed(DispatchError::MalformedNode { name, detail }) => {
                assert_eq!(name, "speak");
                assert_eq!(detail, "params declared without an action");
            }
            other => panic!("expected malformed node, got {other:?}"),
        }
    }

    #[test]
    fn test_min_args_failure_renders_inferred_usage() {
        let log: CallLog = Arc::default();
        let root = tree(&log);
        let outcome = quiet().execute(&root, &args(&["upper"]), None);
        match &outcome {
            Outcome::Failed(err) => {
                assert_eq!(err.to_string(), "usage: upper (word|text){1,}");
            }
            other => panic!("expected usage failure, got {other:?}"),
        }
        assert_eq!(outcome.status(), 1);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_min_args_satisfied_dispatches() {
        let log: CallLog = Arc::default();
        let root = tree(&log);
        let outcome = quiet().execute(&root, &args(&["upper", "hello"]), None);
        assert!(matches!(outcome, Outcome::Dispatched));
        assert_eq!(
            log.lock().unwrap().as_slice(),
            [("upper".to_string(), args(&["hello"]))]
        );
    }

    #[test]
    fn test_node_usage_fn_overrides_inference() {
        let root = Command::new("tool").with_child(
            Command::new("upper")
                .with_min_args(1)
                .with_usage_fn(|_| "WORD...".to_string())
                .with_action(|_| Ok(())),
        );
        let outcome = quiet().execute(&root, &args(&["upper"]), None);
        match outcome {
            Outcome::Failed(err) => assert_eq!(err.to_string(), "usage: upper WORD..."),
            other => panic!("expected usage failure, got {other:?}"),
        }
    }

    #[test]
    fn test_literal_usage_string_beats_usage_fn() {
        let root = Command::new("tool").with_child(
            Command::new("upper")
                .with_min_args(1)
                .with_usage("WORD [WORD...]")
                .with_usage_fn(|_| "unused".to_string())
                .with_action(|_| Ok(())),
        );
        let outcome = quiet().execute(&root, &args(&["upper"]), None);
        match outcome {
            Outcome::Failed(err) => {
                assert_eq!(err.to_string(), "usage: upper WORD [WORD...]");
            }
            other => panic!("expected usage failure, got {other:?}"),
        }
    }

    #[test]
    fn test_usage_text_and_usage_fn_overrides() {
        let root = Command::new("tool").with_child(
            Command::new("upper").with_min_args(1).with_action(|_| Ok(())),
        );
        let dispatcher = quiet()
            .with_usage_text("synopsis")
            .with_usage_fn(|cmd| format!("<{}-args>", cmd.name));
        let outcome = dispatcher.execute(&root, &args(&["upper"]), None);
        match outcome {
            Outcome::Failed(err) => {
                assert_eq!(err.to_string(), "synopsis: upper <upper-args>");
            }
            other => panic!("expected usage failure, got {other:?}"),
        }
    }

    struct FixedStore(&'static str, &'static str);

    impl ConfigStore for FixedStore {
        fn query(&self, path: &str) -> Option<String> {
            (path == self.0).then(|| self.1.to_string())
        }
    }

    #[test]
    fn test_missing_config_store_blocks_dispatch() {
        let root = Command::new("tool").with_child(
            Command::new("motd").require_config().with_action(|_| Ok(())),
        );
        let outcome = quiet().execute(&root, &args(&["motd"]), None);
        match outcome {
            Outcome::Failed(DispatchError::MissingConfig(name)) => assert_eq!(name, "motd"),
            other => panic!("expected missing config, got {other:?}"),
        }
    }

    #[test]
    fn test_config_store_reaches_action_scoped_by_path() {
        let log: CallLog = Arc::default();
        let seen = log.clone();
        let root = Command::new("tool").with_child(
            Command::new("motd").require_config().with_action(move |inv| {
                let text = inv.query("text").ok_or_else(|| inv.missing_config("text"))?;
                seen.lock().unwrap().push((inv.path_string(), vec![text]));
                Ok(())
            }),
        );
        let dispatcher = quiet().with_config(FixedStore("motd.text", "hello"));
        let outcome = dispatcher.execute(&root, &args(&["motd"]), None);
        assert!(matches!(outcome, Outcome::Dispatched));
        assert_eq!(
            log.lock().unwrap().as_slice(),
            [("motd".to_string(), args(&["hello"]))]
        );
    }

    #[test]
    fn test_root_config_requirement_gates_descendants() {
        let root = Command::new("tool")
            .require_config()
            .with_child(Command::new("run").with_action(|_| Ok(())));
        let outcome = quiet().execute(&root, &args(&["run"]), None);
        match outcome {
            Outcome::Failed(DispatchError::MissingConfig(name)) => assert_eq!(name, "run"),
            other => panic!("expected missing config, got {other:?}"),
        }
    }

    #[test]
    fn test_action_error_is_reported_verbatim() {
        let root = Command::new("tool").with_child(
            Command::new("fail").with_action(|_| Err(anyhow::anyhow!("boom: {}", 42))),
        );
        let outcome = quiet().execute(&root, &args(&["fail"]), None);
        match &outcome {
            Outcome::Failed(err @ DispatchError::Action(_)) => {
                assert_eq!(err.to_string(), "boom: 42");
            }
            other => panic!("expected action error, got {other:?}"),
        }
        assert_eq!(outcome.status(), 1);
    }

    #[test]
    fn test_panic_is_trapped_as_fault() {
        let root = Command::new("tool")
            .with_child(Command::new("blow").with_action(|_| panic!("kaboom")));
        let outcome = quiet().execute(&root, &args(&["blow"]), None);
        match outcome {
            Outcome::Failed(DispatchError::Fault(message)) => assert_eq!(message, "kaboom"),
            other => panic!("expected fault, got {other:?}"),
        }
    }

    #[test]
    #[should_panic(expected = "kaboom")]
    fn test_allow_panic_lets_panics_escape() {
        let root = Command::new("tool")
            .with_child(Command::new("blow").with_action(|_| panic!("kaboom")));
        quiet()
            .with_allow_panic(true)
            .execute(&root, &args(&["blow"]), None);
    }

    #[test]
    fn test_shorthand_dispatch_matches_spelled_out_form() {
        let log: CallLog = Arc::default();
        let root = tree(&log);
        let shorthand = ShorthandTable::new().with("cm", &["checkout", "main"]);
        let dispatcher = quiet().with_shorthand(shorthand);

        dispatcher.execute(&root, &args(&["cm", "--force"]), None);
        dispatcher.execute(&root, &args(&["checkout", "main", "--force"]), None);

        let calls = log.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
    }

    #[test]
    fn test_completion_signal_preempts_dispatch() {
        let log: CallLog = Arc::default();
        let root = tree(&log);
        let shorthand = ShorthandTable::new().with("co", &["checkout", "main"]);
        let dispatcher = quiet().with_shorthand(shorthand);

        // "co" is both a shorthand and an alias of "checkout"; inside a
        // completion query it must be treated as text, not expanded.
        let outcome = dispatcher.execute(&root, &args(&["ignored"]), Some("tool co"));
        match outcome {
            Outcome::Completed(candidates) => {
                assert_eq!(candidates, ["co", "checkout"]);
            }
            other => panic!("expected completion, got {other:?}"),
        }
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_outcome_status_mapping() {
        assert_eq!(Outcome::Dispatched.status(), 0);
        assert!(Outcome::Dispatched.is_success());
        assert_eq!(Outcome::Completed(vec![]).status(), 0);
        let failed = Outcome::Failed(DispatchError::Unimplemented("x".into()));
        assert_eq!(failed.status(), 1);
        assert!(!failed.is_success());
    }
}
