use std::sync::{Arc, Mutex};

use cmdtree_core::{
    Command, ConfigStore, Invocation, ValidationError, inferred_usage, validate_tree,
};
use cmdtree_dispatch::{Dispatcher, DispatchError, Outcome, ShorthandTable, resolve};

type CallLog = Arc<Mutex<Vec<(String, Vec<String>)>>>;

fn recording(log: CallLog) -> impl Fn(&Invocation<'_>) -> anyhow::Result<()> {
    move |inv| {
        log.lock()
            .unwrap()
            .push((inv.path_string(), inv.args().to_vec()));
        Ok(())
    }
}

fn args(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

// A small version-control flavored tool covering branches, aliases,
// params, arity bounds, hidden entries and a config-gated command.
fn vcs(log: &CallLog) -> Command {
    Command::new("vcs")
        .with_summary("toy version control")
        .with_child(
            Command::new("remote")
                .with_aliases(["r"])
                .with_child(
                    Command::new("add")
                        .with_min_args(2)
                        .with_action(recording(log.clone())),
                )
                .with_child(
                    Command::new("remove")
                        .with_aliases(["rm"])
                        .with_action(recording(log.clone())),
                ),
        )
        .with_child(
            Command::new("checkout")
                .with_aliases(["co"])
                .with_action(recording(log.clone())),
        )
        .with_child(
            Command::new("log")
                .with_params(["oneline", "full"])
                .with_param_bounds(0, 1)
                .with_action(recording(log.clone())),
        )
        .with_child(
            Command::new("push")
                .require_config()
                .with_action(recording(log.clone())),
        )
        .with_child(Command::new("stub"))
        .with_child(Command::new("internal").with_action(recording(log.clone())))
        .with_hidden(["internal"])
}

fn quiet() -> Dispatcher {
    Dispatcher::new().with_exit(false)
}

#[test]
fn test_unmatched_vector_stays_at_root_with_full_residual() {
    let log: CallLog = Arc::default();
    let root = vcs(&log);
    let argv = args(&["status", "--short"]);
    let res = resolve(&root, &argv);
    assert_eq!(res.command.name, "vcs");
    assert_eq!(res.rest, ["status", "--short"]);
}

#[test]
fn test_alias_and_name_forms_reach_identical_targets() {
    let log: CallLog = Arc::default();
    let root = vcs(&log);
    let dispatcher = quiet();

    dispatcher.execute(&root, &args(&["r", "rm", "origin"]), None);
    dispatcher.execute(&root, &args(&["remote", "remove", "origin"]), None);

    let calls = log.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], calls[1]);
    assert_eq!(calls[0].0, "remote.remove");
}

#[test]
fn test_branch_usage_inference_lists_children() {
    let log: CallLog = Arc::default();
    let root = vcs(&log);
    let remote = root.find_child("remote").unwrap();
    assert_eq!(inferred_usage(remote), "(add|(rm|remove))");
}

#[test]
fn test_shorthand_and_spelled_out_dispatch_agree() {
    let log: CallLog = Arc::default();
    let root = vcs(&log);
    let dispatcher = quiet().with_shorthand(
        ShorthandTable::new().with("ra", &["remote", "add"]),
    );

    let short = dispatcher.execute(&root, &args(&["ra", "origin", "url"]), None);
    let long = dispatcher.execute(&root, &args(&["remote", "add", "origin", "url"]), None);
    assert!(short.is_success() && long.is_success());

    let calls = log.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], calls[1]);
}

#[test]
fn test_completion_skips_hidden_and_descends() {
    let log: CallLog = Arc::default();
    let root = vcs(&log);
    let dispatcher = quiet();

    let outcome = dispatcher.execute(&root, &[], Some("vcs "));
    match outcome {
        Outcome::Completed(candidates) => {
            assert_eq!(
                candidates,
                ["remote", "checkout", "log", "push", "stub"]
            );
        }
        other => panic!("expected completion, got {other:?}"),
    }

    let outcome = dispatcher.execute(&root, &[], Some("vcs remote r"));
    match outcome {
        Outcome::Completed(candidates) => assert_eq!(candidates, ["remove"]),
        other => panic!("expected completion, got {other:?}"),
    }
}

#[test]
fn test_param_literals_complete_for_leaves() {
    let log: CallLog = Arc::default();
    let root = vcs(&log);
    let outcome = quiet().execute(&root, &[], Some("vcs log o"));
    match outcome {
        Outcome::Completed(candidates) => assert_eq!(candidates, ["oneline"]),
        other => panic!("expected completion, got {other:?}"),
    }
}

#[test]
fn test_arity_failure_then_success() {
    let log: CallLog = Arc::default();
    let root = vcs(&log);
    let dispatcher = quiet();

    let outcome = dispatcher.execute(&root, &args(&["remote", "add", "origin"]), None);
    assert_eq!(outcome.status(), 1);
    match outcome {
        Outcome::Failed(DispatchError::Usage { name, .. }) => assert_eq!(name, "add"),
        other => panic!("expected usage failure, got {other:?}"),
    }
    assert!(log.lock().unwrap().is_empty());

    let outcome = dispatcher.execute(&root, &args(&["remote", "add", "origin", "url"]), None);
    assert_eq!(outcome.status(), 0);
    assert_eq!(
        log.lock().unwrap().as_slice(),
        [("remote.add".to_string(), args(&["origin", "url"]))]
    );
}

#[test]
fn test_failure_classes_are_distinct() {
    let log: CallLog = Arc::default();
    let root = vcs(&log);
    let dispatcher = quiet();

    let malformed = dispatcher.execute(&root, &args(&["stub"]), None);
    assert!(matches!(
        malformed,
        Outcome::Failed(DispatchError::MalformedNode { .. })
    ));

    let missing = dispatcher.execute(&root, &args(&["push"]), None);
    assert!(matches!(
        missing,
        Outcome::Failed(DispatchError::MissingConfig(_))
    ));

    let usage = dispatcher.execute(&root, &args(&["remote", "add"]), None);
    assert!(matches!(usage, Outcome::Failed(DispatchError::Usage { .. })));
}

#[test]
fn test_hidden_commands_still_dispatch() {
    let log: CallLog = Arc::default();
    let root = vcs(&log);
    let outcome = quiet().execute(&root, &args(&["internal", "x"]), None);
    assert!(matches!(outcome, Outcome::Dispatched));
    assert_eq!(
        log.lock().unwrap().as_slice(),
        [("internal".to_string(), args(&["x"]))]
    );
}

struct OriginStore;

impl ConfigStore for OriginStore {
    fn query(&self, path: &str) -> Option<String> {
        (path == "push.remote").then(|| "origin".to_string())
    }
}

#[test]
fn test_config_gated_command_runs_with_store() {
    let log: CallLog = Arc::default();
    let seen: Arc<Mutex<Option<String>>> = Arc::default();
    let seen_in_action = seen.clone();
    let mut root = vcs(&log);
    root.children.retain(|c| c.name != "push");
    root.children.push(
        Command::new("push").require_config().with_action(move |inv| {
            *seen_in_action.lock().unwrap() = inv.query("remote");
            Ok(())
        }),
    );

    let outcome = quiet()
        .with_config(OriginStore)
        .execute(&root, &args(&["push"]), None);
    assert!(matches!(outcome, Outcome::Dispatched));
    assert_eq!(seen.lock().unwrap().as_deref(), Some("origin"));
}

#[test]
fn test_validation_flags_the_deliberately_broken_node() {
    // Dispatch and validation must agree about which node is defective.
    let log: CallLog = Arc::default();
    assert_eq!(
        validate_tree(&vcs(&log)),
        vec![ValidationError::NoActionNoChildren {
            name: "stub".into()
        }]
    );
}
