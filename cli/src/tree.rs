//! The demo command tree for the `cmdtree` binary.
//!
//! Every capability of the binary is declared here as a single rooted
//! tree; `main` only hands the tree to the dispatcher. The branches are
//! chosen to exercise one engine feature each: `greet` has no action of
//! its own and falls through to its first child, `speak` dispatches on
//! a parameter, `motd` reads the configuration store, `pick` overrides
//! tab completion, and `debug` is hidden from listings.

use anyhow::anyhow;
use cmdtree_core::{Command, Section};
use cmdtree_dispatch::args_or_stdin;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Builds the full demo tree.
///
/// Construction is cheap, so actions that want to inspect the tree they
/// belong to (`version`, `tree`, `commands`) simply rebuild it.
pub fn tree() -> Command {
    let mut root = Command::new("cmdtree")
        .with_summary("command tree demo multitool")
        .with_version(VERSION)
        .with_copyright("Copyright 2026 the cmdtree authors")
        .with_license("MIT")
        .with_hidden(["debug"])
        .with_child(commands())
        .with_child(version())
        .with_child(dump())
        .with_child(greet())
        .with_child(case())
        .with_child(speak())
        .with_child(echo())
        .with_child(pick())
        .with_child(motd())
        .with_child(debug());
    root.description = "A demonstration multitool built on the cmdtree engine. \
        Invoked with no arguments it lists its commands."
        .to_string();
    root.sections.push(Section::new(
        "environment",
        "CMDTREE_CONFIG names a YAML or JSON file backing the `motd` command. \
         COMP_LINE switches the binary into tab completion mode.",
    ));
    root
}

// First child on purpose: a bare `cmdtree` falls through to it.
fn commands() -> Command {
    Command::new("commands")
        .with_summary("list available commands")
        .with_action(|_| {
            for line in tree().summaries() {
                println!("{line}");
            }
            Ok(())
        })
}

fn version() -> Command {
    Command::new("version")
        .with_aliases(["v"])
        .with_summary("print version and legal notice")
        .with_action(|_| {
            println!("{}", tree().legal());
            Ok(())
        })
}

fn dump() -> Command {
    Command::new("tree")
        .with_aliases(["t"])
        .with_summary("dump the command tree as JSON")
        .with_action(|_| {
            println!("{}", serde_json::to_string_pretty(&tree())?);
            Ok(())
        })
}

fn greet() -> Command {
    Command::new("greet")
        .with_summary("greetings for various times of day")
        .with_child(
            Command::new("morning")
                .with_aliases(["m"])
                .with_summary("morning greeting")
                .with_action(|inv| {
                    println!("good morning, {}", name_or_world(inv.args()));
                    Ok(())
                }),
        )
        .with_child(
            Command::new("evening")
                .with_aliases(["e"])
                .with_summary("evening greeting")
                .with_action(|inv| {
                    println!("good evening, {}", name_or_world(inv.args()));
                    Ok(())
                }),
        )
}

fn name_or_world(args: &[String]) -> String {
    if args.is_empty() {
        "world".to_string()
    } else {
        args.join(" ")
    }
}

fn case() -> Command {
    Command::new("case")
        .with_summary("change the case of words")
        .with_child(
            Command::new("upper")
                .with_summary("uppercase the arguments")
                .with_min_args(1)
                .with_action(|inv| {
                    println!("{}", inv.args().join(" ").to_uppercase());
                    Ok(())
                }),
        )
        .with_child(
            Command::new("lower")
                .with_aliases(["lo"])
                .with_summary("lowercase the arguments")
                .with_min_args(1)
                .with_action(|inv| {
                    println!("{}", inv.args().join(" ").to_lowercase());
                    Ok(())
                }),
        )
}

fn speak() -> Command {
    Command::new("speak")
        .with_summary("say hello in a chosen language")
        .with_params(["en", "fr", "de"])
        .with_param_bounds(1, 1)
        .with_min_args(1)
        .with_action(|inv| {
            let word = match inv.args()[0].as_str() {
                "en" => "hello",
                "fr" => "bonjour",
                "de" => "hallo",
                other => return Err(anyhow!("unknown language: {other}")),
            };
            println!("{word}");
            Ok(())
        })
}

fn echo() -> Command {
    Command::new("echo")
        .with_summary("repeat the arguments, or stdin when there are none")
        .with_action(|inv| {
            println!("{}", args_or_stdin(inv.args())?);
            Ok(())
        })
}

// Completion candidates here come from the override, not the tree.
fn pick() -> Command {
    const CHOICES: [&str; 3] = ["always", "never", "sometimes"];
    Command::new("pick")
        .with_summary("pick a frequency")
        .with_completer(|_, args| {
            let prefix = args.first().map(String::as_str).unwrap_or_default();
            CHOICES
                .iter()
                .filter(|choice| choice.starts_with(prefix))
                .map(|choice| choice.to_string())
                .collect()
        })
        .with_action(|inv| {
            match inv.args().first() {
                Some(choice) => println!("picked {choice}"),
                None => println!("picked nothing"),
            }
            Ok(())
        })
}

fn motd() -> Command {
    Command::new("motd")
        .with_summary("print the configured message of the day")
        .require_config()
        .with_action(|inv| {
            let text = inv
                .query("text")
                .ok_or_else(|| inv.missing_config("text"))?;
            println!("{text}");
            Ok(())
        })
}

fn debug() -> Command {
    Command::new("debug")
        .with_summary("dump the tree with Debug formatting")
        .with_action(|_| {
            println!("{:#?}", tree());
            Ok(())
        })
}
