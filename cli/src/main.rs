//! Entry point for the `cmdtree` demo binary.
//!
//! All argument handling is delegated to the dispatch engine; `main` only
//! wires up logging, shorthand aliases, the optional configuration file,
//! and the multicall table before handing over control.

use std::env;
use std::process;

use cmdtree_config::FileConfig;
use cmdtree_dispatch::{Dispatcher, Multicall, ShorthandTable};
use tracing_subscriber::EnvFilter;

mod tree;

/// Environment variable naming the configuration file for `motd`.
const CONFIG_VAR: &str = "CMDTREE_CONFIG";

fn main() {
    // Log to stderr; stdout carries command output and completion candidates.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let shorthand = ShorthandTable::new()
        .with("gm", &["greet", "morning"])
        .with("ge", &["greet", "evening"])
        .with("shout", &["case", "upper"]);

    let mut dispatcher = Dispatcher::new().with_shorthand(shorthand);
    if let Ok(path) = env::var(CONFIG_VAR) {
        match FileConfig::load(&path) {
            Ok(config) => dispatcher = dispatcher.with_config(config),
            Err(err) => {
                eprintln!("error: {err}");
                process::exit(1);
            }
        }
    }

    Multicall::new(dispatcher)
        .register("cmdtree", tree::tree(), &[])
        .register("greet", tree::tree(), &["greet"])
        .run();
}
