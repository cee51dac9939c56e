//! Shell tab-completion engine.
//!
//! Completion-capable shells hand a program the full line being typed
//! (bash exports `COMP_LINE` when a command is registered with
//! `complete -C`). The engine re-resolves that line against the command
//! tree and answers with candidate words, one per line, entirely through
//! the same resolution rules as dispatch, so completion and execution can
//! never disagree about what a prefix means.

use cmdtree_core::Command;

use crate::resolve::resolve;
use crate::shorthand::ShorthandTable;

/// Splits a completion line into tokens on whitespace, appending an
/// explicit empty token when the line ends mid-word boundary.
///
/// The trailing empty token is what distinguishes `tool gre` (complete
/// the partial word `gre`) from `tool greet ` (complete the next, still
/// empty, word).
///
/// # Examples
///
/// ```
/// use cmdtree_dispatch::split_line;
///
/// assert_eq!(split_line("tool gre"), ["tool", "gre"]);
/// assert_eq!(split_line("tool greet "), ["tool", "greet", ""]);
/// assert!(split_line("").is_empty());
/// ```
pub fn split_line(line: &str) -> Vec<String> {
    let mut tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
    if !line.is_empty() && line.ends_with(char::is_whitespace) {
        tokens.push(String::new());
    }
    tokens
}

/// Default candidates for completing `args` at `cmd`.
///
/// A completer override on the node replaces this behavior entirely.
/// Otherwise zero arguments complete to the node's own name, and a
/// partial first argument filters the node's visible child names and
/// params by prefix. An empty first argument therefore lists everything
/// visible.
pub fn candidates(cmd: &Command, args: &[String]) -> Vec<String> {
    if let Some(completer) = &cmd.completer {
        return completer(cmd, args);
    }
    if args.is_empty() {
        return vec![cmd.name.clone()];
    }
    let prefix = args[0].as_str();
    cmd.visible_entries()
        .into_iter()
        .filter(|entry| entry.starts_with(prefix))
        .collect()
}

/// Answers a full completion line against `root`.
///
/// The line's first token is the program name and is never expanded
/// through the shorthand table. When the word under completion is the
/// first argument, shorthand names join the candidate pool; if exactly
/// one candidate survives and it is a shorthand name, its full expansion
/// is emitted (shell-quoted) so accepting the completion rewrites the
/// word into the real command path. A completer override on the resolved
/// node takes over completely and suppresses shorthand merging.
pub fn complete_line(root: &Command, line: &str, shorthand: &ShorthandTable) -> Vec<String> {
    let tokens = split_line(line);
    let first_word = tokens.len() == 2;

    let mut list = Vec::new();
    if first_word {
        list.extend(shorthand.names_with_prefix(&tokens[1]));
    }

    let args: Vec<String> = tokens.iter().skip(1).cloned().collect();
    let resolution = resolve(root, &args);
    if let Some(completer) = &resolution.command.completer {
        return completer(resolution.command, resolution.rest);
    }
    list.extend(candidates(resolution.command, resolution.rest));

    if first_word && list.len() == 1 {
        if let Some(expansion) = shorthand.get(&list[0]) {
            let words: Vec<String> = expansion.iter().map(|w| quote(w)).collect();
            return vec![words.join(" ")];
        }
    }
    list
}

// Minimal POSIX single-quote escaping for expansion emission.
fn quote(word: &str) -> String {
    if word.is_empty() {
        return "''".to_string();
    }
    let plain = word
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "-_./:@+=%,".contains(c));
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}
