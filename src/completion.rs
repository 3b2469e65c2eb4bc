//! # Shell Completion Module
//!
//! - Generation of completion scripts for various shells
//! - Category names from the datasets, for `recommend --category`
//!
//! ## Usage
//!
//! ```bash
//! # Generate bash completions
//! muse-recommender completion bash > ~/.local/share/bash-completion/completions/muse-recommender
//!
//! # Generate zsh completions
//! muse-recommender completion zsh > ~/.config/zsh/completions/_muse-recommender
//! ```

use crate::config::RuntimeConfig;
use crate::dataset::DatasetStore;
use clap::Command;
use clap_complete::{generate, Generator, Shell as CompletionShell};
use std::io::{self, Write};

/// Generate shell completions for the given shell
pub fn generate_completions<G: Generator, W: Write>(gen: G, cmd: &mut Command, out: &mut W) {
    let name = cmd.get_name().to_string();
    generate(gen, cmd, name, out);
}

/// Convert CLI Shell enum to clap_complete Shell enum
#[must_use]
pub fn shell_to_completion_shell(shell: crate::cli::Shell) -> CompletionShell {
    match shell {
        crate::cli::Shell::Bash => CompletionShell::Bash,
        crate::cli::Shell::Zsh => CompletionShell::Zsh,
        crate::cli::Shell::Fish => CompletionShell::Fish,
        crate::cli::Shell::PowerShell => CompletionShell::PowerShell,
        crate::cli::Shell::Elvish => CompletionShell::Elvish,
    }
}

/// Categories for completion, or nothing if the datasets can't be read.
/// Completion must never print errors into the user's shell.
#[must_use]
pub fn category_completions(config: &RuntimeConfig) -> Vec<String> {
    match DatasetStore::load(&config.clustered_path, &config.trending_path) {
        Ok(store) => store.categories(),
        Err(err) => {
            log::debug!("No category completions: {err:#}");
            Vec::new()
        }
    }
}

/// One category per line, quoted when it contains whitespace.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_category_completions<W: Write>(out: &mut W, categories: &[String]) -> io::Result<()> {
    for category in categories {
        if category.contains(char::is_whitespace) {
            writeln!(out, "\"{}\"", category.replace('"', "\\\""))?;
        } else {
            writeln!(out, "{category}")?;
        }
    }
    Ok(())
}
