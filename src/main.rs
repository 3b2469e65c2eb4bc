//! # Muse Recommender
//!
//! Pick a genre cluster or the trending chart and get one song, found on
//! Spotify, with a link to its player.
//!
//! ## Usage
//!
//! ```bash
//! # What can I pick from?
//! muse-recommender categories
//!
//! # One recommendation
//! muse-recommender recommend --category "Chill Vibes"
//! muse-recommender recommend --genre latin --open
//!
//! # Keep going until quit
//! muse-recommender interactive
//! ```

use anyhow::Result;
use clap::{CommandFactory, Parser};
use log::{debug, info, warn};
use muse_recommender::catalog::SpotifyClient;
use muse_recommender::cli::{self, Command};
use muse_recommender::completion;
use muse_recommender::config::RuntimeConfig;
use muse_recommender::dataset::DatasetStore;
use muse_recommender::presentation::{self, Outcome, RenderOptions};
use muse_recommender::recommender::Recommender;
use muse_recommender::session::Session;
use std::io::{self, Write};
use std::process::ExitCode;

fn load_store(config: &RuntimeConfig) -> Result<DatasetStore> {
    DatasetStore::load(&config.clustered_path, &config.trending_path)
}

fn spotify_client(config: &RuntimeConfig) -> Result<SpotifyClient> {
    let client = SpotifyClient::new(config.credentials()?, config.market.clone());
    info!("Using Spotify market {}", client.market());
    Ok(client)
}

/// Main entry point.
///
/// Logging goes to stderr through `env_logger` and is controlled via `RUST_LOG`:
/// - `RUST_LOG=debug muse-recommender recommend` - Enable debug logging
/// - `RUST_LOG=muse_recommender::catalog=trace muse-recommender interactive` - Module-specific logging
///
/// Exits with status 1 when a recommendation failed unexpectedly. Warnings
/// (no matching category, no track found) are a normal exit.
fn main() -> Result<ExitCode> {
    env_logger::init();

    let args = cli::Args::parse();

    if let Command::Completion { shell } = args.command {
        let mut cmd = cli::Args::command();
        completion::generate_completions(
            completion::shell_to_completion_shell(shell),
            &mut cmd,
            &mut io::stdout(),
        );
        return Ok(ExitCode::SUCCESS);
    }

    let config = RuntimeConfig::load(args.settings.config.as_deref())?
        .with_overrides(args.settings.overrides());
    debug!("Runtime config: {config:?}");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Categories => {
            let store = load_store(&config)?;
            presentation::render_categories(&mut out, &store.categories())?;
        }
        Command::CompleteCategories => {
            completion::write_category_completions(
                &mut out,
                &completion::category_completions(&config),
            )?;
        }
        Command::Recommend {
            category,
            genre,
            open,
            html,
        } => {
            let store = load_store(&config)?;
            let recommender = Recommender::new(&store, spotify_client(&config)?);
            let selection = cli::selection_from_flags(
                category.as_deref(),
                genre.as_deref(),
                &store.categories(),
            );

            let result = recommender.recommend_random(&selection);
            let outcome = Outcome::from_result(&result);
            presentation::render(&mut out, &outcome, RenderOptions { html })?;
            out.flush()?;

            if let (true, Some(embed)) = (open, &outcome.embed) {
                if let Err(err) = webbrowser::open(&embed.url()) {
                    warn!("Could not open a browser: {err}");
                }
            }

            if outcome.is_error() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Interactive { html } => {
            let store = load_store(&config)?;
            let recommender = Recommender::new(&store, spotify_client(&config)?);
            let mut rng = rand::thread_rng();
            let mut session = Session::new(&recommender, &mut rng, RenderOptions { html });

            let attempts = session.run(io::stdin().lock(), &mut out)?;
            info!("Interactive session ended after {attempts} recommendations");
        }
        Command::Completion { .. } => {}
    }

    Ok(ExitCode::SUCCESS)
}
