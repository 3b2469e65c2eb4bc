//! # Command-Line Interface Module
//!
//! Clap derive definitions for the recommender binary.
//!
//! ## Commands
//!
//! - `categories`: List every selectable category
//! - `recommend`: Pick one song for a category or genre and find it on Spotify
//! - `interactive`: Keep asking for categories until you quit
//! - `completion`: Print a shell completion script
//!
//! ## Examples
//!
//! ```bash
//! muse-recommender categories
//! muse-recommender recommend --category "Chill Vibes"
//! muse-recommender recommend --genre latin --open
//! muse-recommender interactive
//! ```

use crate::config::Overrides;
use crate::resolver::CategorySelection;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Main application arguments structure.
#[derive(Parser, Debug)]
#[command(name = "muse-recommender")]
#[command(about = "Discover new music based on genre clusters or trending songs")]
#[command(version)]
pub struct Args {
    #[command(flatten)]
    pub settings: Settings,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Settings shared by every command; each overrides the config file.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct Settings {
    /// Config file (JSON). Defaults to the platform config directory.
    #[arg(long, global = true, env = "MUSE_CONFIG", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// CSV of clustered songs (track_name, artists, cluster_label)
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub clustered: Option<PathBuf>,

    /// CSV of trending songs (song_title, artist)
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub trending: Option<PathBuf>,

    /// Catalog market to search, e.g. GB or US
    #[arg(long, global = true, env = "MUSE_MARKET")]
    pub market: Option<String>,

    /// Spotify app client id
    #[arg(long, global = true, env = "SPOTIFY_CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,

    /// Spotify app client secret
    #[arg(long, global = true, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,
}

impl Settings {
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            clustered_path: self.clustered.clone(),
            trending_path: self.trending.clone(),
            market: self.market.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
        }
    }
}

/// Enumeration of all available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all selectable categories
    ///
    /// The first entry is always the trending chart, followed by every
    /// distinct cluster label in alphabetical order.
    Categories,

    /// Get one recommendation
    ///
    /// Picks a random song from the chosen category (or from every cluster
    /// whose name contains --genre), searches Spotify for it and prints a
    /// player link. Without --category or --genre the trending chart is used.
    Recommend {
        /// Category name as listed by `categories`, or "trending"
        ///
        /// "trending" means the chart unless a cluster is named exactly that.
        #[arg(short, long, value_hint = clap::ValueHint::Other)]
        category: Option<String>,

        /// Free-text genre or mood, matched against cluster names
        ///
        /// Case-insensitive substring match, e.g. "chill" or "latin".
        /// Takes precedence over --category when not empty.
        #[arg(short, long)]
        genre: Option<String>,

        /// Open the player in the default browser
        #[arg(long)]
        open: bool,

        /// Also print an <iframe> snippet for the player
        #[arg(long)]
        html: bool,
    },

    /// Recommend songs interactively
    ///
    /// Lists the categories, then reads one choice per line: a number, a
    /// category name, "genre <text>", "list" or "quit".
    Interactive {
        /// Also print an <iframe> snippet for each player
        #[arg(long)]
        html: bool,
    },

    /// Generate shell completions
    ///
    /// Usage: muse-recommender completion bash > ~/.local/share/bash-completion/completions/muse-recommender
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },

    /// List categories for completion scripts (hidden command)
    #[command(hide = true)]
    CompleteCategories,
}

/// Selection for `recommend`: a non-blank genre wins, then the category,
/// then the trending chart. `categories` is the list the store offers.
#[must_use]
pub fn selection_from_flags(
    category: Option<&str>,
    genre: Option<&str>,
    categories: &[String],
) -> CategorySelection {
    match (category, genre.map(str::trim).filter(|g| !g.is_empty())) {
        (_, Some(genre)) => CategorySelection::FreeTextGenre(genre.to_string()),
        (Some(category), None) => CategorySelection::from_category(category, categories),
        (None, None) => CategorySelection::Trending,
    }
}
