//! Pick a genre cluster or the trending chart, get one song to play.
//!
//! Core modules:
//! - [`dataset`] - In-memory song tables loaded once from CSV
//! - [`resolver`] - Category selection to one sampled song
//! - [`catalog`] - Spotify track lookup
//! - [`recommender`] - One full interaction with a typed outcome
//!
//! ### Supporting Modules
//!
//! - [`presentation`] - Status lines and player embed references
//! - [`session`] - Interactive read-resolve-render loop
//! - [`config`] - Dataset paths, market and credentials
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//! - [`error`] - Outcome error taxonomy
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use muse_recommender::catalog::{Credentials, SpotifyClient};
//! use muse_recommender::dataset::DatasetStore;
//! use muse_recommender::presentation::Outcome;
//! use muse_recommender::recommender::Recommender;
//! use muse_recommender::resolver::CategorySelection;
//! use std::path::Path;
//!
//! let store = DatasetStore::load(
//!     Path::new("data/clustered_songs.csv"),
//!     Path::new("data/billboard_hot100.csv"),
//! )?;
//! let catalog = SpotifyClient::new(
//!     Credentials {
//!         client_id: "id".to_string(),
//!         client_secret: "secret".to_string(),
//!     },
//!     "GB",
//! );
//! let recommender = Recommender::new(&store, catalog);
//!
//! let selection = CategorySelection::FreeTextGenre("chill".to_string());
//! let result = recommender.recommend_random(&selection);
//! for message in Outcome::from_result(&result).messages {
//!     println!("{message}");
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Outcomes
//!
//! A recommendation either yields a track or one of three errors:
//!
//! - **No category match**: a genre matched no cluster label (warning)
//! - **No track found**: the catalog had nothing for the picked song (warning)
//! - **Unexpected**: anything else, shown to the user verbatim
//!
//! ## Testing
//!
//! Sampling takes any `rand::Rng`, so tests seed a `StdRng`, and the
//! catalog is a trait so tests swap in a fake.

pub mod catalog;
pub mod cli;
pub mod completion;
pub mod config;
pub mod dataset;
pub mod error;
pub mod presentation;
pub mod recommender;
pub mod resolver;
pub mod session;
pub mod song;
