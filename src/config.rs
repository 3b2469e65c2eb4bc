//! # Configuration Module
//!
//! Runtime settings for the recommender: where the two datasets live,
//! which catalog market to search, and the catalog app credentials.
//!
//! ## Sources, lowest to highest precedence
//!
//! 1. Built-in defaults (`data/clustered_songs.csv`, `data/billboard_hot100.csv`, market `GB`)
//! 2. A JSON file, either `--config <file>` or the platform config dir:
//!    - Linux: `~/.config/muse-recommender/config.json`
//!    - macOS: `~/Library/Application Support/muse-recommender/config.json`
//!    - Windows: `%APPDATA%\muse-recommender\config.json`
//! 3. Command-line flags and their environment variables
//!
//! ```json
//! {
//!   "clustered_path": "data/clustered_songs.csv",
//!   "trending_path": "data/billboard_hot100.csv",
//!   "market": "GB",
//!   "spotify": { "client_id": "...", "client_secret": "..." }
//! }
//! ```

use crate::catalog::Credentials;
use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "muse-recommender";
const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_CLUSTERED_PATH: &str = "data/clustered_songs.csv";
pub const DEFAULT_TRENDING_PATH: &str = "data/billboard_hot100.csv";
pub const DEFAULT_MARKET: &str = "GB";

/// Returns the default config file location, if the platform has a
/// config directory at all. The file itself may not exist.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// Credentials as stored in the config file.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SpotifySection {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
}

impl std::fmt::Debug for SpotifySection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifySection")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Configuration for runtime behavior
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RuntimeConfig {
    /// CSV with `track_name`, `artists`, `cluster_label`
    pub clustered_path: PathBuf,
    /// CSV with `song_title`, `artist`
    pub trending_path: PathBuf,
    /// Catalog market/region used for every search
    pub market: String,
    pub spotify: SpotifySection,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            clustered_path: PathBuf::from(DEFAULT_CLUSTERED_PATH),
            trending_path: PathBuf::from(DEFAULT_TRENDING_PATH),
            market: DEFAULT_MARKET.to_string(),
            spotify: SpotifySection::default(),
        }
    }
}

/// Values from the command line that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub clustered_path: Option<PathBuf>,
    pub trending_path: Option<PathBuf>,
    pub market: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl RuntimeConfig {
    /// Read a config file. Missing keys fall back to defaults.
    ///
    /// # Errors
    ///
    /// Fails if the file can't be read or isn't valid JSON.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Load from an explicit path, or from the default location if a file
    /// exists there, or fall back to defaults.
    ///
    /// # Errors
    ///
    /// An explicit path that can't be read is an error, a missing
    /// default file is not.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            debug!("Loading config from {}", path.display());
            return Self::from_file(path);
        }

        match default_config_path() {
            Some(path) if path.is_file() => {
                debug!("Loading config from {}", path.display());
                Self::from_file(&path)
            }
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Apply command-line values on top of the loaded file.
    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(path) = overrides.clustered_path {
            self.clustered_path = path;
        }
        if let Some(path) = overrides.trending_path {
            self.trending_path = path;
        }
        if let Some(market) = overrides.market {
            self.market = market;
        }
        if overrides.client_id.is_some() {
            self.spotify.client_id = overrides.client_id;
        }
        if overrides.client_secret.is_some() {
            self.spotify.client_secret = overrides.client_secret;
        }
        self
    }

    /// Catalog credentials, required for any command that searches.
    ///
    /// # Errors
    ///
    /// Fails when either half is missing or blank.
    pub fn credentials(&self) -> Result<Credentials> {
        let non_blank = |value: &Option<String>| value.clone().filter(|v| !v.trim().is_empty());
        match (
            non_blank(&self.spotify.client_id),
            non_blank(&self.spotify.client_secret),
        ) {
            (Some(client_id), Some(client_secret)) => Ok(Credentials {
                client_id,
                client_secret,
            }),
            _ => Err(anyhow::anyhow!(
                "Spotify credentials are missing. Set SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET, \
                 pass --client-id/--client-secret, or add a \"spotify\" section to the config file."
            )),
        }
    }
}
