//! # Dataset Store
//!
//! Loads the two song tables once at startup and keeps them in memory,
//! read-only, for the lifetime of the process.
//!
//! - **Clustered table**: `track_name`, `artists`, `cluster_label`
//! - **Trending table**: `song_title`, `artist` (a dated chart snapshot)
//!
//! Any further columns in either file are ignored. No validation of the
//! data beyond what deserializing those columns needs.

use crate::song::SongRecord;
use anyhow::{Context, Result};
use log::{debug, info};
use path_absolutize::Absolutize;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

/// Display label of the trending category, always listed first.
pub const TRENDING_LABEL: &str = "Trending (Billboard Hot 100)";

#[derive(Debug, Deserialize)]
struct ClusteredRow {
    track_name: String,
    artists: String,
    cluster_label: Option<String>,
}

impl From<ClusteredRow> for SongRecord {
    fn from(row: ClusteredRow) -> Self {
        Self {
            title: row.track_name,
            artist: row.artists,
            cluster_label: row.cluster_label.filter(|label| !label.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TrendingRow {
    song_title: String,
    artist: String,
}

impl From<TrendingRow> for SongRecord {
    fn from(row: TrendingRow) -> Self {
        Self::new(row.song_title, row.artist)
    }
}

/// Immutable in-memory copy of both tables.
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    clustered: Vec<SongRecord>,
    trending: Vec<SongRecord>,
}

impl DatasetStore {
    /// Build a store from already materialized records.
    #[must_use]
    pub fn new(clustered: Vec<SongRecord>, trending: Vec<SongRecord>) -> Self {
        Self { clustered, trending }
    }

    /// Read both CSV files from disk.
    ///
    /// # Errors
    ///
    /// Fails if either file is missing, unreadable, or lacks the
    /// required columns.
    pub fn load(clustered_path: &Path, trending_path: &Path) -> Result<Self> {
        let clustered = read_table::<ClusteredRow>(clustered_path)
            .context("Failed to load clustered songs")?;
        let trending = read_table::<TrendingRow>(trending_path)
            .context("Failed to load trending songs")?;

        info!(
            "Loaded {} clustered and {} trending songs",
            clustered.len(),
            trending.len()
        );
        Ok(Self::new(clustered, trending))
    }

    /// Same as [`DatasetStore::load`] but from arbitrary readers.
    ///
    /// # Errors
    ///
    /// Fails on malformed CSV or missing columns.
    pub fn from_readers<C: Read, T: Read>(clustered: C, trending: T) -> Result<Self> {
        let clustered = parse_rows::<ClusteredRow, _>(clustered, "clustered")?;
        let trending = parse_rows::<TrendingRow, _>(trending, "trending")?;
        Ok(Self::new(clustered, trending))
    }

    #[must_use]
    pub fn clustered(&self) -> &[SongRecord] {
        &self.clustered
    }

    #[must_use]
    pub fn trending(&self) -> &[SongRecord] {
        &self.trending
    }

    /// Distinct cluster labels, sorted.
    #[must_use]
    pub fn cluster_labels(&self) -> Vec<String> {
        self.clustered
            .iter()
            .filter_map(|song| song.cluster_label.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Everything a user can pick: the trending entry, then every label.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        std::iter::once(TRENDING_LABEL.to_string())
            .chain(self.cluster_labels())
            .collect()
    }
}

fn read_table<R>(path: &Path) -> Result<Vec<SongRecord>>
where
    R: for<'de> Deserialize<'de>,
    SongRecord: From<R>,
{
    let display = path.absolutize().map_or_else(
        |_| path.display().to_string(),
        |absolute| absolute.display().to_string(),
    );
    debug!("Reading dataset {display}");

    let file = std::fs::File::open(path)
        .with_context(|| format!("Could not open dataset file {display}"))?;
    parse_rows::<R, _>(file, &display)
}

fn parse_rows<R, I>(input: I, source: &str) -> Result<Vec<SongRecord>>
where
    R: for<'de> Deserialize<'de>,
    SongRecord: From<R>,
    I: Read,
{
    csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(input)
        .into_deserialize::<R>()
        .enumerate()
        .map(|(index, row)| {
            row.map(SongRecord::from)
                // +2: one for the header, one for 1-based line numbers
                .with_context(|| format!("Bad row {} in {source}", index + 2))
        })
        .collect()
}
