//! # Category Resolver
//!
//! Turns a user's category selection into exactly one sampled song.
//!
//! | Selection         | Rows considered                                  |
//! |-------------------|--------------------------------------------------|
//! | `Trending`        | the whole trending table                         |
//! | `ClusterLabel(l)` | clustered rows whose label equals `l`            |
//! | `FreeTextGenre(t)`| clustered rows whose label contains `t`, any case|
//!
//! Sampling is uniform over the rows considered. When several clusters
//! match a free-text genre, the draw is over all of their rows together,
//! so bigger clusters are proportionally more likely.
//!
//! The random source is a parameter so callers can seed it.

use crate::dataset::{DatasetStore, TRENDING_LABEL};
use crate::song::SongRecord;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use thiserror::Error;

/// What the user asked for in one interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategorySelection {
    Trending,
    ClusterLabel(String),
    FreeTextGenre(String),
}

impl CategorySelection {
    /// Map a category as listed by [`DatasetStore::categories`] (or typed
    /// on the command line) to a selection.
    ///
    /// The bare word `trending` (any case) picks the chart only when no
    /// category in `categories` is spelled exactly that way.
    #[must_use]
    pub fn from_category(category: &str, categories: &[String]) -> Self {
        let category = category.trim();
        if category == TRENDING_LABEL {
            Self::Trending
        } else if categories.iter().any(|known| known == category) {
            Self::ClusterLabel(category.to_string())
        } else if category.eq_ignore_ascii_case("trending") {
            Self::Trending
        } else {
            Self::ClusterLabel(category.to_string())
        }
    }
}

impl fmt::Display for CategorySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trending => f.write_str(TRENDING_LABEL),
            Self::ClusterLabel(label) => write!(f, "{label}"),
            Self::FreeTextGenre(genre) => write!(f, "genre '{genre}'"),
        }
    }
}

/// Where a pick came from, kept for the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOrigin {
    Trending,
    Cluster(String),
    Matched { genre: String, label: String },
}

/// A sampled song together with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pick {
    pub song: SongRecord,
    pub origin: PickOrigin,
}

impl Pick {
    #[must_use]
    pub fn query(&self) -> String {
        self.song.query()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No clustered row matched the selection.
    #[error("No category matched '{0}'")]
    NoMatch(String),

    #[error("The {0} table has no songs to pick from")]
    EmptyTable(&'static str),
}

/// Sample one song for `selection`.
///
/// # Errors
///
/// [`ResolveError::NoMatch`] when a cluster or genre filter leaves no
/// rows, [`ResolveError::EmptyTable`] when the trending table is empty.
pub fn resolve<R>(
    store: &DatasetStore,
    selection: &CategorySelection,
    rng: &mut R,
) -> Result<Pick, ResolveError>
where
    R: Rng + ?Sized,
{
    match selection {
        CategorySelection::Trending => {
            let song = store
                .trending()
                .choose(rng)
                .ok_or(ResolveError::EmptyTable("trending"))?;
            Ok(Pick {
                song: song.clone(),
                origin: PickOrigin::Trending,
            })
        }
        CategorySelection::ClusterLabel(label) => {
            let candidates: Vec<&SongRecord> = store
                .clustered()
                .iter()
                .filter(|song| song.has_label(label))
                .collect();
            log::debug!("{} songs in cluster `{label}'", candidates.len());

            let song = candidates
                .choose(rng)
                .ok_or_else(|| ResolveError::NoMatch(label.clone()))?;
            Ok(Pick {
                song: (*song).clone(),
                origin: PickOrigin::Cluster(label.clone()),
            })
        }
        CategorySelection::FreeTextGenre(genre) => {
            let needle = genre.to_lowercase();
            let candidates: Vec<&SongRecord> = store
                .clustered()
                .iter()
                .filter(|song| song.label_contains(&needle))
                .collect();
            log::debug!("{} songs match genre `{genre}'", candidates.len());

            let song = candidates
                .choose(rng)
                .ok_or_else(|| ResolveError::NoMatch(genre.clone()))?;
            let label = song.cluster_label.clone().unwrap_or_default();
            Ok(Pick {
                song: (*song).clone(),
                origin: PickOrigin::Matched {
                    genre: genre.clone(),
                    label,
                },
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn store() -> DatasetStore {
        DatasetStore::new(
            vec![
                SongRecord::new("Song A", "Artist X").with_label("Chill Vibes"),
                SongRecord::new("Song B", "Artist Y").with_label("Rock Anthems"),
                SongRecord::new("Song C", "Artist Z").with_label("Chill Vibes"),
                SongRecord::new("Song D", "Artist W").with_label("Chilled Latin"),
                SongRecord::new("Song E", "Artist V"),
            ],
            vec![
                SongRecord::new("Easy On Me", "Adele"),
                SongRecord::new("Stay", "The Kid LAROI & Justin Bieber"),
            ],
        )
    }

    #[test]
    fn test_cluster_label_always_matches_exactly() {
        let store = store();
        let mut rng = StdRng::seed_from_u64(7);

        for label in store.cluster_labels() {
            let selection = CategorySelection::ClusterLabel(label.clone());
            for _ in 0..50 {
                let pick = resolve(&store, &selection, &mut rng).expect("label exists");
                assert_eq!(pick.song.cluster_label.as_deref(), Some(label.as_str()));
                assert_eq!(pick.origin, PickOrigin::Cluster(label.clone()));
            }
        }
    }

    #[test]
    fn test_cluster_label_scenario_query() {
        let store = DatasetStore::new(
            vec![SongRecord::new("Song A", "Artist X").with_label("Chill Vibes")],
            Vec::new(),
        );
        let selection = CategorySelection::from_category("Chill Vibes", &store.categories());
        let pick = resolve(&store, &selection, &mut StdRng::seed_from_u64(1))
            .expect("single row matches");
        assert_eq!(pick.query(), "Song A Artist X");
    }

    #[test]
    fn test_unknown_cluster_label_is_no_match() {
        let store = store();
        let selection = CategorySelection::ClusterLabel("Polka".to_string());
        let result = resolve(&store, &selection, &mut StdRng::seed_from_u64(1));
        assert_eq!(result, Err(ResolveError::NoMatch("Polka".to_string())));
    }

    #[test]
    fn test_free_text_matches_case_insensitive_substring() {
        let store = store();
        let mut rng = StdRng::seed_from_u64(42);
        let selection = CategorySelection::FreeTextGenre("CHI".to_string());

        for _ in 0..50 {
            let pick = resolve(&store, &selection, &mut rng).expect("chi matches");
            let label = pick.song.cluster_label.clone().expect("clustered row");
            assert!(label.to_lowercase().contains("chi"));
            match pick.origin {
                PickOrigin::Matched { genre, label: matched } => {
                    assert_eq!(genre, "CHI");
                    assert_eq!(matched, label);
                }
                other => panic!("unexpected origin {other:?}"),
            }
        }
    }

    #[test]
    fn test_free_text_samples_across_all_matching_clusters() {
        let store = store();
        let mut rng = StdRng::seed_from_u64(3);
        let selection = CategorySelection::FreeTextGenre("chill".to_string());

        let labels: std::collections::HashSet<String> = (0..200)
            .filter_map(|_| resolve(&store, &selection, &mut rng).ok())
            .filter_map(|pick| pick.song.cluster_label)
            .collect();
        assert!(labels.contains("Chill Vibes"));
        assert!(labels.contains("Chilled Latin"));
    }

    #[test]
    fn test_free_text_without_match_is_no_match() {
        let store = store();
        let selection = CategorySelection::FreeTextGenre("zzz".to_string());
        let result = resolve(&store, &selection, &mut StdRng::seed_from_u64(1));
        assert_eq!(result, Err(ResolveError::NoMatch("zzz".to_string())));
    }

    #[test]
    fn test_trending_only_draws_from_trending_table() {
        let store = store();
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..50 {
            let pick = resolve(&store, &CategorySelection::Trending, &mut rng)
                .expect("trending table has rows");
            assert!(store.trending().contains(&pick.song));
            assert!(!store.clustered().contains(&pick.song));
            assert_eq!(pick.origin, PickOrigin::Trending);
        }
    }

    #[test]
    fn test_empty_trending_table() {
        let store = DatasetStore::new(Vec::new(), Vec::new());
        let result = resolve(&store, &CategorySelection::Trending, &mut StdRng::seed_from_u64(1));
        assert_eq!(result, Err(ResolveError::EmptyTable("trending")));
    }

    #[test]
    fn test_same_seed_same_pick() {
        let store = store();
        let selection = CategorySelection::FreeTextGenre("i".to_string());
        let a = resolve(&store, &selection, &mut StdRng::seed_from_u64(5));
        let b = resolve(&store, &selection, &mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_category() {
        let categories = store().categories();
        assert_eq!(
            CategorySelection::from_category(TRENDING_LABEL, &categories),
            CategorySelection::Trending
        );
        assert_eq!(
            CategorySelection::from_category("Trending", &categories),
            CategorySelection::Trending
        );
        assert_eq!(
            CategorySelection::from_category(" Chill Vibes ", &categories),
            CategorySelection::ClusterLabel("Chill Vibes".to_string())
        );
    }

    #[test]
    fn test_cluster_named_trending_stays_selectable() {
        let store = DatasetStore::new(
            vec![SongRecord::new("Song T", "Artist T").with_label("Trending")],
            vec![SongRecord::new("Easy On Me", "Adele")],
        );
        let categories = store.categories();

        let selection = CategorySelection::from_category("Trending", &categories);
        assert_eq!(selection, CategorySelection::ClusterLabel("Trending".to_string()));
        let pick = resolve(&store, &selection, &mut StdRng::seed_from_u64(1))
            .expect("cluster exists");
        assert_eq!(pick.query(), "Song T Artist T");

        // other spellings still mean the chart
        assert_eq!(
            CategorySelection::from_category("TRENDING", &categories),
            CategorySelection::Trending
        );
        assert_eq!(
            CategorySelection::from_category(TRENDING_LABEL, &categories),
            CategorySelection::Trending
        );
    }
}
