//! # Recommender
//!
//! One interaction: resolve the selection against the store, look the pick
//! up in the catalog, classify the result.

use crate::catalog::{CatalogSearch, TrackId};
use crate::dataset::DatasetStore;
use crate::error::{RecommendError, Result};
use crate::resolver::{self, CategorySelection, Pick, ResolveError};
use anyhow::anyhow;
use log::{debug, info, warn};
use rand::Rng;

/// A pick the catalog could resolve to a playable track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub pick: Pick,
    pub track: TrackId,
}

/// Ties the read-only store to a catalog client.
pub struct Recommender<'a, C> {
    store: &'a DatasetStore,
    catalog: C,
}

impl<'a, C: CatalogSearch> Recommender<'a, C> {
    pub fn new(store: &'a DatasetStore, catalog: C) -> Self {
        Self { store, catalog }
    }

    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.store.categories()
    }

    /// Run one interaction with the given random source.
    ///
    /// # Errors
    ///
    /// See [`RecommendError`] for the three outcomes that are not a track.
    pub fn recommend<R>(&self, selection: &CategorySelection, rng: &mut R) -> Result<Recommendation>
    where
        R: Rng + ?Sized,
    {
        debug!("Resolving selection: {selection}");
        let pick = match resolver::resolve(self.store, selection, rng) {
            Ok(pick) => pick,
            Err(ResolveError::NoMatch(genre)) => {
                warn!("No category matched '{genre}'");
                return Err(RecommendError::NoCategoryMatch { genre });
            }
            Err(err) => {
                return Err(RecommendError::Unexpected {
                    pick: None,
                    cause: anyhow!(err),
                })
            }
        };

        let query = pick.query();
        info!("Picked `{query}' for {selection}");

        match self.catalog.search(&query) {
            Ok(Some(track)) => {
                info!("Resolved `{query}' to track {track}");
                Ok(Recommendation { pick, track })
            }
            Ok(None) => {
                warn!("Catalog has no track for `{query}'");
                Err(RecommendError::NoTrackFound { pick })
            }
            Err(cause) => Err(RecommendError::Unexpected {
                pick: Some(pick),
                cause,
            }),
        }
    }

    /// Same as [`Recommender::recommend`] using the thread-local RNG.
    ///
    /// # Errors
    ///
    /// See [`Recommender::recommend`].
    pub fn recommend_random(&self, selection: &CategorySelection) -> Result<Recommendation> {
        self.recommend(selection, &mut rand::thread_rng())
    }
}
