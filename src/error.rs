//! Outcome errors of a single recommendation.
//!
//! Only [`RecommendError::Unexpected`] is a real failure. The other two are
//! ordinary results that the user sees as a warning.

use crate::resolver::Pick;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecommendError {
    /// A free-text genre (or unknown label) matched no cluster.
    #[error("No category matched '{genre}'")]
    NoCategoryMatch { genre: String },

    /// A song was picked but the catalog had no track for it.
    #[error("No catalog track found for '{}'", .pick.query())]
    NoTrackFound { pick: Pick },

    /// Anything else, e.g. a network failure. The message is shown as is.
    #[error("{cause:#}")]
    Unexpected {
        pick: Option<Pick>,
        cause: anyhow::Error,
    },
}

impl RecommendError {
    /// The song that was picked before things went wrong, if any.
    #[must_use]
    pub fn pick(&self) -> Option<&Pick> {
        match self {
            Self::NoCategoryMatch { .. } => None,
            Self::NoTrackFound { pick } => Some(pick),
            Self::Unexpected { pick, .. } => pick.as_ref(),
        }
    }

    #[must_use]
    pub fn is_warning(&self) -> bool {
        !matches!(self, Self::Unexpected { .. })
    }
}

/// Convenience Result type for recommendations.
pub type Result<T> = std::result::Result<T, RecommendError>;
