/// One row from either dataset, reduced to what a recommendation needs.
/// Records are built once when the store loads and never mutated.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SongRecord {
    pub title: String,
    pub artist: String,
    /// Only present for rows of the clustered dataset.
    /// Rows where the column is blank keep `None`.
    pub cluster_label: Option<String>,
}

impl SongRecord {
    #[must_use]
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            cluster_label: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.cluster_label = Some(label.into());
        self
    }

    /// Search string handed to the catalog: `"{title} {artist}"`.
    ///
    /// Never empty, the separator alone guarantees that even for a row
    /// with blank fields.
    #[must_use]
    pub fn query(&self) -> String {
        let query = format!("{} {}", self.title, self.artist);
        log::trace!("Built catalog query `{query}'.");
        query
    }

    /// Exact label comparison, rows without a label never match.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.cluster_label.as_deref() == Some(label)
    }

    /// Case-insensitive substring test against the cluster label.
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn label_contains(&self, needle: &str) -> bool {
        self.cluster_label
            .as_deref()
            .is_some_and(|label| label.to_lowercase().contains(needle))
    }
}
