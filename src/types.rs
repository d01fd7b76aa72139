use serde::{Deserialize, Serialize};
use std::fmt;

/// One movie as extracted from the catalog and persisted to the store.
///
/// Every field except `title` may be empty. The store-assigned id is not part
/// of the record; stores hand it back separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub rank: Option<u32>,
    pub title: String,
    pub year: Option<i32>,
    pub duration: Option<String>,
    pub age_rating: Option<String>,
    pub rating_value: Option<f64>,
    /// Raw vote count text; separators are locale dependent so it is not parsed.
    pub rating_count: Option<String>,
    pub poster_url: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub directors: Vec<String>,
    #[serde(default)]
    pub cast: Vec<String>,
}

impl MovieRecord {
    /// A record with only a title and year set.
    pub fn new(title: impl Into<String>, year: Option<i32>) -> Self {
        Self {
            rank: None,
            title: title.into(),
            year,
            duration: None,
            age_rating: None,
            rating_value: None,
            rating_count: None,
            poster_url: None,
            description: None,
            directors: Vec::new(),
            cast: Vec::new(),
        }
    }

    pub fn with_rank(mut self, rank: u32) -> Self {
        self.rank = Some(rank);
        self
    }

    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::new(self.title.clone(), self.year)
    }

    /// Records whose title could not be recovered never enter the pipeline.
    pub fn is_usable(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

/// The `(title, year)` pair that decides whether two records are the same movie.
///
/// Title is optional because persisted documents are not guaranteed to carry one;
/// null components still group together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IdentityKey {
    pub title: Option<String>,
    pub year: Option<i32>,
}

impl IdentityKey {
    pub fn new(title: impl Into<String>, year: Option<i32>) -> Self {
        Self {
            title: Some(title.into()),
            year,
        }
    }

    /// Both components present, so a delete filter on this key is reliable.
    pub fn is_complete(&self) -> bool {
        self.title.is_some() && self.year.is_some()
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = self.title.as_deref().unwrap_or("<no title>");
        match self.year {
            Some(year) => write!(f, "{} ({})", title, year),
            None => write!(f, "{} (None)", title),
        }
    }
}

/// Result row of grouping the collection by identity key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCount {
    pub key: IdentityKey,
    pub count: u64,
}

/// A set of persisted documents sharing one identity key (count >= 2).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    pub key: IdentityKey,
    pub count: u64,
}

impl DuplicateGroup {
    /// Documents beyond the one canonical copy.
    pub fn extra_count(&self) -> u64 {
        self.count.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_key_groups_null_year() {
        let a = MovieRecord::new("Dune", None).identity_key();
        let b = MovieRecord::new("Dune", None).identity_key();
        assert_eq!(a, b);
        assert!(!a.is_complete());
        assert_eq!(a.to_string(), "Dune (None)");
    }

    #[test]
    fn blank_title_is_unusable() {
        assert!(!MovieRecord::new("  ", Some(1999)).is_usable());
        assert!(MovieRecord::new("Matrix", Some(1999)).is_usable());
    }
}
