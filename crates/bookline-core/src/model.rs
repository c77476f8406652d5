//! Persisted entities

use chrono::NaiveDate;

/// Entity with a primary key, used by [`crate::RecordStore`] for upserts.
pub trait Keyed {
    fn id(&self) -> &str;
}

/// Author as persisted by the author stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Author {
    /// Short key, e.g. "OL23919A"
    pub id: String,
    pub name: String,
    pub personal_name: String,
}

impl Keyed for Author {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Work with author references resolved to a snapshot of author names.
///
/// `None` list fields mean the source line had no such array, which is
/// distinct from an empty array.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Work {
    /// Short key, e.g. "OL45804W"
    pub id: String,
    /// Title
    pub name: String,
    pub description: Option<String>,
    pub published_date: Option<NaiveDate>,
    pub author_ids: Option<Vec<String>>,
    /// Positionally parallel to `author_ids`
    pub author_names: Option<Vec<String>>,
    pub cover_ids: Option<Vec<String>>,
}

impl Keyed for Work {
    fn id(&self) -> &str {
        &self.id
    }
}
