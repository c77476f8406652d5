//! Author record transformation: dump JSON → [`Author`]

use bookline_core::Author;
use serde::Deserialize;

use super::{AUTHOR_KEY_PREFIX, short_key};

/// Open Library author JSON structure (fields we keep)
#[derive(Debug, Deserialize)]
pub struct AuthorRow {
    #[serde(default)]
    pub key: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub personal_name: Option<String>,
}

impl AuthorRow {
    /// Short ID with the `/authors/` namespace removed; empty if `key` is absent
    pub fn short_id(&self) -> &str {
        self.key
            .as_deref()
            .map_or("", |key| short_key(key, AUTHOR_KEY_PREFIX))
    }

    pub fn into_author(self) -> Author {
        let id = self.short_id().to_string();
        Author {
            id,
            name: self.name.unwrap_or_default(),
            personal_name: self.personal_name.unwrap_or_default(),
        }
    }
}
