//! Work record transformation: dump JSON → [`Work`] with resolved author names

use bookline_core::{RecordError, StoreError, Work};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde::de::IgnoredAny;

use super::{AUTHOR_KEY_PREFIX, WORK_KEY_PREFIX, short_key};

/// Format of `created.value`, e.g. "2009-12-11T01:57:19.964652"
pub const CREATED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

// === Row struct (deserialized from JSON) ===

/// Open Library work JSON structure (fields we keep)
#[derive(Debug, Deserialize)]
pub struct WorkRow {
    /// Required, e.g. "/works/OL45804W"
    #[serde(default)]
    pub key: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<TextField>,

    /// Creation timestamp object: `{"type": "/type/datetime", "value": "..."}`
    #[serde(default)]
    pub created: Option<Timestamp>,

    #[serde(default)]
    pub authors: Option<Vec<AuthorRole>>,

    /// Cover image IDs (integers in current dumps, strings in some older ones)
    #[serde(default)]
    pub covers: Option<Vec<CoverId>>,
}

/// Free-text field in any of the shapes seen across dump variants.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TextField {
    Plain(String),
    Nested(NestedText),
    Unrecognized(IgnoredAny),
}

/// `{"type": "/type/text", "value": "..."}` or `{"description": "..."}`
#[derive(Debug, Deserialize)]
pub struct NestedText {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Timestamp {
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuthorRole {
    #[serde(default)]
    pub author: Option<KeyRef>,
}

#[derive(Debug, Deserialize)]
pub struct KeyRef {
    #[serde(default)]
    pub key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CoverId {
    Number(i64),
    /// Above `i64::MAX`
    Unsigned(u64),
    Float(f64),
    Text(String),
}

impl std::fmt::Display for CoverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Unsigned(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Parse a `created.value` timestamp, keeping only the calendar date.
pub fn parse_created(value: &str) -> Result<NaiveDate, RecordError> {
    NaiveDateTime::parse_from_str(value, CREATED_FORMAT)
        .map(|ts| ts.date())
        .map_err(|source| RecordError::Date {
            value: value.to_string(),
            source,
        })
}

impl WorkRow {
    /// Short ID with the `/works/` namespace removed
    pub fn short_id(&self) -> Result<&str, RecordError> {
        self.key
            .as_deref()
            .map(|key| short_key(key, WORK_KEY_PREFIX))
            .ok_or(RecordError::MissingField("key"))
    }

    /// Description text; unset for any shape we cannot read
    pub fn description_text(&self) -> Option<String> {
        match self.description.as_ref()? {
            TextField::Plain(text) => Some(text.clone()),
            TextField::Nested(nested) => nested.description.clone().or_else(|| nested.value.clone()),
            TextField::Unrecognized(_) => None,
        }
    }

    /// Date part of `created.value`; `created` present without `value` is an error
    pub fn published_date(&self) -> Result<Option<NaiveDate>, RecordError> {
        let Some(created) = &self.created else {
            return Ok(None);
        };
        let value = created
            .value
            .as_deref()
            .ok_or(RecordError::MissingField("created.value"))?;
        parse_created(value).map(Some)
    }

    /// Author short IDs in source order; every entry must carry `author.key`
    pub fn author_ids(&self) -> Result<Option<Vec<String>>, RecordError> {
        let Some(roles) = &self.authors else {
            return Ok(None);
        };
        roles
            .iter()
            .map(|role| {
                role.author
                    .as_ref()
                    .and_then(|a| a.key.as_deref())
                    .map(|key| short_key(key, AUTHOR_KEY_PREFIX).to_string())
                    .ok_or(RecordError::MissingField("authors[].author.key"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    pub fn cover_ids(&self) -> Option<Vec<String>> {
        self.covers
            .as_ref()
            .map(|covers| covers.iter().map(ToString::to_string).collect())
    }

    /// Build the persisted work, resolving each author ID through `resolve`.
    ///
    /// Field validation happens before any lookup, so a malformed record
    /// never touches the store.
    pub fn into_work(
        self,
        mut resolve: impl FnMut(&str) -> Result<String, StoreError>,
    ) -> Result<Work, RecordError> {
        let id = self.short_id()?.to_string();
        let published_date = self.published_date()?;
        let author_ids = self.author_ids()?;
        let description = self.description_text();
        let cover_ids = self.cover_ids();

        let author_names = match &author_ids {
            Some(ids) => Some(
                ids.iter()
                    .map(|id| resolve(id))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            None => None,
        };

        Ok(Work {
            id,
            name: self.title.unwrap_or_default(),
            description,
            published_date,
            author_ids,
            author_names,
            cover_ids,
        })
    }
}
