//! Error types for record processing and store access

use std::error::Error;

/// Boxed error from a store backend or parser.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Error from a [`crate::RecordStore`] implementation.
#[derive(Debug)]
pub enum StoreError {
    /// Backend failure (connection, SQL, constraint, ...)
    Backend(BoxError),
    /// Stored value could not be encoded or decoded
    Codec(serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backend(e) => write!(f, "store backend: {e}"),
            Self::Codec(e) => write!(f, "store codec: {e}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Backend(e) => Some(e.as_ref()),
            Self::Codec(e) => Some(e),
        }
    }
}

impl StoreError {
    pub fn backend(e: impl Into<BoxError>) -> Self {
        Self::Backend(e.into())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Codec(e)
    }
}

/// Failure to turn one dump line into a persisted record.
///
/// Always record-level: the line is skipped and the stage continues.
#[derive(Debug)]
pub enum RecordError {
    /// Line has no `{`, so there is no JSON object to parse
    NoJson,
    /// JSON part of the line is not valid UTF-8
    Encoding(std::str::Utf8Error),
    /// Malformed JSON or unexpected field type
    Json(BoxError),
    /// Required field absent (dotted path)
    MissingField(&'static str),
    /// Timestamp did not match the dump's fixed format
    Date {
        value: String,
        source: chrono::ParseError,
    },
    /// Store read or write failed for this record
    Store(StoreError),
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoJson => write!(f, "no JSON object on line"),
            Self::Encoding(e) => write!(f, "invalid UTF-8: {e}"),
            Self::Json(e) => write!(f, "JSON: {e}"),
            Self::MissingField(field) => write!(f, "missing field `{field}`"),
            Self::Date { value, source } => write!(f, "bad timestamp {value:?}: {source}"),
            Self::Store(e) => write!(f, "{e}"),
        }
    }
}

impl Error for RecordError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoJson | Self::MissingField(_) => None,
            Self::Encoding(e) => Some(e),
            Self::Json(e) => Some(e.as_ref()),
            Self::Date { source, .. } => Some(source),
            Self::Store(e) => Some(e),
        }
    }
}

impl RecordError {
    /// Whether the failure came from the store rather than the input line.
    pub fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

impl From<StoreError> for RecordError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}
