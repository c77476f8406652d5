//! Dump line → entity transformation for Open Library records

pub mod author;
pub mod work;

use bookline_core::{RecordError, json_object};
use serde::de::DeserializeOwned;

/// Key namespace of author records, e.g. "/authors/OL23919A"
pub const AUTHOR_KEY_PREFIX: &str = "/authors/";

/// Key namespace of work records, e.g. "/works/OL45804W"
pub const WORK_KEY_PREFIX: &str = "/works/";

/// Strip a key namespace once; keys without it are returned unchanged.
pub fn short_key<'a>(key: &'a str, prefix: &str) -> &'a str {
    key.strip_prefix(prefix).unwrap_or(key)
}

/// Parse the JSON object embedded in a dump line.
pub fn parse_line<T: DeserializeOwned>(line: &[u8]) -> Result<T, RecordError> {
    let json = json_object(line)?;
    sonic_rs::from_str(json).map_err(|e| RecordError::Json(Box::new(e)))
}

// Re-exports
pub use author::AuthorRow;
pub use work::WorkRow;
