//! bookline-store: DuckDB-backed record store
//!
//! One database file holds the `authors` and `works` tables. The same
//! [`DuckDbStore`] serves as author lookup source and work sink.

mod config;
mod sql;

pub use config::StoreConfig;

use anyhow::{Context, Result};
use bookline_core::{Author, RecordStore, StoreError, Work};
use chrono::NaiveDate;
use duckdb::{Connection, OptionalExt, params};

/// Row counts per table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreCounts {
    pub authors: u64,
    pub works: u64,
}

/// Persistent store over a single DuckDB connection.
pub struct DuckDbStore {
    conn: Connection,
}

impl DuckDbStore {
    /// Open (or create) the database at `config.path` and ensure the schema.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create store dir: {}", parent.display()))?;
        }
        let conn = Connection::open(&config.path)
            .with_context(|| format!("Failed to open DuckDB at {}", config.path.display()))?;
        log::debug!("Opened store {}", config.path.display());
        Self::init(conn, config)
    }

    /// Throwaway database, used by tests and dry runs.
    pub fn open_in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().context("Failed to open DuckDB in-memory connection")?;
        Self::init(conn, &StoreConfig::default())
    }

    fn init(conn: Connection, config: &StoreConfig) -> Result<Self> {
        let settings = sql::settings(config.memory_limit.as_deref(), config.threads);
        if !settings.is_empty() {
            conn.execute_batch(&settings)
                .context("Failed to configure DuckDB")?;
        }
        conn.execute_batch(sql::CREATE_AUTHORS)
            .context("Failed to create authors table")?;
        conn.execute_batch(sql::CREATE_WORKS)
            .context("Failed to create works table")?;
        Ok(Self { conn })
    }

    pub fn counts(&self) -> Result<StoreCounts> {
        self.conn
            .query_row(sql::COUNTS, [], |row| {
                Ok(StoreCounts {
                    authors: row.get::<_, i64>(0)? as u64,
                    works: row.get::<_, i64>(1)? as u64,
                })
            })
            .context("Failed to count stored records")
    }

    /// Run `f` inside one transaction, rolling back on failure.
    fn in_transaction(
        &self,
        f: impl FnOnce() -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        self.conn
            .execute_batch("BEGIN TRANSACTION")
            .map_err(StoreError::backend)?;
        match f() {
            Ok(()) => self
                .conn
                .execute_batch("COMMIT")
                .map_err(StoreError::backend),
            Err(e) => {
                if let Err(rollback) = self.conn.execute_batch("ROLLBACK") {
                    log::warn!("Rollback failed: {rollback}");
                }
                Err(e)
            }
        }
    }

    fn insert_author(&self, author: &Author) -> Result<(), StoreError> {
        let mut stmt = self
            .conn
            .prepare_cached(sql::UPSERT_AUTHOR)
            .map_err(StoreError::backend)?;
        stmt.execute(params![author.id, author.name, author.personal_name])
            .map_err(StoreError::backend)?;
        Ok(())
    }

    fn insert_work(&self, work: &Work) -> Result<(), StoreError> {
        let published = work.published_date.map(|d| d.format("%Y-%m-%d").to_string());
        let author_ids = encode_list(work.author_ids.as_deref())?;
        let author_names = encode_list(work.author_names.as_deref())?;
        let cover_ids = encode_list(work.cover_ids.as_deref())?;

        let mut stmt = self
            .conn
            .prepare_cached(sql::UPSERT_WORK)
            .map_err(StoreError::backend)?;
        stmt.execute(params![
            work.id,
            work.name,
            work.description,
            published,
            author_ids,
            author_names,
            cover_ids,
        ])
        .map_err(StoreError::backend)?;
        Ok(())
    }
}

fn encode_list(list: Option<&[String]>) -> Result<Option<String>, StoreError> {
    Ok(list.map(serde_json::to_string).transpose()?)
}

fn decode_list(json: Option<String>) -> Result<Option<Vec<String>>, StoreError> {
    Ok(json.as_deref().map(serde_json::from_str).transpose()?)
}

fn decode_date(value: Option<String>) -> Result<Option<NaiveDate>, StoreError> {
    value
        .as_deref()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .map_err(StoreError::backend)
}

impl RecordStore<Author> for DuckDbStore {
    fn save(&self, entity: &Author) -> Result<(), StoreError> {
        self.insert_author(entity)
    }

    fn save_batch(&self, entities: &[Author]) -> Result<(), StoreError> {
        self.in_transaction(|| entities.iter().try_for_each(|a| self.insert_author(a)))
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Author>, StoreError> {
        let mut stmt = self
            .conn
            .prepare_cached(sql::SELECT_AUTHOR)
            .map_err(StoreError::backend)?;
        stmt.query_row([id], |row| {
            Ok(Author {
                id: row.get(0)?,
                name: row.get(1)?,
                personal_name: row.get(2)?,
            })
        })
        .optional()
        .map_err(StoreError::backend)
    }
}

/// Work row before JSON and date decoding
type RawWork = (
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
);

impl RecordStore<Work> for DuckDbStore {
    fn save(&self, entity: &Work) -> Result<(), StoreError> {
        self.insert_work(entity)
    }

    fn save_batch(&self, entities: &[Work]) -> Result<(), StoreError> {
        self.in_transaction(|| entities.iter().try_for_each(|w| self.insert_work(w)))
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Work>, StoreError> {
        let mut stmt = self
            .conn
            .prepare_cached(sql::SELECT_WORK)
            .map_err(StoreError::backend)?;
        let raw: Option<RawWork> = stmt
            .query_row([id], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                ))
            })
            .optional()
            .map_err(StoreError::backend)?;

        let Some((id, name, description, published, author_ids, author_names, cover_ids)) = raw
        else {
            return Ok(None);
        };
        Ok(Some(Work {
            id,
            name,
            description,
            published_date: decode_date(published)?,
            author_ids: decode_list(author_ids)?,
            author_names: decode_list(author_names)?,
            cover_ids: decode_list(cover_ids)?,
        }))
    }
}
