//! SQL for the DuckDB record store.
//!
//! List columns hold JSON arrays; NULL means the source had no list.

pub const CREATE_AUTHORS: &str = "\
    CREATE TABLE IF NOT EXISTS authors (\
        id VARCHAR PRIMARY KEY, \
        name VARCHAR NOT NULL, \
        personal_name VARCHAR NOT NULL\
    )";

pub const CREATE_WORKS: &str = "\
    CREATE TABLE IF NOT EXISTS works (\
        id VARCHAR PRIMARY KEY, \
        name VARCHAR NOT NULL, \
        description VARCHAR, \
        published_date DATE, \
        author_ids_json VARCHAR, \
        author_names_json VARCHAR, \
        cover_ids_json VARCHAR\
    )";

pub const UPSERT_AUTHOR: &str =
    "INSERT OR REPLACE INTO authors (id, name, personal_name) VALUES (?, ?, ?)";

pub const SELECT_AUTHOR: &str = "SELECT id, name, personal_name FROM authors WHERE id = ?";

/// Dates travel as ISO strings in both directions
pub const UPSERT_WORK: &str = "\
    INSERT OR REPLACE INTO works \
        (id, name, description, published_date, author_ids_json, author_names_json, cover_ids_json) \
    VALUES (?, ?, ?, CAST(? AS DATE), ?, ?, ?)";

pub const SELECT_WORK: &str = "\
    SELECT id, name, description, CAST(published_date AS VARCHAR), \
           author_ids_json, author_names_json, cover_ids_json \
    FROM works WHERE id = ?";

pub const COUNTS: &str = "SELECT (SELECT COUNT(*) FROM authors), (SELECT COUNT(*) FROM works)";

/// Resource limits applied right after open
pub fn settings(memory_limit: Option<&str>, threads: Option<usize>) -> String {
    let mut sql = String::new();
    if let Some(limit) = memory_limit {
        sql.push_str(&format!("SET memory_limit = '{}';", limit.replace('\'', "''")));
    }
    if let Some(threads) = threads {
        sql.push_str(&format!("SET threads = {threads};"));
    }
    sql
}
