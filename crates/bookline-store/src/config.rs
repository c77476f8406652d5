use std::path::PathBuf;

/// Location and resource limits of the DuckDB store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Database file, created with its parent directory if missing
    pub path: PathBuf,
    /// DuckDB memory limit (e.g. "4GB"); DuckDB's default when unset
    pub memory_limit: Option<String>,
    /// Worker threads; DuckDB's default when unset
    pub threads: Option<usize>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/bookline.duckdb"),
            memory_limit: None,
            threads: None,
        }
    }
}
