//! Bookline Core - Common infrastructure for dump loading pipelines
//!
//! This crate provides the persisted entity model, the keyed record store
//! abstraction, and the line-oriented reading machinery shared by the
//! Open Library loaders and the CLI.

pub mod buffer;
pub mod error;
pub mod lines;
pub mod logging;
pub mod model;
pub mod progress;
pub mod shutdown;
pub mod store;
pub mod stream;

// Re-exports for convenience
pub use buffer::{Batch, DEFAULT_BATCH_SIZE, RecordBuffer};
pub use error::{RecordError, StoreError};
pub use lines::{LineStats, json_object, process_lines};
pub use logging::{IndicatifLogger, Verbosity, init_logging};
pub use model::{Author, Keyed, Work};
pub use progress::{ProgressContext, fmt_num};
pub use shutdown::{install_signal_handlers, shutdown_flag};
pub use store::{MemoryStore, RecordStore};
pub use stream::{ByteCounter, DumpReader, open_dump};
