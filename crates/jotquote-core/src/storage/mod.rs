//! Storage layer
//!
//! Handles reading and atomically rewriting the quote file, and caching a
//! parsed copy keyed by the file's modification time.

pub mod cache;
pub mod persistence;

pub use cache::QuoteCache;
pub use persistence::{
    available_temp_path, backup_path, check_for_duplicates, read_quotes, write_quotes,
};
