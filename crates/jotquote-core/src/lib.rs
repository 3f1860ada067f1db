//! jotquote core library
//!
//! This crate provides the core functionality for jotquote, a manager for a
//! personal collection of quotes kept in a plain text file.
//!
//! # Quote file
//!
//! One quote per line, pipe delimited:
//!
//! ```text
//! <quote> | <author> | [<publication>] | [<tag1>, <tag2>, ...]
//! ```
//!
//! Blank lines and lines beginning with `#` are ignored. Rewrites go
//! through a temp file and a rename, keeping a backup of the previous
//! contents beside the file.
//!
//! # Quick Start
//!
//! ```text
//! let store = QuoteStore::open(Config::load()?);
//!
//! // Add a quote in the human-friendly format
//! let quote = parse_quote("Quote. - Author (Publication)", QuoteFormat::Simple)?;
//! store.add_quote(quote)?;
//!
//! // Filter
//! let quotes = store.load()?;
//! let funny = select(&quotes, &Criteria::default().with_tags(parse_tags("funny")?))?;
//! ```
//!
//! # Modules
//!
//! - `store`: File-level operations (main entry point)
//! - `models`: The `Quote` value object
//! - `parser`: Simple and extended line formats
//! - `tags`: Tag string parsing
//! - `selector`: Filtering and random picks
//! - `daily`: Reproducible quote of the day
//! - `storage`: Atomic writes, backups and the mtime cache
//! - `config`: Application configuration
//! - `error`: Error type

pub mod config;
pub mod daily;
pub mod error;
pub mod models;
pub mod parser;
pub mod selector;
pub mod storage;
pub mod store;
pub mod tags;

pub use config::{Config, LineSeparator};
pub use daily::{daily_index, days_since_epoch, shuffled_indices, todays_index};
pub use error::{QuoteError, Result};
pub use models::Quote;
pub use parser::{format_quote, parse_quote, parse_quotes, QuoteFormat};
pub use selector::{select, select_one, select_random, Criteria};
pub use storage::{read_quotes, write_quotes, QuoteCache};
pub use store::QuoteStore;
pub use tags::parse_tags;
