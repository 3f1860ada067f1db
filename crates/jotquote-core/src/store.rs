//! Quote file operations
//!
//! `QuoteStore` ties a quote file path to the configuration used when
//! rewriting it. Every operation reads the file fresh and, when it changes
//! anything, rewrites the whole file through the atomic replace in
//! [`crate::storage::persistence`].
//!
//! ## Usage
//!
//! ```ignore
//! let store = QuoteStore::open(Config::load()?);
//!
//! let quote = parse_quote("Well done is better than well said. - Ben Franklin", QuoteFormat::Simple)?;
//! let total = store.add_quote(quote)?;
//!
//! store.set_tags(Some(total), None, parse_tags("franklin")?)?;
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Config;
use crate::error::{QuoteError, Result};
use crate::models::Quote;
use crate::selector::select_one;
use crate::storage::{check_for_duplicates, read_quotes, write_quotes};

/// Source name reported for duplicates within a batch of new quotes
const BATCH_SOURCE: &str = "stdin";

/// A quote file together with its write settings
#[derive(Debug, Clone)]
pub struct QuoteStore {
    path: PathBuf,
    config: Config,
}

impl QuoteStore {
    /// Open the quote file named by the configuration
    pub fn open(config: Config) -> Self {
        Self {
            path: config.quote_file.clone(),
            config,
        }
    }

    /// Open a specific quote file, using `config` only for write settings
    pub fn with_path(path: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read and parse every quote in the file
    pub fn load(&self) -> Result<Vec<Quote>> {
        read_quotes(&self.path)
    }

    /// Replace the file contents with `quotes`
    pub fn save(&self, quotes: &[Quote]) -> Result<()> {
        write_quotes(&self.path, quotes, &self.config)
    }

    /// Append one quote, returning the new total
    pub fn add_quote(&self, quote: Quote) -> Result<usize> {
        self.add_quotes(vec![quote], BATCH_SOURCE)
    }

    /// Append a batch of quotes, returning the new total
    ///
    /// Nothing is written if the file is missing, if two new quotes share
    /// their text (reported against `source_name`), or if any new quote is
    /// already in the file.
    pub fn add_quotes(&self, new_quotes: Vec<Quote>, source_name: &str) -> Result<usize> {
        if !self.path.exists() {
            return Err(QuoteError::NotFound {
                path: self.path.clone(),
            });
        }

        check_for_duplicates(&new_quotes, source_name)?;

        let mut quotes = self.load()?;
        let existing: BTreeSet<&str> = quotes.iter().map(Quote::text).collect();
        if let Some(present) = new_quotes.iter().find(|q| existing.contains(q.text())) {
            return Err(QuoteError::AlreadyPresent {
                text: present.text().to_string(),
                path: self.path.clone(),
            });
        }

        debug!("Adding {} quotes to {:?}", new_quotes.len(), self.path);
        quotes.extend(new_quotes);
        self.save(&quotes)?;
        Ok(quotes.len())
    }

    /// Sorted union of the tags of every quote in the file
    pub fn all_tags(&self) -> Result<Vec<String>> {
        let quotes = self.load()?;
        let tags: BTreeSet<String> = quotes
            .iter()
            .flat_map(|q| q.tags().iter().cloned())
            .collect();
        Ok(tags.into_iter().collect())
    }

    /// Replace the tags of the quote chosen by 1-based number or fingerprint
    ///
    /// Returns the updated quote.
    pub fn set_tags(
        &self,
        number: Option<usize>,
        hash: Option<&str>,
        tags: Vec<String>,
    ) -> Result<Quote> {
        let mut quotes = self.load()?;
        let index = select_one(&quotes, number, hash)?;

        quotes[index].set_tags(tags)?;
        self.save(&quotes)?;

        debug!("Set tags of quote {} in {:?}", index + 1, self.path);
        Ok(quotes[index].clone())
    }
}
