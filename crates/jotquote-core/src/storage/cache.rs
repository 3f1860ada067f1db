//! Modification-time cache
//!
//! Long-running readers (the web server) keep a parsed copy of the quote file
//! and only re-read it when its last-modified timestamp changes.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use tracing::debug;

use crate::error::{QuoteError, Result};
use crate::models::Quote;
use crate::storage::persistence::read_quotes;

/// Parsed quotes memoised by file modification time
#[derive(Debug)]
pub struct QuoteCache {
    path: PathBuf,
    cached: Option<(SystemTime, Arc<Vec<Quote>>)>,
}

impl QuoteCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the quotes, re-reading the file if it changed since the last call
    ///
    /// Any failure drops the cached copy so the next call reads again.
    pub fn get(&mut self) -> Result<Arc<Vec<Quote>>> {
        let mtime = match modified(&self.path) {
            Ok(mtime) => mtime,
            Err(e) => {
                self.cached = None;
                return Err(e);
            }
        };

        if let Some((cached_mtime, ref quotes)) = self.cached {
            if cached_mtime == mtime {
                return Ok(Arc::clone(quotes));
            }
            debug!("Quote file {:?} changed, reloading", self.path);
        }

        match read_quotes(&self.path) {
            Ok(quotes) => {
                let quotes = Arc::new(quotes);
                self.cached = Some((mtime, Arc::clone(&quotes)));
                Ok(quotes)
            }
            Err(e) => {
                self.cached = None;
                Err(e)
            }
        }
    }

    /// Forget the cached copy
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}

fn modified(path: &Path) -> Result<SystemTime> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| QuoteError::from_io(e, path.to_path_buf()))
}
