//! Info command handler

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use jotquote_core::QuoteStore;

use crate::output::{Output, OutputFormat};

/// Show the version, the settings and quote file locations, and file stats
///
/// Works even when the quote file does not exist yet.
pub fn show(store: &QuoteStore, settings_path: &Path, output: &Output) -> Result<()> {
    let stats = if store.exists() {
        let count = store.load()?.len();
        let modified = std::fs::metadata(store.path())
            .and_then(|m| m.modified())
            .with_context(|| format!("Failed to read metadata of {:?}", store.path()))?;
        Some((count, DateTime::<Local>::from(modified)))
    } else {
        None
    };

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "version": env!("CARGO_PKG_VERSION"),
                    "settings_file": settings_path,
                    "quote_file": store.path(),
                    "quote_count": stats.map(|(count, _)| count),
                    "modified": stats.map(|(_, modified)| modified.to_rfc3339()),
                })
            );
        }
        OutputFormat::Human => {
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!("Settings file: {}", settings_path.display());
            println!("Quote file: {}", store.path().display());
            if let Some((count, modified)) = stats {
                println!("Number of quotes: {}", count);
                println!(
                    "Time quote file last modified: {}",
                    modified.format("%a %b %e %H:%M:%S %Y")
                );
            }
        }
    }

    Ok(())
}
