//! Tag command handlers

use anyhow::Result;

use jotquote_core::{parse_tags, QuoteStore};

use crate::output::Output;

/// List every tag used in the quote file
pub fn show_all(store: &QuoteStore, output: &Output) -> Result<()> {
    let tags = store.all_tags()?;
    output.print_tags(&tags)
}

/// Replace the tags of one quote, chosen by number or hash
///
/// Prints nothing on success unless JSON output was requested.
pub fn set(
    store: &QuoteStore,
    number: Option<usize>,
    hash: Option<&str>,
    new_tags: &str,
    output: &Output,
) -> Result<()> {
    let tags = parse_tags(new_tags)?;
    let updated = store.set_tags(number, hash, tags)?;

    if output.is_json() {
        println!("{}", serde_json::to_string_pretty(&updated)?);
    }
    Ok(())
}
