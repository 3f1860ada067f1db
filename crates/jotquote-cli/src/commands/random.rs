//! Random and quote of the day handlers

use anyhow::Result;

use jotquote_core::{select_random, todays_index, Criteria, QuoteStore};

use crate::output::Output;

/// Show one quote picked at random from those matching the criteria
///
/// Prints nothing when no quote matches.
pub fn random(store: &QuoteStore, criteria: &Criteria, output: &Output) -> Result<()> {
    let quotes = store.load()?;
    if let Some(index) = select_random(&quotes, criteria)? {
        output.print_quote(&quotes, index)?;
    }
    Ok(())
}

/// Show the quote of the day
pub fn today(store: &QuoteStore, output: &Output) -> Result<()> {
    let quotes = store.load()?;
    if let Some(index) = todays_index(quotes.len()) {
        output.print_quote(&quotes, index)?;
    }
    Ok(())
}
