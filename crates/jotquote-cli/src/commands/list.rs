//! List command handler

use anyhow::Result;

use jotquote_core::{select, Criteria, QuoteStore};

use crate::output::{ListStyle, Output};

/// List every quote matching the criteria
pub fn list(store: &QuoteStore, criteria: &Criteria, style: ListStyle, output: &Output) -> Result<()> {
    let quotes = store.load()?;
    let selected = select(&quotes, criteria)?;
    output.print_quotes(&quotes, &selected, style)
}
