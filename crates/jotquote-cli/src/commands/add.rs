//! Add command handler

use std::io::{self, BufRead};

use anyhow::{Context, Result};

use jotquote_core::{parse_quote, parse_quotes, QuoteFormat, QuoteStore};

use crate::output::Output;

/// Source name for quotes read from standard input
const STDIN_SOURCE: &str = "stdin";

/// Add one quote, or one quote per line of stdin when `quote` is `-`
pub fn add(store: &QuoteStore, quote: &str, extended: bool, output: &Output) -> Result<()> {
    let format = if extended {
        QuoteFormat::Extended
    } else {
        QuoteFormat::Simple
    };

    let (added, total) = if quote == "-" {
        let lines = io::stdin()
            .lock()
            .lines()
            .collect::<io::Result<Vec<String>>>()
            .context("Failed to read quotes from stdin")?;
        let quotes = parse_quotes(lines, STDIN_SOURCE, format)?;
        let added = quotes.len();
        (added, store.add_quotes(quotes, STDIN_SOURCE)?)
    } else {
        (1, store.add_quote(parse_quote(quote, format)?)?)
    };

    output.print_added(added, total);
    Ok(())
}
