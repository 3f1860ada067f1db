//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output, in short, long or extended form
//! - JSON output (--json flag)

use anyhow::Result;
use serde::Serialize;

use jotquote_core::{format_quote, Quote};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// How the `list` subcommand renders each quote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStyle {
    /// `<quote>  - <author> (<publication>)`
    Short,
    /// Numbered, one field per line, with tags and hash
    Long,
    /// The pipe-delimited quote file format
    Extended,
}

impl ListStyle {
    /// Create style from the `-l` and `-e` flags
    pub fn from_flags(long: bool, extended: bool) -> Result<Self> {
        match (long, extended) {
            (true, true) => anyhow::bail!(
                "the 'extended' option and the 'long' option are mutually exclusive."
            ),
            (true, false) => Ok(ListStyle::Long),
            (false, true) => Ok(ListStyle::Extended),
            (false, false) => Ok(ListStyle::Short),
        }
    }
}

/// A quote as emitted in JSON output
#[derive(Debug, Serialize)]
struct QuoteView<'a> {
    number: usize,
    #[serde(flatten)]
    quote: &'a Quote,
    hash: String,
}

impl<'a> QuoteView<'a> {
    fn new(number: usize, quote: &'a Quote) -> Self {
        Self {
            number,
            quote,
            hash: quote.fingerprint(),
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is JSON
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print one quote; `index` is its 0-based position in the file
    pub fn print_quote(&self, quotes: &[Quote], index: usize) -> Result<()> {
        match self.format {
            OutputFormat::Human => println!("{}", format_short(&quotes[index])),
            OutputFormat::Json => {
                let view = QuoteView::new(index + 1, &quotes[index]);
                println!("{}", serde_json::to_string_pretty(&view)?);
            }
        }
        Ok(())
    }

    /// Print the quotes at the given 0-based positions
    pub fn print_quotes(&self, quotes: &[Quote], selected: &[usize], style: ListStyle) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                for &index in selected {
                    let quote = &quotes[index];
                    match style {
                        ListStyle::Short => println!("{}", format_short(quote)),
                        ListStyle::Long => print!("{}", format_long(quote, index + 1)),
                        ListStyle::Extended => println!("{}", format_quote(quote)),
                    }
                }
            }
            OutputFormat::Json => {
                let views: Vec<_> = selected
                    .iter()
                    .map(|&index| QuoteView::new(index + 1, &quotes[index]))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&views)?);
            }
        }
        Ok(())
    }

    /// Print a list of tags
    pub fn print_tags(&self, tags: &[String]) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                for tag in tags {
                    println!("{}", tag);
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(tags)?);
            }
        }
        Ok(())
    }

    /// Report quotes appended to the file
    pub fn print_added(&self, added: usize, total: usize) {
        match self.format {
            OutputFormat::Human => println!("{}", format_added(added, total)),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"added": added, "total": total}));
            }
        }
    }
}

/// `<quote>  - <author>` with ` (<publication>)` when there is one
pub fn format_short(quote: &Quote) -> String {
    match quote.publication() {
        Some(publication) => format!("{}  - {} ({})", quote.text(), quote.author(), publication),
        None => format!("{}  - {}", quote.text(), quote.author()),
    }
}

/// Multi-line form used by `list -l`, newline terminated
pub fn format_long(quote: &Quote, number: usize) -> String {
    format!(
        "{}: {}\n    author: {}\n    publication: {}\n    tags: {}\n    hash: {}\n",
        number,
        quote.text(),
        quote.author(),
        quote.publication().unwrap_or(""),
        quote.tags().join(", "),
        quote.fingerprint()
    )
}

fn format_added(added: usize, total: usize) -> String {
    if added == 1 {
        format!("{} quote added for total of {}.", added, total)
    } else {
        format!("{} quotes added for total of {}.", added, total)
    }
}
