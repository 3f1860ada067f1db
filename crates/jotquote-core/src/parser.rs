//! Quote line parsing
//!
//! A quote can be written in two syntaxes:
//!
//! - **Simple**: `<quote> - <author> [(publication)]`, also
//!   `<quote> - <author>, <publication>` and `<quote> - <author>, 'publication'`.
//!   Tags cannot be given in this form.
//! - **Extended**: `<quote> | <author> | [<publication>] | [<tag1>, <tag2>, ...]`,
//!   the format used inside the quote file.
//!
//! The simple syntax has to guess which hyphen separates the quote from the
//! author, since hyphens also appear inside words and names. The rules are
//! tried in a fixed order and the first one that finds exactly one candidate
//! wins. Inputs where no rule is unambiguous are rejected rather than guessed.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{QuoteError, Result};
use crate::models::Quote;
use crate::tags::parse_tags;

/// Input syntax for a quote line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteFormat {
    /// Human-friendly `<quote> - <author>` form
    Simple,
    /// Pipe-delimited form used in the quote file
    Extended,
}

/// Hyphen right after a period: `Quote. - Author`
static HYPHEN_AFTER_PERIOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.\s*-\s*").expect("valid regex"));

/// Hyphen with whitespace on at least one side
static HYPHEN_WITH_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+-\s*|\s*-\s+").expect("valid regex"));

/// Author and publication forms, most specific first
static AUTHOR_PATTERNS: LazyLock<[Regex; 5]> = LazyLock::new(|| {
    [
        // Author name (publication)
        r"^([^,]+)\s*\((.*)\)$",
        // Author name, (publication)
        r"^([^,]+),\s*[(](.+)[)]$",
        // Author name, publication
        r"^([^,]+),\s*([^,']+)$",
        // Author name, 'publication'
        r"^([^,]+),\s*'(.+)'$",
        // Author name
        r"^([^,()']+)\s*()$",
    ]
    .map(|pattern| Regex::new(pattern).expect("valid regex"))
});

/// Parse a single line into a quote
///
/// The line is trimmed first. Errors carry no line context; see
/// [`parse_quotes`] for batch parsing with line numbers.
pub fn parse_quote(line: &str, format: QuoteFormat) -> Result<Quote> {
    let line = line.trim();
    let (text, author, publication, tags) = match format {
        QuoteFormat::Simple => parse_simple(line)?,
        QuoteFormat::Extended => parse_extended(line)?,
    };
    Quote::new(text, author, publication.as_deref(), tags)
}

/// Parse every line of a text stream
///
/// Blank lines and lines starting with `#` are skipped. The first failure is
/// reported with its 1-based line number, `source_name`, and the trimmed line.
pub fn parse_quotes<I, S>(lines: I, source_name: &str, format: QuoteFormat) -> Result<Vec<Quote>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut quotes = Vec::new();

    for (index, raw) in lines.into_iter().enumerate() {
        let line = raw.as_ref().trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let quote = parse_quote(line, format).map_err(|e| QuoteError::Syntax {
            line: index + 1,
            source_name: source_name.to_string(),
            reason: e.to_string(),
            text: line.to_string(),
        })?;
        quotes.push(quote);
    }

    debug!(source = source_name, count = quotes.len(), "parsed quotes");
    Ok(quotes)
}

/// Serialize a quote to its canonical quote-file line (without terminator)
pub fn format_quote(quote: &Quote) -> String {
    format!(
        "{} | {} | {} | {}",
        quote.text(),
        quote.author(),
        quote.publication().unwrap_or(""),
        quote.tags().join(", ")
    )
}

type Fields = (String, String, Option<String>, Vec<String>);

fn parse_extended(line: &str) -> Result<Fields> {
    let fields: Vec<&str> = line.split('|').collect();
    if fields.len() != 4 {
        return Err(QuoteError::Parse("did not find 3 '|' characters".to_string()));
    }

    let tags = parse_tags(fields[3])?;
    let publication = match fields[2].trim() {
        "" => None,
        p => Some(p.to_string()),
    };

    Ok((
        fields[0].trim().to_string(),
        fields[1].trim().to_string(),
        publication,
        tags,
    ))
}

fn parse_simple(line: &str) -> Result<Fields> {
    if line.contains('|') {
        return Err(QuoteError::Parse(
            "the quote included an embedded pipe character (|)".to_string(),
        ));
    }

    let (start, end) = find_separator(line).ok_or_else(|| {
        QuoteError::Parse(
            "unable to determine which hyphen separates the quote from the author.".to_string(),
        )
    })?;

    let text = &line[..start];
    let (author, publication) = split_author(&line[end..])?;

    Ok((text.trim().to_string(), author, publication, Vec::new()))
}

/// Locate the hyphen separating quote from author, as a byte range
fn find_separator(line: &str) -> Option<(usize, usize)> {
    // The period itself stays with the quote
    let after_period: Vec<(usize, usize)> = HYPHEN_AFTER_PERIOD
        .find_iter(line)
        .map(|m| (m.start() + 1, m.end()))
        .collect();
    if after_period.len() == 1 {
        return Some(after_period[0]);
    }

    let with_space: Vec<(usize, usize)> = HYPHEN_WITH_SPACE
        .find_iter(line)
        .map(|m| (m.start(), m.end()))
        .collect();
    if with_space.len() == 1 {
        return Some(with_space[0]);
    }
    if !with_space.is_empty() {
        return None;
    }

    let bare = bare_hyphens(line);
    if bare.len() == 1 {
        return Some((bare[0], bare[0] + 1));
    }
    None
}

/// Hyphens with a non-space character directly on both sides
fn bare_hyphens(line: &str) -> Vec<usize> {
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    chars
        .windows(3)
        .filter(|w| w[1].1 == '-' && w[0].1 != ' ' && w[2].1 != ' ')
        .map(|w| w[1].0)
        .collect()
}

/// Split the text after the separator into author and optional publication
fn split_author(rest: &str) -> Result<(String, Option<String>)> {
    let caps = AUTHOR_PATTERNS
        .iter()
        .find_map(|re| re.captures(rest))
        .ok_or_else(|| {
            QuoteError::Parse(
                "unable to parse the author and publication.  Try 'Quote - Author (Publication)', \
                 or 'Quote - Author, Publication'"
                    .to_string(),
            )
        })?;

    let author = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
    let publication = caps
        .get(2)
        .map(|m| m.as_str().trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string);

    Ok((author, publication))
}
