//! Tag parsing
//!
//! Tags are restricted to ASCII letters, digits and underscores. A tag list
//! is always kept sorted and free of duplicates.

use std::collections::BTreeSet;

use crate::error::{QuoteError, Result};

/// Parse a comma-separated tag string
///
/// Tokens are trimmed and empty tokens dropped.
///
/// ```
/// let tags = jotquote_core::parse_tags(" ,tag2,tag3,,tag2,tag1 ").unwrap();
/// assert_eq!(tags, vec!["tag1", "tag2", "tag3"]);
/// ```
pub fn parse_tags(tag_string: &str) -> Result<Vec<String>> {
    normalize_tags(tag_string.split(','))
}

/// Validate, trim, sort and deduplicate a list of tags
pub(crate) fn normalize_tags<I, S>(tags: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tagset = BTreeSet::new();
    for raw in tags {
        let tag = raw.as_ref().trim();
        if !tag.chars().all(is_tag_char) {
            return Err(QuoteError::Validation(format!(
                "invalid tag '{}': only numbers, letters, and commas are allowed in tags",
                tag
            )));
        }
        if !tag.is_empty() {
            tagset.insert(tag.to_string());
        }
    }
    Ok(tagset.into_iter().collect())
}

fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
