//! Data model for jotquote
//!
//! Defines the `Quote` value object. A quote is validated when it is built
//! and is never mutated afterwards, apart from replacing its tags.

use md5::{Digest, Md5};
use serde::Serialize;

use crate::error::{QuoteError, Result};
use crate::tags::normalize_tags;

/// A single quote record
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Quote {
    /// The quote body
    text: String,
    /// To whom the quote is attributed
    author: String,
    /// Publication containing the quote, if known
    publication: Option<String>,
    /// Sorted, deduplicated tags
    tags: Vec<String>,
}

impl Quote {
    /// Build a validated quote
    ///
    /// All fields are trimmed and an empty publication becomes `None`.
    /// Tags are validated, sorted and deduplicated.
    pub fn new(
        text: impl AsRef<str>,
        author: impl AsRef<str>,
        publication: Option<&str>,
        tags: Vec<String>,
    ) -> Result<Self> {
        let text = text.as_ref().trim().to_string();
        let author = author.as_ref().trim().to_string();
        let publication = publication
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        if text.is_empty() {
            return Err(QuoteError::Parse("a quote was not found".to_string()));
        }
        if author.is_empty() {
            return Err(QuoteError::Parse(
                "an author was not included with the quote.  \
                 Expecting quote in the format \"<quote> - <author>\"."
                    .to_string(),
            ));
        }

        check_chars(&text, "quote", &['|', '"', '\n', '\r'])?;
        check_chars(&author, "author", &['|', '\n', '\r'])?;
        if let Some(ref publication) = publication {
            check_chars(publication, "publication", &['|', '\n', '\r'])?;
        }

        Ok(Self {
            text,
            author,
            publication,
            tags: normalize_tags(tags)?,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn publication(&self) -> Option<&str> {
        self.publication.as_deref()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Replace all tags
    pub fn set_tags(&mut self, tags: Vec<String>) -> Result<()> {
        self.tags = normalize_tags(tags)?;
        Ok(())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// True if every given tag is present (an empty list always matches)
    pub fn has_tags<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        tags.iter().all(|tag| self.has_tag(tag.as_ref()))
    }

    /// Case-sensitive match against text, author, publication, or an exact tag
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.text.contains(keyword)
            || self.author.contains(keyword)
            || self
                .publication
                .as_deref()
                .is_some_and(|p| p.contains(keyword))
            || self.has_tag(keyword)
    }

    /// Content fingerprint: first 64 bits of the MD5 of the text, in hex
    ///
    /// Collisions are possible, so callers matching on a fingerprint must
    /// check that only one quote matched.
    pub fn fingerprint(&self) -> String {
        let digest = Md5::digest(self.text.as_bytes());
        hex::encode(&digest[..8])
    }
}

/// Reject the first forbidden character found in a field
fn check_chars(value: &str, field: &str, forbidden: &[char]) -> Result<()> {
    match value.chars().find(|c| forbidden.contains(c)) {
        Some(c) => Err(QuoteError::Validation(format!(
            "the {} included a {} character",
            field,
            describe_char(c)
        ))),
        None => Ok(()),
    }
}

fn describe_char(c: char) -> String {
    match c {
        '\n' => "newline (0x0a)".to_string(),
        '\r' => "carriage return (0x0d)".to_string(),
        other => format!("({})", other),
    }
}
