//! Subcommand handlers

pub mod add;
pub mod info;
pub mod list;
pub mod random;
pub mod tags;
pub mod webserver;

use anyhow::{bail, Result};

use jotquote_core::{parse_tags, Criteria};

/// Parse the value of a `-n` option
pub fn parse_number(value: &str) -> Result<usize> {
    match value.parse() {
        Ok(number) => Ok(number),
        Err(_) => bail!(
            "the value '{}' is not a valid number, the -n option requires an integer line number.",
            value
        ),
    }
}

/// Build selection criteria from the filter options shared by subcommands
pub fn criteria(
    tags: Option<&str>,
    keyword: Option<&str>,
    number: Option<&str>,
    hash: Option<&str>,
) -> Result<Criteria> {
    let mut criteria = Criteria::default();
    if let Some(tags) = tags {
        criteria = criteria.with_tags(parse_tags(tags)?);
    }
    if let Some(keyword) = keyword {
        criteria = criteria.with_keyword(keyword);
    }
    if let Some(number) = number {
        criteria = criteria.with_number(parse_number(number)?);
    }
    if let Some(hash) = hash {
        criteria = criteria.with_hash(hash);
    }
    Ok(criteria)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("3").unwrap(), 3);

        let err = parse_number("notanumber").unwrap_err();
        assert_eq!(
            err.to_string(),
            "the value 'notanumber' is not a valid number, the -n option requires an integer line number."
        );
        assert!(parse_number("-1").is_err());
    }

    #[test]
    fn test_criteria() {
        let criteria = criteria(Some("hedberg, funny"), Some("tennis"), Some("2"), None).unwrap();
        assert_eq!(criteria.tags, vec!["funny", "hedberg"]);
        assert_eq!(criteria.keyword.as_deref(), Some("tennis"));
        assert_eq!(criteria.number, Some(2));
        assert_eq!(criteria.hash, None);

        assert_eq!(super::criteria(None, None, None, None).unwrap(), Criteria::default());
    }

    #[test]
    fn test_criteria_invalid_tag() {
        let err = criteria(Some("badtag!"), None, None, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid tag 'badtag!': only numbers, letters, and commas are allowed in tags"
        );
    }
}
