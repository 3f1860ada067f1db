//! Quote selection
//!
//! Filters a quote sequence by tags, keyword, line number and fingerprint.
//! Random picking lives here too; the reproducible quote of the day is in
//! [`crate::daily`].

use rand::seq::IndexedRandom;

use crate::error::{QuoteError, Result};
use crate::models::Quote;

/// Filter criteria; every criterion that is set must match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    /// Quote must carry all of these tags
    pub tags: Vec<String>,
    /// Substring of text, author or publication, or an exact tag
    pub keyword: Option<String>,
    /// 1-based position in the file
    pub number: Option<usize>,
    /// Content fingerprint
    pub hash: Option<String>,
}

impl Criteria {
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn with_number(mut self, number: usize) -> Self {
        self.number = Some(number);
        self
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    fn matches(&self, index: usize, quote: &Quote) -> bool {
        quote.has_tags(&self.tags)
            && self.keyword.as_deref().map_or(true, |k| quote.has_keyword(k))
            && self.number.map_or(true, |n| n == index + 1)
            && self
                .hash
                .as_deref()
                .map_or(true, |h| h == quote.fingerprint())
    }
}

/// Return the 0-based indices of all quotes matching the criteria
///
/// A number past the end of the sequence and a fingerprint matching more
/// than one quote are errors, not empty results.
pub fn select(quotes: &[Quote], criteria: &Criteria) -> Result<Vec<usize>> {
    if let Some(number) = criteria.number {
        if number > quotes.len() {
            return Err(QuoteError::NumberOutOfRange {
                number,
                count: quotes.len(),
            });
        }
    }

    let selected: Vec<usize> = quotes
        .iter()
        .enumerate()
        .filter(|(index, quote)| criteria.matches(*index, quote))
        .map(|(index, _)| index)
        .collect();

    if let Some(ref hash) = criteria.hash {
        if selected.len() > 1 {
            return Err(QuoteError::HashCollision { hash: hash.clone() });
        }
    }

    Ok(selected)
}

/// Pick one matching quote uniformly at random
///
/// Not reproducible; each call draws from a freshly seeded generator.
pub fn select_random(quotes: &[Quote], criteria: &Criteria) -> Result<Option<usize>> {
    let selected = select(quotes, criteria)?;
    Ok(selected.choose(&mut rand::rng()).copied())
}

/// Select exactly one quote by number or fingerprint
///
/// Exactly one of `number` and `hash` must be given.
pub fn select_one(quotes: &[Quote], number: Option<usize>, hash: Option<&str>) -> Result<usize> {
    let criteria = match (number, hash) {
        (Some(n), None) => Criteria::default().with_number(n),
        (None, Some(h)) => Criteria::default().with_hash(h),
        (None, None) => {
            return Err(QuoteError::Validation(
                "either the -n or the -s argument must be included.".to_string(),
            ))
        }
        (Some(_), Some(_)) => {
            return Err(QuoteError::Validation(
                "both the -s and -n option were included, but only one allowed.".to_string(),
            ))
        }
    };

    select(quotes, &criteria)?
        .first()
        .copied()
        .ok_or_else(|| match (number, hash) {
            (_, Some(h)) => QuoteError::NoSelection(format!("hash '{}'", h)),
            (Some(n), _) => QuoteError::NoSelection(format!("number {}", n)),
            (None, None) => QuoteError::NoSelection("the selection".to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::parse_tags;

    fn quote(text: &str, author: &str, publication: Option<&str>, tags: &str) -> Quote {
        Quote::new(text, author, publication, parse_tags(tags).unwrap()).unwrap()
    }

    fn sample() -> Vec<Quote> {
        vec![
            quote("Well done is better than well said.", "Ben Franklin", None, "franklin"),
            quote(
                "I'm sick of following my dreams.",
                "Mitch Hedberg",
                Some("Strategic Grill Locations"),
                "funny, hedberg",
            ),
            quote("Tagged three ways.", "Anon", None, "a, b, c"),
            quote("Untagged.", "Anon", None, ""),
        ]
    }

    #[test]
    fn test_select_all() {
        let quotes = sample();
        assert_eq!(select(&quotes, &Criteria::default()).unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_tags_and_semantics() {
        let quotes = sample();

        let ab = Criteria::default().with_tags(parse_tags("a,b").unwrap());
        assert_eq!(select(&quotes, &ab).unwrap(), vec![2]);

        let ad = Criteria::default().with_tags(parse_tags("a,d").unwrap());
        assert!(select(&quotes, &ad).unwrap().is_empty());
    }

    #[test]
    fn test_keyword() {
        let quotes = sample();

        let by_author = Criteria::default().with_keyword("Hedberg");
        assert_eq!(select(&quotes, &by_author).unwrap(), vec![1]);

        let by_publication = Criteria::default().with_keyword("Grill");
        assert_eq!(select(&quotes, &by_publication).unwrap(), vec![1]);

        let by_tag = Criteria::default().with_keyword("franklin");
        assert_eq!(select(&quotes, &by_tag).unwrap(), vec![0]);

        let by_text = Criteria::default().with_keyword("well");
        assert_eq!(select(&quotes, &by_text).unwrap(), vec![0]);

        let case = Criteria::default().with_keyword("WELL");
        assert!(select(&quotes, &case).unwrap().is_empty());
    }

    #[test]
    fn test_number() {
        let quotes = sample();

        let second = Criteria::default().with_number(2);
        assert_eq!(select(&quotes, &second).unwrap(), vec![1]);

        let last = Criteria::default().with_number(4);
        assert_eq!(select(&quotes, &last).unwrap(), vec![3]);
    }

    #[test]
    fn test_number_out_of_range() {
        let quotes = sample();
        let err = select(&quotes, &Criteria::default().with_number(5)).unwrap_err();

        assert!(matches!(err, QuoteError::NumberOutOfRange { number: 5, count: 4 }));
        assert_eq!(
            err.to_string(),
            "the number argument 5 is too large, there are only 4 quotes in the file."
        );
    }

    #[test]
    fn test_hash() {
        let quotes = sample();
        let hash = quotes[2].fingerprint();

        let criteria = Criteria::default().with_hash(hash);
        assert_eq!(select(&quotes, &criteria).unwrap(), vec![2]);

        let unknown = Criteria::default().with_hash("0000000000000000");
        assert!(select(&quotes, &unknown).unwrap().is_empty());
    }

    #[test]
    fn test_hash_collision_is_an_error() {
        // Same text twice gives the same fingerprint
        let quotes = vec![
            quote("Same.", "One", None, ""),
            quote("Same.", "Two", None, ""),
        ];
        let hash = quotes[0].fingerprint();

        let err = select(&quotes, &Criteria::default().with_hash(hash.clone())).unwrap_err();
        assert!(matches!(err, QuoteError::HashCollision { .. }));
        assert!(err.to_string().contains(&hash));
    }

    #[test]
    fn test_combined_criteria() {
        let quotes = sample();
        let criteria = Criteria::default()
            .with_tags(vec!["funny".to_string()])
            .with_keyword("dreams")
            .with_number(2);
        assert_eq!(select(&quotes, &criteria).unwrap(), vec![1]);

        let mismatch = criteria.with_number(1);
        assert!(select(&quotes, &mismatch).unwrap().is_empty());
    }

    #[test]
    fn test_select_random() {
        let quotes = sample();

        let funny = Criteria::default().with_tags(vec!["funny".to_string()]);
        for _ in 0..10 {
            assert_eq!(select_random(&quotes, &funny).unwrap(), Some(1));
        }

        let none = Criteria::default().with_keyword("nothing matches this");
        assert_eq!(select_random(&quotes, &none).unwrap(), None);
        assert_eq!(select_random(&[], &Criteria::default()).unwrap(), None);
    }

    #[test]
    fn test_select_random_covers_candidates() {
        let quotes = sample();
        let mut seen = [false; 4];
        for _ in 0..500 {
            let index = select_random(&quotes, &Criteria::default()).unwrap().unwrap();
            seen[index] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_select_one() {
        let quotes = sample();

        assert_eq!(select_one(&quotes, Some(3), None).unwrap(), 2);
        let hash = quotes[1].fingerprint();
        assert_eq!(select_one(&quotes, None, Some(hash.as_str())).unwrap(), 1);

        let err = select_one(&quotes, None, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "either the -n or the -s argument must be included."
        );

        let err = select_one(&quotes, Some(1), Some(hash.as_str())).unwrap_err();
        assert_eq!(
            err.to_string(),
            "both the -s and -n option were included, but only one allowed."
        );

        let err = select_one(&quotes, None, Some("ffffffffffffffff")).unwrap_err();
        assert!(matches!(err, QuoteError::NoSelection(_)));

        let err = select_one(&quotes, Some(0), None).unwrap_err();
        assert!(matches!(err, QuoteError::NoSelection(_)));
    }
}
