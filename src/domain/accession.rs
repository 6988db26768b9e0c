//! Accession number shorthand and its expansion.
//!
//! Registrars abbreviate lists of accession numbers in filenames and
//! spreadsheets. A list is a comma-separated sequence of tokens, and each
//! token takes one of three forms:
//!
//! - a single number, written out in full (`JB001`, `LDHRM.2023.1`)
//! - a range, `<prefix><first>-<last>` or `<prefix><first>/<last>`, where the
//!   last number may repeat the prefix (`JB021-024`, `JB021-JB024`) and may be
//!   shorter than the first number (`SH21-4` is `SH21` to `SH24`)
//! - a suffix list, `<head>&<n>&<n>...`, which swaps the trailing number of
//!   the head for each extra number (`JB001&23` is `JB001`, `JB023`)
//!
//! Whitespace anywhere in a token is ignored.
//!
//! ```
//! use accession::domain::accession::expand;
//!
//! let ids = expand("SH21-4, JB001&23").unwrap();
//! let ids: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
//! assert_eq!(ids, ["SH21", "SH22", "SH23", "SH24", "JB001", "JB023"]);
//! ```

use std::{fmt, ops::Deref, sync::LazyLock};

use non_empty_string::NonEmptyString;
use regex::Regex;

/// The default ceiling on the number of IDs a single range token may produce.
pub const DEFAULT_MAX_SPAN: usize = 10_000;

static RANGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^
        (?P<prefix>.+?)          # shortest run before the first number
        (?P<first>[0-9]+)        # first number, width preserved
        [-/]                     # separator
        (?P<second_prefix>.*?)   # optional repeat of the prefix
        (?P<last>[0-9]+)         # last number
        $",
    )
    .expect("range pattern is valid")
});

static TRAILING_NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<prefix>.+?)(?P<number>[0-9]+)$").expect("trailing number pattern is valid")
});

/// A fully written-out accession number.
///
/// Canonical IDs are never empty and contain no range or suffix-list
/// notation produced by expansion.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalId(NonEmptyString);

impl CanonicalId {
    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Consumes the ID, returning the underlying string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0.into_inner()
    }
}

impl TryFrom<String> for CanonicalId {
    type Error = EmptyIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        NonEmptyString::new(value)
            .map(Self)
            .map_err(|_| EmptyIdError)
    }
}

impl AsRef<str> for CanonicalId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for CanonicalId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<CanonicalId> for String {
    fn from(id: CanonicalId) -> Self {
        id.0.into_inner()
    }
}

/// Error returned when constructing a [`CanonicalId`] from an empty string.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("accession number cannot be empty")]
pub struct EmptyIdError;

/// Errors that can occur while expanding an accession number list.
///
/// Every variant names the offending token so that a mistyped number can be
/// located without re-deriving which part of the list failed.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// A comma-separated segment was empty or contained only whitespace.
    #[error("Empty accession number in list '{0}'")]
    EmptyToken(String),

    /// A range token did not have the `<prefix><number><sep><number>` shape.
    #[error("Bad accession number, contains '-' or '/' but not well formed: '{0}'")]
    MalformedRange(String),

    /// The two endpoints of a range carried different prefixes.
    #[error("'{token}': first prefix '{first}' and second prefix '{second}' must match")]
    PrefixMismatch {
        /// The range token.
        token: String,
        /// Prefix of the first endpoint.
        first: String,
        /// Prefix of the second endpoint.
        second: String,
    },

    /// The first number of a range was not strictly less than the last.
    #[error("'{0}': first number must be less than last number")]
    NonIncreasingRange(String),

    /// A token mixed range and suffix-list notation.
    #[error("Bad accession number list: cannot contain both '-' or '/' and '&': '{0}'")]
    MixedNotation(String),

    /// The head of a suffix list did not end in a number.
    #[error("'{0}': the first accession number of a '&' list must end in a number")]
    MissingTrailingNumber(String),

    /// A suffix-list extension was not made of digits only.
    #[error("Extension numbers must be numeric: '{suffix}' in '{token}'")]
    NonNumericSuffix {
        /// The suffix-list token.
        token: String,
        /// The offending extension.
        suffix: String,
    },

    /// A range token denoted more IDs than the expander allows.
    #[error("'{token}' denotes {count} accession numbers, more than the limit of {limit}")]
    RangeTooLarge {
        /// The range token.
        token: String,
        /// Number of IDs the range denotes.
        count: u64,
        /// The configured ceiling.
        limit: usize,
    },
}

/// A range token broken into its parts.
///
/// For `JB121-24` the prefix is `JB1` (the leading `1` of `121` is fixed
/// because `24` is one digit shorter), the variable part runs from 21 to 24
/// and every generated number is padded to a width of 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRange {
    prefix: NonEmptyString,
    start: u64,
    end: u64,
    width: usize,
}

impl ParsedRange {
    /// Parses a whitespace-free range token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token mixes notations, does not have the range
    /// shape, has mismatched prefixes, or does not increase.
    pub fn parse(token: &str) -> Result<Self, Error> {
        if token.contains('&') {
            return Err(Error::MixedNotation(token.to_string()));
        }

        let captures = RANGE_PATTERN
            .captures(token)
            .ok_or_else(|| Error::MalformedRange(token.to_string()))?;
        let prefix = &captures["prefix"];
        let first = &captures["first"];
        let second_prefix = &captures["second_prefix"];
        let last = &captures["last"];

        if !second_prefix.is_empty() && second_prefix != prefix {
            return Err(Error::PrefixMismatch {
                token: token.to_string(),
                first: prefix.to_string(),
                second: second_prefix.to_string(),
            });
        }

        // When the last number is shorter, the leading digits of the first
        // number belong to the prefix: SH21-4 is SH2 + 1..4.
        let fixed_width = first.len().saturating_sub(last.len());
        let (fixed, variable) = first.split_at(fixed_width);

        let start = parse_number(variable, token)?;
        let end = parse_number(last, token)?;
        if start >= end {
            return Err(Error::NonIncreasingRange(token.to_string()));
        }

        let prefix = NonEmptyString::new(format!("{prefix}{fixed}"))
            .map_err(|_| Error::MalformedRange(token.to_string()))?;

        Ok(Self {
            prefix,
            start,
            end,
            width: variable.len(),
        })
    }

    /// The literal text shared by every ID in the range.
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.prefix.as_str()
    }

    /// The first value of the variable part.
    #[must_use]
    pub const fn start(&self) -> u64 {
        self.start
    }

    /// The last value of the variable part (inclusive).
    #[must_use]
    pub const fn end(&self) -> u64 {
        self.end
    }

    /// The zero-padded width of the variable part.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// The number of IDs in the range. Always at least two.
    ///
    /// Saturates at `u64::MAX` for a range covering every `u64` value.
    #[must_use]
    pub const fn count(&self) -> u64 {
        (self.end - self.start).saturating_add(1)
    }

    /// Generates the IDs in ascending order.
    ///
    /// Values that need more digits than [`width`](Self::width) are written
    /// at their natural width, so `JB8-12` yields `JB8` .. `JB9`, `JB10` ..
    /// `JB12`.
    pub fn ids(&self) -> impl Iterator<Item = CanonicalId> + '_ {
        (self.start..=self.end).map(move |value| {
            let number = format!("{value:0width$}", width = self.width);
            CanonicalId(self.prefix.clone() + number.as_str())
        })
    }
}

/// A suffix-list token broken into its parts.
///
/// For `LDHRM.2023.1&2&3` the prefix is `LDHRM.2023.` and the suffixes are
/// `1`, `2` and `3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSuffixList {
    prefix: NonEmptyString,
    suffixes: Vec<String>,
}

impl ParsedSuffixList {
    /// Parses a whitespace-free suffix-list token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token also uses range notation, if the head has
    /// no trailing number, or if any extension is not purely numeric.
    pub fn parse(token: &str) -> Result<Self, Error> {
        if token.contains(['-', '/']) {
            return Err(Error::MixedNotation(token.to_string()));
        }

        let mut parts = token.split('&');
        let head = parts.next().unwrap_or_default();
        let captures = TRAILING_NUMBER_PATTERN
            .captures(head)
            .ok_or_else(|| Error::MissingTrailingNumber(token.to_string()))?;

        let mut suffixes = vec![captures["number"].to_string()];
        for tail in parts {
            if tail.is_empty() || !tail.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::NonNumericSuffix {
                    token: token.to_string(),
                    suffix: tail.to_string(),
                });
            }
            suffixes.push(tail.to_string());
        }

        let prefix = NonEmptyString::new(captures["prefix"].to_string())
            .map_err(|_| Error::MissingTrailingNumber(token.to_string()))?;

        Ok(Self { prefix, suffixes })
    }

    /// The head with its trailing number removed.
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.prefix.as_str()
    }

    /// The numeric suffixes, the head's own suffix first.
    #[must_use]
    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// Generates the IDs: the head unchanged, then one per extension.
    ///
    /// Extensions are used verbatim, with no padding to the head's width.
    pub fn ids(&self) -> impl Iterator<Item = CanonicalId> + '_ {
        self.suffixes
            .iter()
            .map(|suffix| CanonicalId(self.prefix.clone() + suffix.as_str()))
    }
}

/// One comma-separated segment of an accession number list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A number written out in full.
    Single(CanonicalId),
    /// A contiguous numeric range.
    Range(ParsedRange),
    /// A head number plus sibling extensions.
    SuffixList(ParsedSuffixList),
}

impl Token {
    /// Parses one segment. All whitespace is removed before parsing.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment is empty or violates the grammar of
    /// its form.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let token: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

        if token.contains(['-', '/']) {
            ParsedRange::parse(&token).map(Self::Range)
        } else if token.contains('&') {
            ParsedSuffixList::parse(&token).map(Self::SuffixList)
        } else {
            CanonicalId::try_from(token)
                .map(Self::Single)
                .map_err(|EmptyIdError| Error::EmptyToken(raw.to_string()))
        }
    }

    /// Generates the IDs this token denotes, in order.
    pub fn ids(&self) -> Box<dyn Iterator<Item = CanonicalId> + '_> {
        match self {
            Self::Single(id) => Box::new(std::iter::once(id.clone())),
            Self::Range(range) => Box::new(range.ids()),
            Self::SuffixList(list) => Box::new(list.ids()),
        }
    }
}

/// Expands accession number lists, bounding the size of any one range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expander {
    max_span: usize,
}

impl Default for Expander {
    fn default() -> Self {
        Self::with_max_span(DEFAULT_MAX_SPAN)
    }
}

impl Expander {
    /// Creates an expander that rejects ranges denoting more than `max_span`
    /// IDs.
    #[must_use]
    pub const fn with_max_span(max_span: usize) -> Self {
        Self { max_span }
    }

    /// The largest number of IDs a single range may produce.
    #[must_use]
    pub const fn max_span(&self) -> usize {
        self.max_span
    }

    /// Expands a comma-separated list into canonical IDs.
    ///
    /// Output follows token order, then ascending order within a range, then
    /// written order within a suffix list. Nothing is sorted or deduplicated.
    ///
    /// # Errors
    ///
    /// Returns the first grammar violation found. No partial output is
    /// returned.
    pub fn expand(&self, list: &str) -> Result<Vec<CanonicalId>, Error> {
        let mut ids = Vec::new();
        for raw in list.split(',') {
            let token = self.parse_token(raw)?;
            ids.extend(token.ids());
        }
        Ok(ids)
    }

    /// Parses one segment, checking ranges against the ceiling.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment is invalid or is a range denoting too
    /// many IDs.
    pub fn parse_token(&self, raw: &str) -> Result<Token, Error> {
        let token = Token::parse(raw)?;
        if let Token::Range(range) = &token {
            let count = range.count();
            if count > self.max_span as u64 {
                return Err(Error::RangeTooLarge {
                    token: raw.trim().to_string(),
                    count,
                    limit: self.max_span,
                });
            }
        }
        Ok(token)
    }
}

/// Expands a comma-separated accession number list with the default
/// [`Expander`].
///
/// # Errors
///
/// Returns an error if any token violates the grammar.
pub fn expand(list: &str) -> Result<Vec<CanonicalId>, Error> {
    Expander::default().expand(list)
}

fn parse_number(digits: &str, token: &str) -> Result<u64, Error> {
    digits
        .parse()
        .map_err(|_| Error::MalformedRange(token.to_string()))
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn expand_strs(list: &str) -> Vec<String> {
        expand(list)
            .unwrap()
            .into_iter()
            .map(CanonicalId::into_string)
            .collect()
    }

    #[test_case("JB121-24", &["JB121", "JB122", "JB123", "JB124"]; "fixed leading digit")]
    #[test_case("SH21-4", &["SH21", "SH22", "SH23", "SH24"]; "shorter last number")]
    #[test_case("JB001&23", &["JB001", "JB023"]; "suffix list verbatim tail")]
    #[test_case("LDHRM.2023.1&2&3", &["LDHRM.2023.1", "LDHRM.2023.2", "LDHRM.2023.3"]; "dotted suffix list")]
    #[test_case("A,B021-023", &["A", "B021", "B022", "B023"]; "single then range")]
    #[test_case("JB021-JB023", &["JB021", "JB022", "JB023"]; "repeated prefix")]
    #[test_case("JB021/023", &["JB021", "JB022", "JB023"]; "slash separator")]
    #[test_case("LDHRM.2024.9-11", &["LDHRM.2024.9", "LDHRM.2024.10", "LDHRM.2024.11"]; "dotted range")]
    #[test_case("JB8-12", &["JB8", "JB9", "JB10", "JB11", "JB12"]; "overflow keeps natural width")]
    #[test_case("JB1&23", &["JB1", "JB23"]; "tail wider than head")]
    #[test_case("JB001", &["JB001"]; "single")]
    fn expands(list: &str, expected: &[&str]) {
        assert_eq!(expand_strs(list), expected);
    }

    #[test]
    fn whitespace_is_ignored_anywhere_in_a_token() {
        assert_eq!(expand_strs("JB 021 - 024"), expand_strs("JB021-024"));
        assert_eq!(expand_strs(" JB 001 & 2 , A B"), ["JB001", "JB002", "AB"]);
    }

    #[test]
    fn comma_lists_concatenate_in_order() {
        let left = expand_strs("SH21-4");
        let right = expand_strs("JB001&23");
        let mut expected = left;
        expected.extend(right);
        assert_eq!(expand_strs("SH21-4,JB001&23"), expected);
    }

    #[test]
    fn no_sorting_or_deduplication() {
        assert_eq!(expand_strs("B2,A1,B2"), ["B2", "A1", "B2"]);
    }

    #[test_case("JB", 3, 7, 3)]
    #[test_case("SH", 0, 9, 1)]
    #[test_case("LDHRM.2023.", 98, 102, 3)]
    fn range_entries_are_padded_and_ascending(prefix: &str, start: u64, end: u64, width: usize) {
        let token = format!("{prefix}{start:0width$}-{end:0width$}");
        let ids = expand_strs(&token);
        assert_eq!(ids.len() as u64, end - start + 1);
        for (i, id) in ids.iter().enumerate() {
            let value = start + i as u64;
            assert_eq!(id, &format!("{prefix}{value:0width$}"));
        }
    }

    #[test]
    fn canonical_ids_expand_to_themselves() {
        for id in ["JB001", "LDHRM.2023.1", "X", "2019.4.7a"] {
            assert_eq!(expand_strs(id), [id]);
        }
    }

    #[test]
    fn parsed_range_exposes_its_parts() {
        let range = ParsedRange::parse("JB121-24").unwrap();
        assert_eq!(range.prefix(), "JB1");
        assert_eq!(range.start(), 21);
        assert_eq!(range.end(), 24);
        assert_eq!(range.width(), 2);
        assert_eq!(range.count(), 4);

        let range = ParsedRange::parse("SH21-4").unwrap();
        assert_eq!(range.prefix(), "SH2");
        assert_eq!(range.start(), 1);
        assert_eq!(range.width(), 1);
    }

    #[test]
    fn parsed_suffix_list_exposes_its_parts() {
        let list = ParsedSuffixList::parse("LDHRM.2023.1&2&3").unwrap();
        assert_eq!(list.prefix(), "LDHRM.2023.");
        assert_eq!(list.suffixes(), ["1", "2", "3"]);
    }

    #[test]
    fn non_increasing_range_fails() {
        assert_eq!(
            expand("JB50-10"),
            Err(Error::NonIncreasingRange("JB50-10".to_string()))
        );
        assert!(matches!(
            expand("JB5-5"),
            Err(Error::NonIncreasingRange(_))
        ));
    }

    #[test]
    fn mixed_notation_fails() {
        assert_eq!(
            expand("JB1-5&6"),
            Err(Error::MixedNotation("JB1-5&6".to_string()))
        );
        assert!(matches!(
            expand("JB1&5/6"),
            Err(Error::MixedNotation(_))
        ));
    }

    #[test]
    fn mismatched_prefixes_fail() {
        assert_eq!(
            expand("JB021-SH024"),
            Err(Error::PrefixMismatch {
                token: "JB021-SH024".to_string(),
                first: "JB".to_string(),
                second: "SH".to_string(),
            })
        );
    }

    #[test_case("JB-24"; "no first number")]
    #[test_case("JB021-"; "no last number")]
    #[test_case("021-JB"; "trailing letters")]
    #[test_case("-5"; "no prefix")]
    fn malformed_ranges_fail(token: &str) {
        assert!(matches!(expand(token), Err(Error::MalformedRange(_))));
    }

    #[test]
    fn overflowing_numbers_are_malformed() {
        assert!(matches!(
            expand("JB1-99999999999999999999999"),
            Err(Error::MalformedRange(_))
        ));
    }

    #[test]
    fn suffix_list_head_needs_trailing_number() {
        assert_eq!(
            expand("JB&2"),
            Err(Error::MissingTrailingNumber("JB&2".to_string()))
        );
        assert!(matches!(
            expand("&2"),
            Err(Error::MissingTrailingNumber(_))
        ));
    }

    #[test_case("JB001&2a"; "letters")]
    #[test_case("JB001&"; "empty tail")]
    #[test_case("JB001&2&&3"; "empty middle tail")]
    fn suffix_list_tails_must_be_numeric(token: &str) {
        assert!(matches!(
            expand(token),
            Err(Error::NonNumericSuffix { .. })
        ));
    }

    #[test]
    fn empty_tokens_are_rejected() {
        assert_eq!(
            expand("JB1,"),
            Err(Error::EmptyToken(String::new()))
        );
        assert!(matches!(expand(""), Err(Error::EmptyToken(_))));
        assert!(matches!(expand("A, ,B"), Err(Error::EmptyToken(_))));
    }

    #[test]
    fn range_ceiling_is_enforced() {
        let expander = Expander::with_max_span(10);
        assert_eq!(expander.expand("A1-10").unwrap().len(), 10);
        assert_eq!(
            expander.expand("A1-11"),
            Err(Error::RangeTooLarge {
                token: "A1-11".to_string(),
                count: 11,
                limit: 10,
            })
        );

        assert!(matches!(
            expand("A1-999999999"),
            Err(Error::RangeTooLarge { .. })
        ));
    }

    #[test]
    fn full_width_range_hits_the_ceiling() {
        assert_eq!(
            expand("A0-18446744073709551615"),
            Err(Error::RangeTooLarge {
                token: "A0-18446744073709551615".to_string(),
                count: u64::MAX,
                limit: DEFAULT_MAX_SPAN,
            })
        );
        assert_eq!(ParsedRange::parse("A0-18446744073709551615").unwrap().count(), u64::MAX);
    }

    #[test]
    fn ceiling_applies_to_ranges_only() {
        let expander = Expander::with_max_span(1);
        assert_eq!(expander.expand("JB001").unwrap().len(), 1);
        assert_eq!(expander.expand("JB001&2&3").unwrap().len(), 3);
        assert!(matches!(
            expander.expand("JB1-2"),
            Err(Error::RangeTooLarge { count: 2, limit: 1, .. })
        ));

        let expander = Expander::with_max_span(0);
        assert_eq!(expander.expand("JB001,JB002").unwrap().len(), 2);
    }

    #[test]
    fn first_failure_aborts_the_whole_list() {
        assert!(expand("JB001,JB50-10,JB002").is_err());
    }

    #[test]
    fn error_messages_name_the_token() {
        let error = expand("JB001&2a").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Extension numbers must be numeric: '2a' in 'JB001&2a'"
        );

        let error = expand("JB50-10").unwrap_err();
        assert_eq!(
            error.to_string(),
            "'JB50-10': first number must be less than last number"
        );
    }

    #[test]
    fn empty_canonical_id_is_rejected() {
        assert_eq!(CanonicalId::try_from(String::new()), Err(EmptyIdError));
    }
}
