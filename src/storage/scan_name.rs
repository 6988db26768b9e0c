//! Filename grammars for scanned images
//!
//! Scans are named after the accession numbers they show, with a trailing
//! marker for the part of the object in the file. Two conventions are in
//! use:
//!
//! 1. **Halves** (stitching): a trailing `A` or `B` marks the two halves of an
//!    object scanned in two passes.
//!    - Example: `LDHRM.2023.1A.jpg` + `LDHRM.2023.1B.jpg` → `LDHRM.2023.1.jpg`
//!
//! 2. **Flagged parts** (splitting): a flag character and a digit mark the
//!    part, and the name before it is an accession list denoting exactly two
//!    objects drawn on one sheet.
//!    - Example: `JB001&2#1.jpg` → `JB001#1.jpg` and `JB002#1.jpg`
//!
//! All functions here take the file stem, with the extension already removed.

use regex::Regex;

use crate::domain::{Expander, ExpandError};

/// Which half of a two-pass scan a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Half {
    /// The first half.
    A,
    /// The second half.
    B,
}

/// A parsed halves-convention filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StitchName {
    /// The stem without the half marker; names the stitched output.
    pub base: String,
    /// The half this file holds.
    pub half: Half,
}

/// A parsed flagged-part filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitName {
    /// The output stems, one per object, each ending with the part marker.
    pub targets: [String; 2],
    /// The part marker, e.g. `#1`.
    pub marker: String,
}

/// Parses halves-convention stems.
///
/// Stems beginning with the MDA code must look like
/// `<MDA>.<year>.<n>[.<m>]` followed by the half; any other stem must be a
/// non-numeric prefix, a number and an optional `.<m>` before the half.
#[derive(Debug, Clone)]
pub struct StitchGrammar {
    mda_code: String,
    with_mda: Regex,
    without_mda: Regex,
}

impl StitchGrammar {
    /// Builds the grammar for the given MDA code. The code is matched
    /// literally.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting pattern cannot be compiled.
    pub fn new(mda_code: &str) -> Result<Self, regex::Error> {
        let escaped = regex::escape(mda_code);
        let with_mda = Regex::new(&format!(
            r"^(?P<base>{escaped}\.[0-9]+\.[0-9]+(?:\.[0-9]+)?)(?P<half>[AB])$"
        ))?;
        let without_mda = Regex::new(r"^(?P<base>[^0-9]+[0-9]+(?:\.[0-9]+)?)(?P<half>[AB])$")?;

        Ok(Self {
            mda_code: mda_code.to_string(),
            with_mda,
            without_mda,
        })
    }

    /// Parses a stem into its base and half.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Unrecognised`] if the stem does not follow the
    /// convention.
    pub fn parse(&self, stem: &str) -> Result<StitchName, ParseError> {
        let pattern = if !self.mda_code.is_empty() && stem.starts_with(&self.mda_code) {
            &self.with_mda
        } else {
            &self.without_mda
        };

        let captures = pattern
            .captures(stem)
            .ok_or_else(|| ParseError::Unrecognised(stem.to_string()))?;
        let half = match &captures["half"] {
            "A" => Half::A,
            _ => Half::B,
        };

        Ok(StitchName {
            base: captures["base"].to_string(),
            half,
        })
    }
}

/// Parses flagged-part stems.
#[derive(Debug, Clone)]
pub struct SplitGrammar {
    flag_char: char,
    pattern: Regex,
    expander: Expander,
}

impl SplitGrammar {
    /// Builds the grammar for the given flag character.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting pattern cannot be compiled.
    pub fn new(flag_char: char, expander: Expander) -> Result<Self, regex::Error> {
        let flag = regex::escape(flag_char.encode_utf8(&mut [0; 4]));
        let pattern = Regex::new(&format!(r"^(?P<names>.*)(?P<marker>{flag}[0-9])$"))?;
        Ok(Self {
            flag_char,
            pattern,
            expander,
        })
    }

    /// Returns the flag character.
    #[must_use]
    pub const fn flag_char(&self) -> char {
        self.flag_char
    }

    /// Parses a stem into the two output stems it names.
    ///
    /// # Errors
    ///
    /// Returns an error if the stem has no part marker, if the accession list
    /// before it cannot be expanded, or if it does not denote exactly two
    /// objects.
    pub fn parse(&self, stem: &str) -> Result<SplitName, ParseError> {
        let captures = self
            .pattern
            .captures(stem)
            .ok_or_else(|| ParseError::MissingPartMarker {
                stem: stem.to_string(),
                flag: self.flag_char,
            })?;
        let marker = &captures["marker"];

        let ids = self
            .expander
            .expand(&captures["names"])
            .map_err(|source| ParseError::Expansion {
                stem: stem.to_string(),
                source,
            })?;

        let [first, second] = <[_; 2]>::try_from(ids).map_err(|ids: Vec<_>| {
            ParseError::WrongCount {
                stem: stem.to_string(),
                found: ids.len(),
            }
        })?;

        Ok(SplitName {
            targets: [format!("{first}{marker}"), format!("{second}{marker}")],
            marker: marker.to_string(),
        })
    }
}

/// Errors that can occur while parsing a scan filename
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    /// The stem does not follow the halves convention.
    #[error("'{0}' is not an accession number followed by A or B")]
    Unrecognised(String),

    /// The stem does not end with the flag character and a digit.
    #[error("'{stem}' does not end with a '{flag}<digit>' part marker")]
    MissingPartMarker {
        /// The stem.
        stem: String,
        /// The expected flag character.
        flag: char,
    },

    /// The accession list before the marker is invalid.
    #[error("'{stem}': {source}")]
    Expansion {
        /// The stem.
        stem: String,
        /// Why expansion failed.
        source: ExpandError,
    },

    /// The accession list does not denote exactly two objects.
    #[error("'{stem}' names {found} accession numbers, expected 2")]
    WrongCount {
        /// The stem.
        stem: String,
        /// How many accession numbers it names.
        found: usize,
    },
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn stitch() -> StitchGrammar {
        StitchGrammar::new("LDHRM").unwrap()
    }

    fn split(flag: char) -> SplitGrammar {
        SplitGrammar::new(flag, Expander::default()).unwrap()
    }

    #[test_case("LDHRM.2023.1A", "LDHRM.2023.1", Half::A; "mda code")]
    #[test_case("LDHRM.2023.1.4B", "LDHRM.2023.1.4", Half::B; "mda code with sub number")]
    #[test_case("JB001A", "JB001", Half::A; "plain")]
    #[test_case("SH21.3B", "SH21.3", Half::B; "plain with sub number")]
    #[test_case("Spodnoodle 12A", "Spodnoodle 12", Half::A; "spaces in prefix")]
    fn stitch_names_parse(stem: &str, base: &str, half: Half) {
        let name = stitch().parse(stem).unwrap();
        assert_eq!(name.base, base);
        assert_eq!(name.half, half);
    }

    #[test_case("LDHRM.2023A"; "mda code needs two numbers")]
    #[test_case("JB001C"; "wrong half")]
    #[test_case("JB001"; "no half")]
    #[test_case("001A"; "no prefix")]
    #[test_case("JB001aA"; "letters after number")]
    fn stitch_names_reject(stem: &str) {
        assert_eq!(
            stitch().parse(stem),
            Err(ParseError::Unrecognised(stem.to_string()))
        );
    }

    #[test]
    fn mda_code_is_matched_literally() {
        let grammar = StitchGrammar::new("M(1").unwrap();
        assert_eq!(grammar.parse("M(1.2020.3A").unwrap().base, "M(1.2020.3");
        assert!(grammar.parse("M(1.2020A").is_err());
    }

    #[test_case('#', "JB001&2#1", ["JB001#1", "JB002#1"]; "suffix list")]
    #[test_case('#', "JB001-002#2", ["JB001#2", "JB002#2"]; "range")]
    #[test_case('=', "A1,B7=1", ["A1=1", "B7=1"]; "comma list")]
    #[test_case('%', "LDHRM.2023.1&2%3", ["LDHRM.2023.1%3", "LDHRM.2023.2%3"]; "dotted")]
    fn split_names_parse(flag: char, stem: &str, targets: [&str; 2]) {
        let name = split(flag).parse(stem).unwrap();
        assert_eq!(name.targets, targets.map(String::from));
    }

    #[test]
    fn split_marker_is_kept() {
        let name = split('#').parse("JB001&2#1").unwrap();
        assert_eq!(name.marker, "#1");
    }

    #[test]
    fn split_without_marker_fails() {
        assert_eq!(
            split('#').parse("JB001&2"),
            Err(ParseError::MissingPartMarker {
                stem: "JB001&2".to_string(),
                flag: '#',
            })
        );
    }

    #[test]
    fn split_marker_needs_single_digit() {
        let result = split('#').parse("JB001&2#12");
        assert!(matches!(result, Err(ParseError::MissingPartMarker { .. })));
    }

    #[test]
    fn split_flag_is_matched_literally() {
        let grammar = split('.');
        assert!(matches!(
            grammar.parse("JB001&2x1"),
            Err(ParseError::MissingPartMarker { .. })
        ));
        assert_eq!(
            grammar.parse("JB001&2.1").unwrap().targets,
            ["JB001.1", "JB002.1"].map(String::from)
        );
    }

    #[test]
    fn split_invalid_list_fails() {
        let result = split('#').parse("JB5-1#1");
        assert!(matches!(
            result,
            Err(ParseError::Expansion {
                source: ExpandError::NonIncreasingRange(_),
                ..
            })
        ));
    }

    #[test_case("JB001#1", 1; "one")]
    #[test_case("JB001-003#1", 3; "three")]
    fn split_needs_exactly_two(stem: &str, found: usize) {
        assert_eq!(
            split('#').parse(stem),
            Err(ParseError::WrongCount {
                stem: stem.to_string(),
                found,
            })
        );
    }
}
