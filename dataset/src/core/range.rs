//! Integer list/range notation used by code columns.
//!
//! A list cell holds semicolon-separated elements. Each element is either a
//! single integer or `lower-upper` optionally followed by `+step`:
//!
//! ```text
//! 16261-16299; 16070-16089; 16099; 16362-16398 +2
//! ```
//!
//! Elements expand in declaration order. Nothing is sorted or deduplicated.

use super::{ELEMENT_SEPARATOR, RANGE_SEPARATOR, STEP_PREFIX, trim_cell};
use crate::error::FormatError;

/// One parsed list element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSpec {
    Single(i32),
    /// Inclusive bounds. The last value may fall short of `upper` when
    /// `step` does not divide the span.
    Range { lower: i32, upper: i32, step: i32 },
}

impl RangeSpec {
    /// Parse a single list element (no semicolons).
    pub fn parse(element: &str) -> Result<Self, FormatError> {
        let element = trim_cell(element);
        // Skip the first character so that a leading sign is not taken as a range.
        let separator = element
            .char_indices()
            .skip(1)
            .find(|(_, ch)| *ch == RANGE_SEPARATOR)
            .map(|(index, _)| index);
        let Some(separator) = separator else {
            return Ok(RangeSpec::Single(parse_int(element)?));
        };

        let lower = parse_int(&element[..separator])?;
        let rest = &element[separator + RANGE_SEPARATOR.len_utf8()..];
        let (upper, step) = match rest.find(STEP_PREFIX) {
            Some(plus) => (
                parse_int(&rest[..plus])?,
                parse_int(&rest[plus + STEP_PREFIX.len_utf8()..])?,
            ),
            None => (parse_int(rest)?, 1),
        };

        if step < 1 {
            return Err(FormatError::new(format!(
                "range step must be >= 1 in {element:?}"
            )));
        }
        if lower > upper {
            return Err(FormatError::new(format!(
                "range lower bound exceeds upper bound in {element:?}"
            )));
        }
        Ok(RangeSpec::Range { lower, upper, step })
    }

    /// Iterate the integers this element denotes, ascending.
    pub fn values(self) -> impl Iterator<Item = i32> {
        let (lower, upper, step) = match self {
            RangeSpec::Single(value) => (value, value, 1),
            RangeSpec::Range { lower, upper, step } => (lower, upper, step),
        };
        // Widen to avoid overflow when stepping past i32::MAX.
        (i64::from(lower)..=i64::from(upper))
            .step_by(step as usize)
            .map(|value| value as i32)
    }
}

/// Expand a list cell into the ordered sequence of integers it denotes.
///
/// Empty elements (trailing or doubled semicolons) are ignored.
pub fn expand(cell: &str) -> Result<Vec<i32>, FormatError> {
    let mut codes = Vec::new();
    for element in cell.split(ELEMENT_SEPARATOR) {
        if trim_cell(element).is_empty() {
            continue;
        }
        codes.extend(RangeSpec::parse(element)?.values());
    }
    Ok(codes)
}

fn parse_int(text: &str) -> Result<i32, FormatError> {
    let text = trim_cell(text);
    text.parse::<i32>()
        .map_err(|err| FormatError::new(format!("invalid integer {text:?}: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_stepped_range() {
        let codes = expand("16362-16398 +2").expect("expand");
        assert_eq!(codes.len(), 19);
        assert_eq!(codes.first(), Some(&16362));
        assert_eq!(codes.last(), Some(&16398));
        assert!(codes.windows(2).all(|pair| pair[1] - pair[0] == 2));
    }

    #[test]
    fn concatenates_elements_in_declaration_order() {
        let codes = expand("16261-16299; 16070-16089; 16099; 16091-16094").expect("expand");
        let mut expected: Vec<i32> = (16261..=16299).collect();
        expected.extend(16070..=16089);
        expected.push(16099);
        expected.extend(16091..=16094);
        assert_eq!(codes, expected);
        assert_eq!(codes.len(), 64);
    }

    #[test]
    fn keeps_duplicates_across_elements() {
        let codes = expand("16001-16003; 16002").expect("expand");
        assert_eq!(codes, vec![16001, 16002, 16003, 16002]);
    }

    #[test]
    fn truncates_partial_trailing_step() {
        let codes = expand("10-15 +2").expect("expand");
        assert_eq!(codes, vec![10, 12, 14]);
    }

    #[test]
    fn single_integer_and_negative_single() {
        assert_eq!(RangeSpec::parse(" 4326 "), Ok(RangeSpec::Single(4326)));
        assert_eq!(RangeSpec::parse("-7"), Ok(RangeSpec::Single(-7)));
    }

    #[test]
    fn parses_range_with_step() {
        assert_eq!(
            RangeSpec::parse("16362-16398 +2"),
            Ok(RangeSpec::Range {
                lower: 16362,
                upper: 16398,
                step: 2
            })
        );
    }

    #[test]
    fn rejects_inverted_bounds_and_bad_step() {
        assert!(RangeSpec::parse("20-10").is_err());
        assert!(RangeSpec::parse("10-20 +0").is_err());
        assert!(RangeSpec::parse("10-20 +x").is_err());
        assert!(RangeSpec::parse("abc").is_err());
    }

    #[test]
    fn ignores_empty_elements() {
        assert_eq!(expand("1;;2; ").expect("expand"), vec![1, 2]);
        assert!(expand("").expect("expand").is_empty());
    }

    #[test]
    fn range_ending_at_i32_max_does_not_overflow() {
        let upper = i32::MAX;
        let lower = upper - 2;
        let codes = expand(&format!("{lower}-{upper}")).expect("expand");
        assert_eq!(codes, vec![lower, lower + 1, upper]);
    }
}
