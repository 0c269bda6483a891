//! Checks used by test bodies. Each returns an assertion failure whose
//! message names the checked property, so `?` is enough inside a body.

use std::fmt::Debug;

use crate::outcome::TestFailure;

pub fn assert_equals<T>(label: &str, expected: &T, actual: &T) -> Result<(), TestFailure>
where
    T: PartialEq + Debug + ?Sized,
{
    if expected == actual {
        return Ok(());
    }
    Err(TestFailure::assertion(format!(
        "{label}: expected {expected:?}, found {actual:?}"
    )))
}

/// Compare two floating-point values within an absolute tolerance.
pub fn assert_close(
    label: &str,
    expected: f64,
    actual: f64,
    tolerance: f64,
) -> Result<(), TestFailure> {
    let both_nan = expected.is_nan() && actual.is_nan();
    if both_nan || (expected - actual).abs() <= tolerance {
        return Ok(());
    }
    Err(TestFailure::assertion(format!(
        "{label}: expected {expected} ± {tolerance}, found {actual}"
    )))
}

/// Object name must equal the expected one exactly.
pub fn assert_name(label: &str, expected: &str, actual: Option<&str>) -> Result<(), TestFailure> {
    match actual {
        Some(name) if name == expected => Ok(()),
        Some(name) => Err(TestFailure::assertion(format!(
            "{label}: expected name {expected:?}, found {name:?}"
        ))),
        None => Err(TestFailure::assertion(format!(
            "{label}: expected name {expected:?}, found none"
        ))),
    }
}

pub fn assert_contains_alias<S: AsRef<str>>(
    label: &str,
    expected: &str,
    aliases: &[S],
) -> Result<(), TestFailure> {
    if aliases.iter().any(|alias| alias.as_ref() == expected) {
        return Ok(());
    }
    let found: Vec<&str> = aliases.iter().map(AsRef::as_ref).collect();
    Err(TestFailure::assertion(format!(
        "{label}: alias {expected:?} not found in {found:?}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<(), TestFailure>) -> String {
        match result {
            Err(TestFailure::Assertion(message)) => message,
            other => panic!("expected assertion failure, got {other:?}"),
        }
    }

    #[test]
    fn equals_reports_both_values() {
        assert!(assert_equals("code", &7030, &7030).is_ok());
        assert_eq!(
            message(assert_equals("code", &7030, &7043)),
            "code: expected 7030, found 7043"
        );
        assert!(assert_equals("name", "WGS 84", "WGS 84").is_ok());
    }

    #[test]
    fn close_uses_absolute_tolerance() {
        assert!(assert_close("semi-major axis", 6378137.0, 6378137.0004, 0.001).is_ok());
        assert!(assert_close("inverse flattening", f64::NAN, f64::NAN, 0.0).is_ok());
        let text = message(assert_close("semi-major axis", 6378137.0, 6378136.0, 0.001));
        assert!(text.starts_with("semi-major axis: expected 6378137"));
    }

    #[test]
    fn name_and_alias_checks() {
        assert!(assert_name("ellipsoid 7030", "WGS 84", Some("WGS 84")).is_ok());
        assert_eq!(
            message(assert_name("ellipsoid 7030", "WGS 84", None)),
            "ellipsoid 7030: expected name \"WGS 84\", found none"
        );

        let aliases = vec!["WGS84".to_string()];
        assert!(assert_contains_alias("ellipsoid 7030", "WGS84", &aliases).is_ok());
        let text = message(assert_contains_alias("ellipsoid 7030", "WGS 1984", &aliases));
        assert!(text.contains("\"WGS 1984\" not found"));
    }
}
