//! Candidate validation
//!
//! Pure rules over the three raw form fields. Every field is checked and
//! all failures are reported together, at most one per field.

use std::fmt;

use chrono::NaiveDate;

use crate::consts::{NAME_MIN_CHARS, TANK_SIZE_MAX};
use crate::record::Candidate;

/// Form field an issue belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    TankSize,
    LastWaterChange,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::TankSize, Field::LastWaterChange];

    /// DOM id of the input bound to this field
    pub fn input_id(&self) -> &'static str {
        match self {
            Field::Name => "fishName",
            Field::TankSize => "tankSize",
            Field::LastWaterChange => "waterChangeDate",
        }
    }
}

/// A single violated rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationIssue {
    NameRequired,
    NameTooShort,
    TankSizeRequired,
    TankSizeNotPositive,
    TankSizeUnrealistic,
    DateRequired,
    DateInvalid,
    DateInFuture,
}

impl ValidationIssue {
    pub fn field(&self) -> Field {
        match self {
            ValidationIssue::NameRequired | ValidationIssue::NameTooShort => Field::Name,
            ValidationIssue::TankSizeRequired
            | ValidationIssue::TankSizeNotPositive
            | ValidationIssue::TankSizeUnrealistic => Field::TankSize,
            ValidationIssue::DateRequired
            | ValidationIssue::DateInvalid
            | ValidationIssue::DateInFuture => Field::LastWaterChange,
        }
    }

    /// Short stable message
    pub fn message(&self) -> &'static str {
        match self {
            ValidationIssue::NameRequired => "name required",
            ValidationIssue::NameTooShort => "name too short",
            ValidationIssue::TankSizeRequired => "tank size required",
            ValidationIssue::TankSizeNotPositive => "must be positive",
            ValidationIssue::TankSizeUnrealistic => "unrealistic value",
            ValidationIssue::DateRequired => "date required",
            ValidationIssue::DateInvalid => "invalid date",
            ValidationIssue::DateInFuture => "date cannot be in the future",
        }
    }

    /// Sentence shown under the form
    pub fn hint(&self) -> &'static str {
        match self {
            ValidationIssue::NameRequired => "Please enter a fish name.",
            ValidationIssue::NameTooShort => "Fish name must be at least 2 characters long.",
            ValidationIssue::TankSizeRequired => "Please enter a tank size.",
            ValidationIssue::TankSizeNotPositive => "Tank size must be greater than 0 liters.",
            ValidationIssue::TankSizeUnrealistic => {
                "Tank size seems too large. Please enter a realistic value."
            }
            ValidationIssue::DateRequired => "Please select a water change date.",
            ValidationIssue::DateInvalid => "Please enter the date as YYYY-MM-DD.",
            ValidationIssue::DateInFuture => "Water change date cannot be in the future.",
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Ordered, non-empty list of violated rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    issues: Vec<ValidationIssue>,
}

impl ValidationErrors {
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn messages(&self) -> Vec<&'static str> {
        self.issues.iter().map(|i| i.message()).collect()
    }

    /// Whether any issue is attached to `field`
    pub fn has_field(&self, field: Field) -> bool {
        self.issues.iter().any(|i| i.field() == field)
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            f.write_str(issue.message())?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate a candidate against `today` (the current local date)
pub fn validate(candidate: &Candidate, today: NaiveDate) -> Result<(), ValidationErrors> {
    let issues: Vec<ValidationIssue> = [
        check_name(&candidate.name),
        check_tank_size(&candidate.tank_size),
        check_date(&candidate.last_water_change, today),
    ]
    .into_iter()
    .flatten()
    .collect();

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors { issues })
    }
}

fn check_name(raw: &str) -> Option<ValidationIssue> {
    let name = raw.trim();
    if name.is_empty() {
        Some(ValidationIssue::NameRequired)
    } else if name.encode_utf16().count() < NAME_MIN_CHARS {
        Some(ValidationIssue::NameTooShort)
    } else {
        None
    }
}

fn check_tank_size(raw: &str) -> Option<ValidationIssue> {
    if raw.is_empty() {
        return Some(ValidationIssue::TankSizeRequired);
    }
    // No leading digits counts as not positive
    match parse_leading_int(raw) {
        None => Some(ValidationIssue::TankSizeNotPositive),
        Some(n) if n <= 0 => Some(ValidationIssue::TankSizeNotPositive),
        Some(n) if n > TANK_SIZE_MAX => Some(ValidationIssue::TankSizeUnrealistic),
        Some(_) => None,
    }
}

fn check_date(raw: &str, today: NaiveDate) -> Option<ValidationIssue> {
    if raw.trim().is_empty() {
        return Some(ValidationIssue::DateRequired);
    }
    match parse_date(raw) {
        None => Some(ValidationIssue::DateInvalid),
        Some(date) if date > today => Some(ValidationIssue::DateInFuture),
        Some(_) => None,
    }
}

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`)
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Lenient leading-integer parse.
///
/// Skips leading whitespace, accepts an optional sign, then reads decimal
/// digits until the first non-digit, so `"50kg"` is 50. Returns `None` when
/// no digit follows. Saturates instead of overflowing.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for b in rest.bytes() {
        if !b.is_ascii_digit() {
            break;
        }
        seen_digit = true;
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }

    if !seen_digit {
        return None;
    }
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn candidate(name: &str, size: &str, date: &str) -> Candidate {
        Candidate::new(name, size, date)
    }

    #[test]
    fn test_valid_candidate() {
        assert!(validate(&candidate("Goldfish", "40", "2024-01-01"), today()).is_ok());
    }

    #[test]
    fn test_name_rules() {
        let err = validate(&candidate("   ", "40", "2024-01-01"), today()).unwrap_err();
        assert_eq!(err.messages(), vec!["name required"]);

        let err = validate(&candidate(" A ", "40", "2024-01-01"), today()).unwrap_err();
        assert_eq!(err.messages(), vec!["name too short"]);

        assert!(validate(&candidate("Al", "40", "2024-01-01"), today()).is_ok());
        // Length is counted in UTF-16 units, so one astral emoji is long enough
        assert!(validate(&candidate("🐟", "40", "2024-01-01"), today()).is_ok());
        let err = validate(&candidate("é", "40", "2024-01-01"), today()).unwrap_err();
        assert_eq!(err.messages(), vec!["name too short"]);
    }

    #[test]
    fn test_tank_size_bounds() {
        for rejected in ["0", "10001", "-5"] {
            assert!(
                validate(&candidate("Goldfish", rejected, "2024-01-01"), today()).is_err(),
                "{rejected} should be rejected"
            );
        }
        for accepted in ["1", "10000", "50kg"] {
            assert!(
                validate(&candidate("Goldfish", accepted, "2024-01-01"), today()).is_ok(),
                "{accepted} should be accepted"
            );
        }
    }

    #[test]
    fn test_tank_size_messages() {
        let msg = |size: &str| {
            validate(&candidate("Goldfish", size, "2024-01-01"), today())
                .unwrap_err()
                .messages()
        };
        assert_eq!(msg(""), vec!["tank size required"]);
        assert_eq!(msg("0"), vec!["must be positive"]);
        assert_eq!(msg("abc"), vec!["must be positive"]);
        assert_eq!(msg("10001"), vec!["unrealistic value"]);
    }

    #[test]
    fn test_date_rules() {
        let tomorrow = "2024-06-16";
        let err = validate(&candidate("Goldfish", "40", tomorrow), today()).unwrap_err();
        assert_eq!(err.messages(), vec!["date cannot be in the future"]);

        assert!(validate(&candidate("Goldfish", "40", "2024-06-15"), today()).is_ok());

        let err = validate(&candidate("Goldfish", "40", ""), today()).unwrap_err();
        assert_eq!(err.messages(), vec!["date required"]);

        let err = validate(&candidate("Goldfish", "40", "   "), today()).unwrap_err();
        assert_eq!(err.messages(), vec!["date required"]);

        let err = validate(&candidate("Goldfish", "40", "2024-02-30"), today()).unwrap_err();
        assert_eq!(err.messages(), vec!["invalid date"]);
    }

    #[test]
    fn test_collects_every_field() {
        let err = validate(&candidate("", "", ""), today()).unwrap_err();
        assert_eq!(
            err.messages(),
            vec!["name required", "tank size required", "date required"]
        );
        assert!(Field::ALL.iter().all(|f| err.has_field(*f)));
        assert_eq!(err.to_string(), "name required; tank size required; date required");
    }

    #[test]
    fn test_issue_fields() {
        assert_eq!(ValidationIssue::NameTooShort.field(), Field::Name);
        assert_eq!(ValidationIssue::TankSizeUnrealistic.field(), Field::TankSize);
        assert_eq!(ValidationIssue::DateInFuture.field(), Field::LastWaterChange);
        assert_eq!(Field::LastWaterChange.input_id(), "waterChangeDate");
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("42"), Some(42));
        assert_eq!(parse_leading_int("  7 liters"), Some(7));
        assert_eq!(parse_leading_int("-3"), Some(-3));
        assert_eq!(parse_leading_int("+8"), Some(8));
        assert_eq!(parse_leading_int("12.9"), Some(12));
        assert_eq!(parse_leading_int("x12"), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("99999999999999999999999"), Some(i64::MAX));
    }

    proptest! {
        #[test]
        fn prop_leading_int_ignores_suffix(n in 0i64..1_000_000, suffix in "[a-z ]{0,6}") {
            prop_assert_eq!(parse_leading_int(&format!("{n}{suffix}")), Some(n));
        }

        #[test]
        fn prop_tank_size_accepted_in_range(n in 1i64..=10_000) {
            let c = candidate("Goldfish", &n.to_string(), "2024-01-01");
            prop_assert!(validate(&c, today()).is_ok());
        }
    }
}
