use std::fmt;

use crate::error::InputError;

/// Accepted digit counts for a Costa Rican identification (physical, legal,
/// DIMEX and NITE numbers).
pub const ACCEPTED_LENGTHS: std::ops::RangeInclusive<usize> = 9..=12;

/// A taxpayer identification that passed [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier(String);

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Superficial format check, nothing more: the registry is the authority on
/// whether the number exists.
pub fn validate(raw: &str) -> Result<Identifier, InputError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(InputError::Missing);
    }

    if !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(InputError::NotNumeric);
    }

    let len = trimmed.len();
    if !ACCEPTED_LENGTHS.contains(&len) {
        return Err(InputError::InvalidLength { len });
    }

    Ok(Identifier(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_input() {
        assert_eq!(validate(""), Err(InputError::Missing));
        assert_eq!(validate("   \t "), Err(InputError::Missing));
    }

    #[test]
    fn rejects_any_non_digit() {
        for raw in ["3-101-123456", "12345678a", "１２３４５６７８９", "123 456 789", "+123456789"] {
            assert_eq!(validate(raw), Err(InputError::NotNumeric), "{raw}");
        }
    }

    #[test]
    fn rejects_lengths_outside_nine_to_twelve() {
        for len in [1, 5, 8, 13, 20] {
            let raw = "1".repeat(len);
            assert_eq!(validate(&raw), Err(InputError::InvalidLength { len }));
        }
    }

    #[test]
    fn accepts_nine_to_twelve_digits() {
        for len in 9..=12 {
            let raw = "7".repeat(len);
            assert_eq!(validate(&raw).unwrap().as_str(), raw);
        }
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let id = validate("  3101123456\n").unwrap();
        assert_eq!(id.to_string(), "3101123456");
    }
}
