//! Validation Traits
//!
//! Input checks shared by the services. Failures are core `ValidationError`
//! values so they map to 400 responses through the usual error conversion.

use dishrank_core::ValidationError;

/// Trait for validating that a string carries content.
pub trait ValidateNonEmpty {
    /// Returns the trimmed value, or `EmptyKeyword` if nothing is left.
    fn validate_keyword(&self) -> Result<&str, ValidationError>;
}

impl ValidateNonEmpty for str {
    fn validate_keyword(&self) -> Result<&str, ValidationError> {
        let trimmed = self.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyKeyword);
        }
        Ok(trimmed)
    }
}

impl ValidateNonEmpty for String {
    fn validate_keyword(&self) -> Result<&str, ValidationError> {
        self.as_str().validate_keyword()
    }
}

/// Trait for validating numeric ranges.
pub trait ValidateRange: Sized {
    /// Validate that the value is within an inclusive range.
    fn validate_range(
        &self,
        field_name: &str,
        min: Self,
        max: Self,
    ) -> Result<(), ValidationError>;
}

macro_rules! impl_validate_range {
    ($($t:ty),*) => {
        $(
            impl ValidateRange for $t {
                fn validate_range(
                    &self,
                    field_name: &str,
                    min: Self,
                    max: Self,
                ) -> Result<(), ValidationError> {
                    if *self < min || *self > max {
                        return Err(ValidationError::LimitOutOfRange {
                            field: field_name.to_string(),
                            value: *self as i64,
                            min: min as i64,
                            max: max as i64,
                        });
                    }
                    Ok(())
                }
            }
        )*
    };
}

impl_validate_range!(i32, i64, u32);

/// Resolve an optional `limit` against its default and bounds.
pub fn resolve_limit(
    limit: Option<i64>,
    default: i64,
    min: i64,
    max: i64,
) -> Result<usize, ValidationError> {
    let limit = limit.unwrap_or(default);
    limit.validate_range("limit", min, max)?;
    // In range and min >= 1, so the cast cannot wrap.
    Ok(limit as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_keyword_validation() {
        assert_eq!("  tofu ".validate_keyword(), Ok("tofu"));
        assert_eq!("".validate_keyword(), Err(ValidationError::EmptyKeyword));
        assert_eq!("   ".validate_keyword(), Err(ValidationError::EmptyKeyword));
        assert_eq!("김치".to_string().validate_keyword(), Ok("김치"));
    }

    #[test]
    fn test_range_validation() {
        assert!(50i64.validate_range("limit", 1, 100).is_ok());
        assert!(1i64.validate_range("limit", 1, 100).is_ok());
        assert!(100i64.validate_range("limit", 1, 100).is_ok());

        let err = 0i64.validate_range("limit", 1, 100).unwrap_err();
        assert_eq!(
            err,
            ValidationError::LimitOutOfRange {
                field: "limit".to_string(),
                value: 0,
                min: 1,
                max: 100,
            }
        );
        assert!(101u32.validate_range("limit", 1, 100).is_err());
    }

    #[test]
    fn test_resolve_limit_defaults() {
        assert_eq!(resolve_limit(None, 20, 1, 100), Ok(20));
        assert_eq!(resolve_limit(Some(7), 20, 1, 100), Ok(7));
        assert!(resolve_limit(Some(-3), 20, 1, 100).is_err());
    }

    proptest! {
        #[test]
        fn prop_resolve_limit_accepts_exactly_the_range(limit in -50i64..200) {
            let resolved = resolve_limit(Some(limit), 20, 1, 100);
            prop_assert_eq!(resolved.is_ok(), (1..=100).contains(&limit));
            if let Ok(n) = resolved {
                prop_assert_eq!(n as i64, limit);
            }
        }
    }
}
