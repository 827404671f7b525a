// Validation utilities module
// Custom validation functions for domain-specific rules

use regex::Regex;
use rust_decimal::Decimal;
use std::sync::OnceLock;
use validator::ValidationError;

fn phone_regex() -> &'static Regex {
    static PHONE_RE: OnceLock<Regex> = OnceLock::new();
    PHONE_RE.get_or_init(|| Regex::new(r"^[0-9]{10}$").expect("valid phone regex"))
}

/// Validates that a phone number is exactly 10 digits.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone_regex().is_match(phone) {
        Ok(())
    } else {
        let mut err = ValidationError::new("invalid_phone");
        err.message = Some("Please provide a valid phone number".into());
        Err(err)
    }
}

/// Validates that a monetary amount is not negative.
pub fn validate_non_negative_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() {
        let mut err = ValidationError::new("negative_amount");
        err.message = Some("Amount cannot be negative".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates that a payment increment is strictly positive.
pub fn validate_positive_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount > &Decimal::ZERO {
        Ok(())
    } else {
        let mut err = ValidationError::new("non_positive_amount");
        err.message = Some("Amount must be greater than zero".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn phone_requires_exactly_ten_digits() {
        assert!(validate_phone("0123456789").is_ok());
        assert!(validate_phone("123456789").is_err());
        assert!(validate_phone("12345678901").is_err());
        assert!(validate_phone("12345abcde").is_err());
        assert!(validate_phone("").is_err());
    }

    #[test]
    fn amount_validators_split_on_zero() {
        assert!(validate_non_negative_amount(&dec!(0)).is_ok());
        assert!(validate_non_negative_amount(&dec!(100.50)).is_ok());
        assert!(validate_non_negative_amount(&dec!(-0.01)).is_err());

        assert!(validate_positive_amount(&dec!(0.01)).is_ok());
        assert!(validate_positive_amount(&dec!(0)).is_err());
        assert!(validate_positive_amount(&dec!(-5)).is_err());
    }
}
