//! Validation utilities

use crate::types::*;
use bigdecimal::BigDecimal;

/// Validate that an amount is positive
pub fn validate_positive_amount(amount: &BigDecimal) -> FinanceResult<()> {
    if *amount <= BigDecimal::from(0) {
        Err(FinanceError::Validation(
            "Amount must be positive".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate a category, sub-category, or expense title name
pub fn validate_name(name: &str) -> FinanceResult<()> {
    if name.trim().is_empty() {
        return Err(FinanceError::Validation(
            "Name cannot be empty".to_string(),
        ));
    }

    if name.len() > 100 {
        return Err(FinanceError::Validation(
            "Name cannot exceed 100 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate an ISO currency code; an empty code is allowed and defaults to
/// USD downstream
pub fn validate_currency(currency: &str) -> FinanceResult<()> {
    let code = currency.trim();
    if code.is_empty() {
        return Ok(());
    }

    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(FinanceError::Validation(format!(
            "Invalid currency code: '{currency}'"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_must_be_positive() {
        assert!(validate_positive_amount(&BigDecimal::from(1)).is_ok());
        assert!(validate_positive_amount(&BigDecimal::from(0)).is_err());
        assert!(validate_positive_amount(&BigDecimal::from(-3)).is_err());
    }

    #[test]
    fn names_must_be_non_empty_and_bounded() {
        assert!(validate_name("Housing").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn currency_codes_are_three_letters_or_empty() {
        assert!(validate_currency("").is_ok());
        assert!(validate_currency("USD").is_ok());
        assert!(validate_currency("eur").is_ok());
        assert!(validate_currency("US").is_err());
        assert!(validate_currency("U5D").is_err());
    }
}
