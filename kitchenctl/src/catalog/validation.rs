//! Field rules applied before anything reaches the store.
//!
//! Messages follow the wording staff already know from the admin forms.

use rust_decimal::Decimal;

use crate::config::PasswordConfig;
use crate::errors::{Error, Result};

pub const NAME_MAX_LENGTH: usize = 255;
pub const USERNAME_MAX_LENGTH: usize = 150;
pub const PERSON_NAME_MAX_LENGTH: usize = 150;

const REQUIRED: &str = "This field is required.";
const NON_NEGATIVE: &str = "Ensure this value is greater than or equal to 0.";

/// Largest price the store column can hold is 99 999 999.99
const PRICE_INTEGER_DIGITS: u32 = 8;
const PRICE_DECIMAL_PLACES: u32 = 2;

fn check_length(field: &str, value: &str, max: usize) -> Result<()> {
    let length = value.chars().count();
    if length > max {
        return Err(Error::validation(
            field,
            format!("Ensure this value has at most {max} characters (it has {length})."),
        ));
    }
    Ok(())
}

/// Trimmed, non-empty, at most `max` characters
pub fn required_text(field: &str, value: &str, max: usize) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::validation(field, REQUIRED));
    }
    check_length(field, value, max)?;
    Ok(value.to_string())
}

/// Trimmed and at most `max` characters; may be empty
pub fn optional_text(field: &str, value: &str, max: usize) -> Result<String> {
    let value = value.trim();
    check_length(field, value, max)?;
    Ok(value.to_string())
}

pub fn username(value: &str) -> Result<String> {
    let value = required_text("username", value, USERNAME_MAX_LENGTH)?;
    if !value.chars().all(|c| c.is_alphanumeric() || "@.+-_".contains(c)) {
        return Err(Error::validation(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        ));
    }
    Ok(value)
}

pub fn years_of_experience(value: i32) -> Result<i32> {
    if value < 0 {
        return Err(Error::validation("years_of_experience", NON_NEGATIVE));
    }
    Ok(value)
}

pub fn required<T>(field: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| Error::validation(field, REQUIRED))
}

/// Non-negative, fits the store column, normalized to two decimal places
pub fn price(value: Decimal) -> Result<Decimal> {
    if value < Decimal::ZERO {
        return Err(Error::validation("price", NON_NEGATIVE));
    }
    if value.normalize().scale() > PRICE_DECIMAL_PLACES {
        return Err(Error::validation(
            "price",
            format!("Ensure that there are no more than {PRICE_DECIMAL_PLACES} decimal places."),
        ));
    }
    if value.trunc() >= Decimal::from(10i64.pow(PRICE_INTEGER_DIGITS)) {
        return Err(Error::validation(
            "price",
            format!("Ensure that there are no more than {PRICE_INTEGER_DIGITS} digits before the decimal point."),
        ));
    }
    let mut value = value.normalize();
    value.rescale(PRICE_DECIMAL_PLACES);
    Ok(value)
}

pub fn password(value: &str, config: &PasswordConfig) -> Result<()> {
    let length = value.chars().count();
    if length < config.min_length {
        return Err(Error::validation(
            "password",
            format!("Password must be at least {} characters", config.min_length),
        ));
    }
    if length > config.max_length {
        return Err(Error::validation(
            "password",
            format!("Password must be no more than {} characters", config.max_length),
        ));
    }
    Ok(())
}
