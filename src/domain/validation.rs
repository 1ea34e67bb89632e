use chrono::{NaiveDate, NaiveTime};
use validator::ValidateEmail;

use crate::{error::ValidationError, models::Table};

/// Largest party a single reservation may book.
pub const MAX_PERSONS: i32 = 8;
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_PRODUCT_NAME_LEN: usize = 3;
pub const MIN_DESCRIPTION_LEN: usize = 10;

/// Trims and lowercases, so lookups and the unique index agree.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() || !email.validate_email() {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Mobile numbers: nine digits, leading 9.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let ok = phone.len() == 9 && phone.starts_with('9') && phone.chars().all(|c| c.is_ascii_digit());
    if ok { Ok(()) } else { Err(ValidationError::InvalidPhone) }
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::WeakPassword);
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::InvalidName);
    }
    Ok(())
}

pub fn validate_product_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().chars().count() < MIN_PRODUCT_NAME_LEN {
        return Err(ValidationError::InvalidProductName);
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.trim().chars().count() < MIN_DESCRIPTION_LEN {
        return Err(ValidationError::InvalidDescription);
    }
    Ok(())
}

pub fn validate_price(price: i64) -> Result<(), ValidationError> {
    if price <= 0 {
        return Err(ValidationError::InvalidPrice);
    }
    Ok(())
}

pub fn validate_stock(stock: i32) -> Result<(), ValidationError> {
    if stock < 0 {
        return Err(ValidationError::InvalidStock);
    }
    Ok(())
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate)
}

pub fn parse_time(raw: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|_| ValidationError::InvalidTime)
}

pub fn validate_party_size(party_size: i32) -> Result<(), ValidationError> {
    if !(1..=MAX_PERSONS).contains(&party_size) {
        return Err(ValidationError::InvalidPartySize);
    }
    Ok(())
}

pub fn ensure_table_fits(party_size: i32, table: &Table) -> Result<(), ValidationError> {
    if party_size > table.capacity {
        return Err(ValidationError::TableTooSmall {
            party_size,
            capacity: table.capacity,
        });
    }
    Ok(())
}
