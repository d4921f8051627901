//! # Repository Layer
//!
//! This module contains repository implementations that encapsulate SeaORM
//! operations for the six entities, providing a typed API for data access.
//! Each repository takes its database handle by reference; the pool is owned
//! by the process entry point and passed down explicitly.

use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::error::FieldViolation;

pub mod account;
pub mod card;
pub mod company;
pub mod loan;
pub mod transaction;
pub mod user;

pub use account::AccountRepository;
pub use card::CardRepository;
pub use company::CompanyRepository;
pub use loan::LoanRepository;
pub use transaction::TransactionRepository;
pub use user::UserRepository;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern must compile")
    })
}

pub(crate) fn violation(field: &str, problem: &str) -> FieldViolation {
    FieldViolation {
        field: field.to_string(),
        problem: problem.to_string(),
    }
}

pub(crate) fn check_non_empty(field: &str, value: &str, violations: &mut Vec<FieldViolation>) {
    if value.trim().is_empty() {
        violations.push(violation(field, "must not be empty"));
    }
}

pub(crate) fn check_email(value: &str, violations: &mut Vec<FieldViolation>) {
    if !email_pattern().is_match(value) {
        violations.push(violation("email", "must be a valid email address"));
    }
}

pub(crate) fn check_country_code(value: &str, violations: &mut Vec<FieldViolation>) {
    if value.len() != 2 || !value.chars().all(|c| c.is_ascii_uppercase()) {
        violations.push(violation(
            "country_code",
            "must be exactly 2 uppercase letters",
        ));
    }
}

pub(crate) fn check_currency(value: &str, violations: &mut Vec<FieldViolation>) {
    if value.len() != 3 || !value.chars().all(|c| c.is_ascii_uppercase()) {
        violations.push(violation("currency", "must be a 3-letter currency code"));
    }
}

pub(crate) fn check_non_negative(
    field: &str,
    value: Decimal,
    violations: &mut Vec<FieldViolation>,
) {
    if value.is_sign_negative() {
        violations.push(violation(field, "must not be negative"));
    }
}

pub(crate) fn check_positive_amount(
    field: &str,
    value: Decimal,
    violations: &mut Vec<FieldViolation>,
) {
    if value <= Decimal::ZERO {
        violations.push(violation(field, "must be positive"));
    }
}

pub(crate) fn check_positive_int(field: &str, value: i32, violations: &mut Vec<FieldViolation>) {
    if value <= 0 {
        violations.push(violation(field, "must be positive"));
    }
}

pub(crate) fn check_last_four(value: &str, violations: &mut Vec<FieldViolation>) {
    if value.len() != 4 || !value.chars().all(|c| c.is_ascii_digit()) {
        violations.push(violation("last_four_digits", "must be exactly 4 digits"));
    }
}
