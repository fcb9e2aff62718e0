//! Request field validation
//!
//! Collects every failing field before rejecting, so clients can show all
//! problems at once.

use crate::error::{ApiError, ApiResult, FieldError};
use regex::Regex;
use std::sync::OnceLock;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

/// Canonical form used for lookups: trimmed and lower-cased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a syntactically valid email; returns its normalized form
    pub fn email(&mut self, field: &str, value: Option<&str>) -> Option<String> {
        match value.map(str::trim) {
            Some(v) if email_regex().is_match(v) => Some(normalize_email(v)),
            _ => {
                self.errors.push(FieldError::new(field, "Invalid email"));
                None
            }
        }
    }

    /// Require a non-blank value
    pub fn required<'a>(&mut self, field: &str, value: Option<&'a str>) -> Option<&'a str> {
        match value {
            Some(v) if !v.trim().is_empty() => Some(v),
            _ => {
                self.errors.push(FieldError::new(field, format!("{} is required", field)));
                None
            }
        }
    }

    /// Require a value of at least `min` characters
    pub fn min_length<'a>(&mut self, field: &str, value: Option<&'a str>, min: usize) -> Option<&'a str> {
        match value {
            Some(v) if v.chars().count() >= min => Some(v),
            _ => {
                self.errors.push(FieldError::new(
                    field,
                    format!("{} must be at least {} characters", field, min),
                ));
                None
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(self) -> ApiResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation(self.errors))
        }
    }
}
