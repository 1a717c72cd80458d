//! Input validation functions
//!
//! This module provides validation utilities for user input.
//! Field-length checks live on the request types as `validator` derives;
//! the checks here cover formats and cross-field rules the derives can't express.

use crate::errors::QueryError;
use regex_lite::Regex;
use std::collections::HashSet;
use std::hash::Hash;
use std::sync::OnceLock;

/// Smallest accepted cooking time / ingredient amount
pub const MIN_POSITIVE_SMALL: i32 = 1;
/// Largest accepted cooking time / ingredient amount (PostgreSQL SMALLINT)
pub const MAX_POSITIVE_SMALL: i32 = 32767;

/// Usernames that would shadow a fixed `/users/...` route
pub const RESERVED_USERNAMES: &[&str] = &["me", "subscriptions", "set_password"];

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static pattern compiles"))
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    static EMAIL: OnceLock<Regex> = OnceLock::new();

    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if email.len() > 254 {
        return Err("Email too long".to_string());
    }
    if !regex(&EMAIL, r"^[^\s@]+@[^\s@]+\.[^\s@]+$").is_match(email) {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate username: letters, digits and `.@+-_`, up to 150 characters
pub fn validate_username(username: &str) -> Result<(), String> {
    static USERNAME: OnceLock<Regex> = OnceLock::new();

    if username.is_empty() {
        return Err("Username cannot be empty".to_string());
    }
    if username.chars().count() > 150 {
        return Err("Username must be at most 150 characters".to_string());
    }
    if !regex(&USERNAME, r"^[\w.@+-]+$").is_match(username) {
        return Err("Username may contain only letters, digits and @/./+/-/_".to_string());
    }
    if RESERVED_USERNAMES.contains(&username.to_lowercase().as_str()) {
        return Err(format!("Username '{}' is reserved", username));
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    if password.len() > 128 {
        return Err("Password too long".to_string());
    }
    Ok(())
}

/// Validate a tag color in `#RRGGBB` form
pub fn validate_color(color: &str) -> Result<(), String> {
    static COLOR: OnceLock<Regex> = OnceLock::new();

    if !regex(&COLOR, r"^#[0-9A-Fa-f]{6}$").is_match(color) {
        return Err(format!("Invalid color '{}', expected #RRGGBB", color));
    }
    Ok(())
}

/// Validate a tag slug
pub fn validate_slug(slug: &str) -> Result<(), String> {
    static SLUG: OnceLock<Regex> = OnceLock::new();

    if slug.is_empty() || slug.len() > 200 {
        return Err("Slug must be between 1 and 200 characters".to_string());
    }
    if !regex(&SLUG, r"^[-a-zA-Z0-9_]+$").is_match(slug) {
        return Err(format!("Invalid slug '{}'", slug));
    }
    Ok(())
}

/// Validate a positive small integer (cooking time in minutes, ingredient amount)
pub fn validate_positive_small(value: i32, what: &str) -> Result<(), String> {
    if value < MIN_POSITIVE_SMALL {
        return Err(format!("{} must be greater than 0", what));
    }
    if value > MAX_POSITIVE_SMALL {
        return Err(format!("{} must be at most {}", what, MAX_POSITIVE_SMALL));
    }
    Ok(())
}

/// Return the first item that occurs more than once
pub fn find_duplicate<T>(items: impl IntoIterator<Item = T>) -> Option<T>
where
    T: Eq + Hash + Clone,
{
    let mut seen = HashSet::new();
    items.into_iter().find(|item| !seen.insert(item.clone()))
}

/// Parse the `recipes_limit` query parameter
///
/// Missing or empty means "no limit".
pub fn parse_recipes_limit(raw: Option<&str>) -> Result<Option<i64>, QueryError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) if value.chars().all(|c| c.is_ascii_digit()) => value
            .parse::<i64>()
            .map(Some)
            .map_err(|_| QueryError::NotAnInteger {
                field: "recipes_limit".to_string(),
            }),
        Some(_) => Err(QueryError::NotAnInteger {
            field: "recipes_limit".to_string(),
        }),
    }
}

/// Parse a boolean filter flag (`1`/`0`/`true`/`false`)
pub fn parse_flag(field: &str, raw: &str) -> Result<bool, QueryError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(QueryError::NotABoolean {
            field: field.to_string(),
        }),
    }
}
