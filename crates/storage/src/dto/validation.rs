//! Field validators shared by request payloads.

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

use crate::models::{Position, PreferredFoot, StaffRole, UserRole, Visibility};

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]{3,30}$").expect("valid username pattern"));

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if USERNAME_RE.is_match(username) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_username")
            .with_message("Username must be 3-30 letters, digits or underscores".into()))
    }
}

pub fn validate_registration_role(role: &str) -> Result<(), ValidationError> {
    match role.parse::<UserRole>() {
        Ok(role) if role.is_self_assignable() => Ok(()),
        _ => Err(ValidationError::new("invalid_role")
            .with_message("Role must be athlete, coach, scout, club or fan".into())),
    }
}

pub fn validate_position(position: &str) -> Result<(), ValidationError> {
    position
        .parse::<Position>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("invalid_position"))
}

pub fn validate_preferred_foot(foot: &str) -> Result<(), ValidationError> {
    foot.parse::<PreferredFoot>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("invalid_preferred_foot"))
}

pub fn validate_visibility(visibility: &str) -> Result<(), ValidationError> {
    visibility
        .parse::<Visibility>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("invalid_visibility"))
}

pub fn validate_staff_role(role: &str) -> Result<(), ValidationError> {
    role.parse::<StaffRole>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("invalid_staff_role"))
}

/// ISO 4217 style code: three uppercase ASCII letters.
pub fn validate_currency(currency: &str) -> Result<(), ValidationError> {
    if currency.len() == 3 && currency.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_currency")
            .with_message("Currency must be a three letter ISO code".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usernames() {
        assert!(validate_username("striker_9").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"x".repeat(31)).is_err());
    }

    #[test]
    fn admin_role_is_rejected_at_registration() {
        assert!(validate_registration_role("scout").is_ok());
        assert!(validate_registration_role("admin").is_err());
        assert!(validate_registration_role("referee").is_err());
    }

    #[test]
    fn currencies() {
        assert!(validate_currency("EUR").is_ok());
        assert!(validate_currency("eur").is_err());
        assert!(validate_currency("EURO").is_err());
    }
}
