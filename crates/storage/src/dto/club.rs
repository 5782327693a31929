use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::validation::{validate_currency, validate_position, validate_staff_role};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AddMemberRequest {
    #[validate(length(min = 1, max = 30))]
    pub username: String,

    #[validate(range(min = 1, max = 99))]
    pub shirt_number: Option<i16>,

    #[validate(custom(function = "validate_position"))]
    pub position: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AddStaffRequest {
    #[validate(length(min = 1, max = 30))]
    pub username: String,

    #[validate(custom(function = "validate_staff_role"))]
    pub role: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct TransferRequest {
    #[validate(length(min = 1, max = 30))]
    pub username: String,

    pub fee: Option<Decimal>,

    #[validate(custom(function = "validate_currency"))]
    pub currency: Option<String>,

    #[validate(range(min = 1, max = 99))]
    pub shirt_number: Option<i16>,
}

impl TransferRequest {
    pub fn validate_fee(&self) -> Result<(), String> {
        match (&self.fee, &self.currency) {
            (Some(fee), _) if fee.is_sign_negative() => Err("fee cannot be negative".to_string()),
            (Some(_), None) => Err("currency is required when a fee is given".to_string()),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CallupRequest {
    #[validate(length(min = 1, max = 30))]
    pub username: String,

    #[validate(length(min = 1, max = 100))]
    pub country: String,

    #[validate(length(min = 1, max = 255))]
    pub competition: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SquadMember {
    pub player_id: Uuid,
    pub username: String,
    pub display_name: String,
    pub shirt_number: Option<i16>,
    pub position: Option<String>,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StaffEntry {
    pub staff_id: Uuid,
    pub username: String,
    pub display_name: String,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TransferResponse {
    pub transfer_id: Uuid,
    pub player_id: Uuid,
    pub player_username: String,
    pub from_club_id: Option<Uuid>,
    pub from_club_username: Option<String>,
    pub to_club_id: Uuid,
    pub to_club_username: String,
    pub fee: Option<Decimal>,
    pub currency: Option<String>,
    pub transferred_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn transfer(fee: Option<&str>, currency: Option<&str>) -> TransferRequest {
        TransferRequest {
            username: "playmaker".to_string(),
            fee: fee.map(|f| Decimal::from_str(f).unwrap()),
            currency: currency.map(String::from),
            shirt_number: None,
        }
    }

    #[test]
    fn fee_needs_currency() {
        assert!(transfer(Some("1000000"), None).validate_fee().is_err());
        assert!(transfer(Some("1000000"), Some("EUR")).validate_fee().is_ok());
        assert!(transfer(None, None).validate_fee().is_ok());
        assert!(transfer(Some("-5"), Some("EUR")).validate_fee().is_err());
    }
}
