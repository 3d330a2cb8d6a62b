//! User profile and credential models for storage and API.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How long after account creation the `created_at` field stays editable.
pub const CREATION_DATE_GRACE_DAYS: i64 = 3;

/// Whether the account creation date may still be edited.
///
/// The window closes exactly `CREATION_DATE_GRACE_DAYS` after the original
/// creation instant; the closing instant itself is still inside.
pub fn creation_date_editable(created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now <= created_at + Duration::days(CREATION_DATE_GRACE_DAYS)
}

/// Supported billing currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "INR")]
    Inr,
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "GBP")]
    Gbp,
}

impl Currency {
    /// Display symbol for formatted amounts.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Inr => "₹",
            Currency::Eur => "€",
            Currency::Gbp => "£",
        }
    }

    /// ISO 4217 code, as stored and shown in share text.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Inr => "INR",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
        }
    }
}

/// User profile stored in Firestore.
///
/// The document ID doubles as the `user_id` on smoke events and the JWT subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User ID (UUIDv4, also used as document ID)
    pub user_id: String,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Baseline: average cigarettes smoked per day before tracking began
    pub avg_cigarettes_per_day: u32,
    /// Cigarettes per pack
    pub cigarettes_per_pack: u32,
    /// Price per pack in the user's currency
    pub price_per_pack: f64,
    /// Billing currency
    pub currency: Currency,
    /// Account creation timestamp (RFC3339). Editable only within the
    /// 3-day grace window after creation.
    pub created_at: String,
    /// Last profile update timestamp (RFC3339)
    pub updated_at: String,
}

/// Login credentials stored in Firestore, keyed by user ID.
///
/// Kept in a separate collection from the profile so profile reads never
/// carry password material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Owning user ID
    pub user_id: String,
    /// Email address (queried on login, unique)
    pub email: String,
    /// Hex-encoded PBKDF2 salt
    pub password_salt: String,
    /// Hex-encoded PBKDF2-HMAC-SHA256 digest
    pub password_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_codes_round_trip() {
        for currency in [Currency::Usd, Currency::Inr, Currency::Eur, Currency::Gbp] {
            let json = serde_json::to_string(&currency).unwrap();
            assert_eq!(json, format!("\"{}\"", currency.code()));
            let back: Currency = serde_json::from_str(&json).unwrap();
            assert_eq!(back, currency);
        }
    }

    #[test]
    fn test_unknown_currency_rejected() {
        assert!(serde_json::from_str::<Currency>("\"JPY\"").is_err());
    }

    #[test]
    fn test_currency_symbols() {
        assert_eq!(Currency::Usd.symbol(), "$");
        assert_eq!(Currency::Inr.symbol(), "₹");
        assert_eq!(Currency::Eur.symbol(), "€");
        assert_eq!(Currency::Gbp.symbol(), "£");
    }

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_creation_date_editable_inside_window() {
        let created = utc("2024-03-01T10:00:00Z");
        assert!(creation_date_editable(created, utc("2024-03-01T10:00:00Z")));
        assert!(creation_date_editable(created, utc("2024-03-03T23:59:59Z")));
    }

    #[test]
    fn test_creation_date_editable_at_boundary() {
        let created = utc("2024-03-01T10:00:00Z");
        // Exactly 3 days later is the last editable instant
        assert!(creation_date_editable(created, utc("2024-03-04T10:00:00Z")));
        assert!(!creation_date_editable(created, utc("2024-03-04T10:00:01Z")));
    }

    #[test]
    fn test_creation_date_editable_outside_window() {
        let created = utc("2024-03-01T10:00:00Z");
        assert!(!creation_date_editable(created, utc("2024-03-10T10:00:00Z")));
    }
}
