use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Origin of a user account.
/// Corresponds to the `account_type` SQL enum.
///
/// A user signed up locally and a user created through a social provider are
/// the same shape of record; `account_type` records which strategy owns the
/// account. An email registered under one account type may never be claimed
/// through a different one.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "account_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Account created through local email/password signup.
    Local,
    Google,
    Facebook,
    Twitter,
}

impl AccountType {
    /// Parses a provider path segment (e.g. from `/auth/{provider}/callback`).
    /// `local` is not a social provider and is rejected here.
    pub fn from_provider(provider: &str) -> Option<Self> {
        match provider {
            "google" => Some(AccountType::Google),
            "facebook" => Some(AccountType::Facebook),
            "twitter" => Some(AccountType::Twitter),
            _ => None,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            AccountType::Local => "local",
            AccountType::Google => "google",
            AccountType::Facebook => "facebook",
            AccountType::Twitter => "twitter",
        };
        write!(f, "{}", name)
    }
}

/// Represents a user entity as stored in the database.
///
/// The password hash is never serialized into API responses.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub account_type: AccountType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
