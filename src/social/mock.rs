//! A deterministic, dependency-free social login strategy for tests.
//!
//! The mock accepts exactly one configured access token and resolves it into
//! a fixed profile, so the whole callback state machine can be exercised
//! without live provider credentials. It is registered through the same
//! [`SocialProviders`](crate::social::SocialProviders) registry as the live
//! strategies.

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::AccountType;
use crate::social::{SocialProfile, SocialProvider};

pub struct MockProvider {
    account_type: AccountType,
    valid_token: String,
    profile: SocialProfile,
}

impl MockProvider {
    /// A mock strategy for the given provider that accepts the token
    /// `"{provider}authtoken"` and resolves a fixed profile with a usable
    /// email.
    pub fn new(account_type: AccountType) -> Self {
        Self {
            account_type,
            valid_token: format!("{}authtoken", account_type),
            profile: SocialProfile {
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                email: Some(format!("{}user@example.com", account_type)),
                external_id: format!("{}-external-id-1", account_type),
                provider: account_type,
            },
        }
    }

    /// Overrides the profile the valid token resolves to. Used to exercise
    /// the missing-email and cross-provider rejection paths.
    pub fn with_profile(mut self, profile: SocialProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Overrides only the resolved email.
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.profile.email = email;
        self
    }

    pub fn valid_token(&self) -> &str {
        &self.valid_token
    }
}

#[async_trait]
impl SocialProvider for MockProvider {
    fn account_type(&self) -> AccountType {
        self.account_type
    }

    async fn resolve_profile(&self, access_token: &str) -> Result<SocialProfile, AppError> {
        if access_token == self.valid_token {
            Ok(self.profile.clone())
        } else {
            Err(AppError::Unauthorized("Unauthorized".to_string()))
        }
    }
}
