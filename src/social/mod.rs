//!
//! # Social Login Strategies
//!
//! Pluggable strategies that exchange a third-party provider's access token
//! for a canonical user profile. Each strategy implements [`SocialProvider`];
//! the live Google/Facebook/Twitter implementations call the provider's
//! user-info endpoint over HTTP, while [`mock::MockProvider`] is a
//! deterministic, dependency-free double used by tests.
//!
//! Strategies are injected through the [`SocialProviders`] registry stored in
//! actix app data, so production and test code paths are structurally
//! identical: the callback handler only ever talks to the trait.

pub mod mock;
pub mod providers;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::AccountType;

pub use mock::MockProvider;
pub use providers::{FacebookProvider, GoogleProvider, TwitterProvider};

/// A remote profile resolved into the canonical user shape.
///
/// `external_id` is the provider's stable identifier for the account; it
/// stands in for a password when the user record is created. `email` stays
/// optional because some providers can return a profile without one, which
/// the callback must reject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub external_id: String,
    pub provider: AccountType,
}

/// A social login strategy: validates an upstream access token and resolves
/// it into a [`SocialProfile`].
#[async_trait]
pub trait SocialProvider: Send + Sync {
    /// The account type this strategy authenticates for.
    fn account_type(&self) -> AccountType;

    /// Exchanges the presented access token for the remote profile.
    ///
    /// Returns `AppError::Unauthorized` when the upstream provider reports
    /// the token invalid or expired.
    async fn resolve_profile(&self, access_token: &str) -> Result<SocialProfile, AppError>;
}

/// Registry of social login strategies, keyed by account type.
///
/// Stored in actix app data; the callback handler looks strategies up by the
/// provider path segment.
#[derive(Default)]
pub struct SocialProviders {
    providers: HashMap<AccountType, Arc<dyn SocialProvider>>,
}

impl SocialProviders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a strategy under its own account type.
    pub fn with(mut self, provider: Arc<dyn SocialProvider>) -> Self {
        self.providers.insert(provider.account_type(), provider);
        self
    }

    /// The production registry: live Google, Facebook, and Twitter strategies.
    pub fn live() -> Self {
        Self::new()
            .with(Arc::new(GoogleProvider::new()))
            .with(Arc::new(FacebookProvider::new()))
            .with(Arc::new(TwitterProvider::new()))
    }

    pub fn get(&self, account_type: AccountType) -> Option<&dyn SocialProvider> {
        self.providers.get(&account_type).map(|p| p.as_ref())
    }
}
