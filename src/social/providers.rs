//! Live social login strategies backed by the providers' user-info endpoints.
//!
//! Each strategy presents the access token to the provider over HTTPS and
//! maps the returned profile into the canonical [`SocialProfile`] shape. Any
//! non-success response from the provider means the token is invalid or
//! expired and maps to `AppError::Unauthorized`.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::AccountType;
use crate::social::{SocialProfile, SocialProvider};

const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";
const FACEBOOK_USERINFO_URL: &str = "https://graph.facebook.com/me";
const TWITTER_USERINFO_URL: &str = "https://api.twitter.com/2/users/me";

fn rejected(provider: AccountType) -> AppError {
    AppError::Unauthorized(format!("{} rejected the access token", provider))
}

/// Google strategy: validates the token against the OpenID userinfo endpoint.
pub struct GoogleProvider {
    client: reqwest::Client,
    userinfo_url: String,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    sub: String,
    #[serde(default)]
    given_name: String,
    #[serde(default)]
    family_name: String,
    email: Option<String>,
}

impl GoogleProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            userinfo_url: GOOGLE_USERINFO_URL.to_string(),
        }
    }
}

impl Default for GoogleProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SocialProvider for GoogleProvider {
    fn account_type(&self) -> AccountType {
        AccountType::Google
    }

    async fn resolve_profile(&self, access_token: &str) -> Result<SocialProfile, AppError> {
        let response = self
            .client
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejected(AccountType::Google));
        }

        let info: GoogleUserInfo = response.json().await?;
        Ok(SocialProfile {
            first_name: info.given_name,
            last_name: info.family_name,
            email: info.email,
            external_id: info.sub,
            provider: AccountType::Google,
        })
    }
}

/// Facebook strategy: validates the token against the Graph API `/me` endpoint.
pub struct FacebookProvider {
    client: reqwest::Client,
    userinfo_url: String,
}

#[derive(Debug, Deserialize)]
struct FacebookUserInfo {
    id: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    email: Option<String>,
}

impl FacebookProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            userinfo_url: FACEBOOK_USERINFO_URL.to_string(),
        }
    }
}

impl Default for FacebookProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SocialProvider for FacebookProvider {
    fn account_type(&self) -> AccountType {
        AccountType::Facebook
    }

    async fn resolve_profile(&self, access_token: &str) -> Result<SocialProfile, AppError> {
        let response = self
            .client
            .get(&self.userinfo_url)
            .query(&[
                ("fields", "id,first_name,last_name,email"),
                ("access_token", access_token),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejected(AccountType::Facebook));
        }

        let info: FacebookUserInfo = response.json().await?;
        Ok(SocialProfile {
            first_name: info.first_name,
            last_name: info.last_name,
            email: info.email,
            external_id: info.id,
            provider: AccountType::Facebook,
        })
    }
}

/// Twitter strategy: validates the token against the v2 `/users/me` endpoint.
///
/// Twitter does not expose the account email through this endpoint unless the
/// app has elevated access, so `email` may be absent and the callback will
/// reject the login in that case.
pub struct TwitterProvider {
    client: reqwest::Client,
    userinfo_url: String,
}

#[derive(Debug, Deserialize)]
struct TwitterUserInfo {
    data: TwitterUserData,
}

#[derive(Debug, Deserialize)]
struct TwitterUserData {
    id: String,
    #[serde(default)]
    name: String,
    email: Option<String>,
}

impl TwitterProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            userinfo_url: TWITTER_USERINFO_URL.to_string(),
        }
    }
}

impl Default for TwitterProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SocialProvider for TwitterProvider {
    fn account_type(&self) -> AccountType {
        AccountType::Twitter
    }

    async fn resolve_profile(&self, access_token: &str) -> Result<SocialProfile, AppError> {
        let response = self
            .client
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejected(AccountType::Twitter));
        }

        let info: TwitterUserInfo = response.json().await?;
        // Twitter exposes a single display name; split it into the canonical
        // first/last shape on the first space.
        let mut parts = info.data.name.splitn(2, ' ');
        let first_name = parts.next().unwrap_or_default().to_string();
        let last_name = parts.next().unwrap_or_default().to_string();

        Ok(SocialProfile {
            first_name,
            last_name,
            email: info.data.email,
            external_id: info.data.id,
            provider: AccountType::Twitter,
        })
    }
}
