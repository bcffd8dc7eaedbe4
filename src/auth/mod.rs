pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

// Re-export necessary items
pub use extractors::AuthenticatedUserId;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{generate_token, verify_token, Claims};

/// Represents the payload for a signin request.
#[derive(Debug, Deserialize, Validate)]
pub struct SigninRequest {
    /// User's email address. Must be a valid email format.
    #[validate(email)]
    pub email: String,
    /// User's password. Must be at least 8 characters long.
    #[validate(length(min = 8))]
    pub password: String,
}

impl SigninRequest {
    /// Trims surrounding whitespace from all string inputs.
    pub fn trimmed(&self) -> Self {
        Self {
            email: self.email.trim().to_string(),
            password: self.password.trim().to_string(),
        }
    }
}

/// Represents the payload for a new user signup request.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// User's first name.
    #[validate(length(min = 1, max = 50))]
    pub firstname: String,
    /// User's last name.
    #[validate(length(min = 1, max = 50))]
    pub lastname: String,
    /// Email address for the new account. Must be a valid email format.
    #[validate(email)]
    pub email: String,
    /// Password for the new account. Must be at least 8 characters long.
    #[validate(length(min = 8))]
    pub password: String,
}

impl SignupRequest {
    /// Trims surrounding whitespace from all string inputs.
    pub fn trimmed(&self) -> Self {
        Self {
            firstname: self.firstname.trim().to_string(),
            lastname: self.lastname.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.trim().to_string(),
        }
    }
}

/// Response structure after successful authentication (signin or signup).
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    /// The JWT for session authentication.
    pub token: String,
}
