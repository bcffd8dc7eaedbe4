use crate::{
    auth::{
        generate_token, hash_password, verify_password, AuthResponse, SigninRequest, SignupRequest,
    },
    config::Config,
    error::AppError,
    models::AccountType,
    social::{SocialProfile, SocialProviders},
};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

/// Register a new user
///
/// Trims all string inputs, rejects an email that is already registered, and
/// returns a session token for the new account.
#[post("/signup")]
pub async fn signup(
    pool: web::Data<PgPool>,
    signup_data: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    let signup_data = signup_data.trimmed();
    signup_data.validate()?;

    let existing_user = sqlx::query_scalar::<_, i32>("SELECT id FROM users WHERE email = $1")
        .bind(&signup_data.email)
        .fetch_optional(&**pool)
        .await?;

    if existing_user.is_some() {
        return Err(AppError::Conflict("Email is in use".into()));
    }

    let password_hash = hash_password(&signup_data.password)?;

    let user_id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO users (first_name, last_name, email, password, account_type)
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(&signup_data.firstname)
    .bind(&signup_data.lastname)
    .bind(&signup_data.email)
    .bind(&password_hash)
    .bind(AccountType::Local)
    .fetch_one(&**pool)
    .await?;

    let token = generate_token(user_id)?;

    Ok(HttpResponse::Created().json(AuthResponse {
        message: "Successfully created your account".to_string(),
        token,
    }))
}

/// Sign in a user
///
/// Authenticates local credentials and returns a session token. A missing
/// account and a wrong password produce the same response, so the caller
/// learns nothing about which field was wrong.
#[post("/signin")]
pub async fn signin(
    pool: web::Data<PgPool>,
    signin_data: web::Json<SigninRequest>,
) -> Result<impl Responder, AppError> {
    let signin_data = signin_data.trimmed();
    signin_data.validate()?;

    let user = sqlx::query_as::<_, (i32, String)>(
        "SELECT id, password FROM users WHERE email = $1",
    )
    .bind(&signin_data.email)
    .fetch_optional(&**pool)
    .await?;

    match user {
        Some((user_id, password_hash)) => {
            if verify_password(&signin_data.password, &password_hash)? {
                let token = generate_token(user_id)?;
                Ok(HttpResponse::Ok().json(AuthResponse {
                    message: "Successfully signed in".to_string(),
                    token,
                }))
            } else {
                Err(AppError::Unauthorized("Incorrect email or password".into()))
            }
        }
        None => Err(AppError::Unauthorized("Incorrect email or password".into())),
    }
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub access_token: Option<String>,
}

/// Social login callback
///
/// Exchanges a provider access token for a canonical profile, then either
/// signs the user in, creates the account on first login, or rejects the
/// attempt. Success and the cross-provider conflict both redirect to the
/// configured client URL, carrying the token or an error flag as a query
/// parameter; an invalid upstream token is a plain 401 and a profile without
/// a usable email is a 500.
#[get("/{provider}/callback")]
pub async fn social_callback(
    pool: web::Data<PgPool>,
    providers: web::Data<SocialProviders>,
    config: web::Data<Config>,
    provider: web::Path<String>,
    query: web::Query<CallbackQuery>,
) -> Result<HttpResponse, AppError> {
    let account_type = AccountType::from_provider(&provider)
        .ok_or_else(|| AppError::NotFound(format!("Unknown provider: {}", provider)))?;

    let strategy = providers.get(account_type).ok_or_else(|| {
        AppError::InternalServerError(format!("No strategy configured for {}", account_type))
    })?;

    let access_token = query
        .access_token
        .as_deref()
        .ok_or_else(|| AppError::Unauthorized("Unauthorized".into()))?;

    let profile = strategy.resolve_profile(access_token).await?;

    let login = resolve_social_user(&pool, &profile).await?;
    match login {
        SocialLogin::Accepted(token) => Ok(redirect(&format!(
            "{}?token={}",
            config.client_callback_url, token
        ))),
        SocialLogin::Rejected => Ok(redirect(&format!(
            "{}?error=account_in_use",
            config.client_callback_url
        ))),
    }
}

enum SocialLogin {
    Accepted(String),
    Rejected,
}

/// Finds or creates the user a resolved profile belongs to.
///
/// The email canonically identifies the user regardless of origin: an email
/// already registered under a different account type is rejected rather than
/// silently merged, preventing cross-provider account takeover.
async fn resolve_social_user(
    pool: &PgPool,
    profile: &SocialProfile,
) -> Result<SocialLogin, AppError> {
    let email = match profile.email.as_deref() {
        Some(email) if !email.trim().is_empty() => email,
        _ => return Err(AppError::InternalServerError("Internal server error".into())),
    };

    let existing = sqlx::query_as::<_, (i32, AccountType)>(
        "SELECT id, account_type FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    let user_id = match existing {
        Some((_, account_type)) if account_type != profile.provider => {
            return Ok(SocialLogin::Rejected);
        }
        Some((user_id, _)) => user_id,
        None => {
            // First social login: the external profile id stands in for a
            // password and goes through the same hash as local credentials.
            let password_hash = hash_password(&profile.external_id)?;
            sqlx::query_scalar::<_, i32>(
                "INSERT INTO users (first_name, last_name, email, password, account_type)
                 VALUES ($1, $2, $3, $4, $5) RETURNING id",
            )
            .bind(&profile.first_name)
            .bind(&profile.last_name)
            .bind(email)
            .bind(&password_hash)
            .bind(profile.provider)
            .fetch_one(pool)
            .await?
        }
    };

    Ok(SocialLogin::Accepted(generate_token(user_id)?))
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .append_header(("Location", location))
        .finish()
}
