use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use dotenv::dotenv;
use sqlx::PgPool;

use inkhaven::auth::AuthMiddleware;
use inkhaven::config::Config;
use inkhaven::models::AccountType;
use inkhaven::routes;
use inkhaven::social::{MockProvider, SocialProfile, SocialProviders};

const CLIENT_URL: &str = "http://localhost:3000/auth/social";

fn test_config() -> Config {
    Config {
        database_url: "unused-in-tests".to_string(),
        server_port: 8080,
        server_host: "127.0.0.1".to_string(),
        client_callback_url: CLIENT_URL.to_string(),
    }
}

// A pool that never connects; used by tests whose requests are rejected
// before any query runs.
fn lazy_pool() -> PgPool {
    PgPool::connect_lazy("postgres://localhost/inkhaven_unreachable")
        .expect("lazy pool construction should not fail")
}

fn parse_token(location: &str) -> String {
    location
        .split("token=")
        .nth(1)
        .expect("redirect should carry a token")
        .split('&')
        .next()
        .unwrap()
        .to_string()
}

#[actix_rt::test]
async fn test_unknown_provider_is_not_found() {
    let providers = web::Data::new(SocialProviders::new());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(lazy_pool()))
            .app_data(providers)
            .app_data(web::Data::new(test_config()))
            .wrap(Logger::default())
            .service(web::scope("/api").configure(routes::config)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/auth/github/callback?access_token=whatever")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_missing_or_invalid_access_token_is_unauthorized() {
    let providers = web::Data::new(
        SocialProviders::new().with(Arc::new(MockProvider::new(AccountType::Google))),
    );
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(lazy_pool()))
            .app_data(providers)
            .app_data(web::Data::new(test_config()))
            .wrap(Logger::default())
            .service(web::scope("/api").configure(routes::config)),
    )
    .await;

    // No access token presented
    let req = test::TestRequest::get()
        .uri("/api/auth/google/callback")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);

    // A token the provider rejects
    let req = test::TestRequest::get()
        .uri("/api/auth/google/callback?access_token=wronggoogleauthtoken")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Unauthorized");
}

#[actix_rt::test]
async fn test_profile_without_email_is_an_internal_error() {
    let providers = web::Data::new(
        SocialProviders::new()
            .with(Arc::new(MockProvider::new(AccountType::Twitter).with_email(None))),
    );
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(lazy_pool()))
            .app_data(providers)
            .app_data(web::Data::new(test_config()))
            .wrap(Logger::default())
            .service(web::scope("/api").configure(routes::config)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/auth/twitter/callback?access_token=twitterauthtoken")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        resp.status(),
        actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
    );
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Internal server error");
}

// Requires a Postgres instance reachable through DATABASE_URL with the
// migrations applied; run with `cargo test -- --ignored`.
#[ignore]
#[actix_rt::test]
async fn test_social_signup_signin_and_cross_provider_rejection() {
    dotenv().ok();
    std::env::set_var("JWT_SECRET", "integration_test_secret");
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test DB");

    let email = "social_login@example.com";
    let _ = sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(email)
        .execute(&pool)
        .await;

    // Google and Facebook mocks that resolve to the same email, to exercise
    // the cross-provider takeover rejection.
    let google = MockProvider::new(AccountType::Google).with_profile(SocialProfile {
        first_name: "Social".to_string(),
        last_name: "User".to_string(),
        email: Some(email.to_string()),
        external_id: "google-ext-1".to_string(),
        provider: AccountType::Google,
    });
    let facebook = MockProvider::new(AccountType::Facebook).with_profile(SocialProfile {
        first_name: "Social".to_string(),
        last_name: "User".to_string(),
        email: Some(email.to_string()),
        external_id: "facebook-ext-1".to_string(),
        provider: AccountType::Facebook,
    });
    let providers = web::Data::new(
        SocialProviders::new()
            .with(Arc::new(google))
            .with(Arc::new(facebook)),
    );

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(providers)
            .app_data(web::Data::new(test_config()))
            .wrap(Logger::default())
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            ),
    )
    .await;

    // First login creates the account and redirects with a token.
    let req = test::TestRequest::get()
        .uri("/api/auth/google/callback?access_token=googleauthtoken")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::FOUND);
    let location = resp
        .headers()
        .get("Location")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(location.starts_with(&format!("{}?token=", CLIENT_URL)));
    let first_token = parse_token(&location);
    let first_user = inkhaven::auth::verify_token(&first_token).unwrap().sub;

    // Replaying the same token signs in the same user.
    let req = test::TestRequest::get()
        .uri("/api/auth/google/callback?access_token=googleauthtoken")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::FOUND);
    let location = resp
        .headers()
        .get("Location")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let replayed_token = parse_token(&location);
    let replayed_user = inkhaven::auth::verify_token(&replayed_token).unwrap().sub;
    assert_eq!(first_user, replayed_user);

    // The token works against a protected route; no articles exist yet, and
    // an empty result set is a 404 by design.
    let req = test::TestRequest::get()
        .uri("/api/articles")
        .append_header(("Authorization", format!("Bearer {}", first_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Article Not found!");

    // The same email through a different provider redirects with an error
    // flag, never a token.
    let req = test::TestRequest::get()
        .uri("/api/auth/facebook/callback?access_token=facebookauthtoken")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::FOUND);
    let location = resp
        .headers()
        .get("Location")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(location.starts_with(&format!("{}?error=", CLIENT_URL)));
    assert!(!location.contains("token="));

    let _ = sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(email)
        .execute(&pool)
        .await;
}
