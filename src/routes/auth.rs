// SPDX-License-Identifier: MIT

//! Email/password authentication routes.

use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, SESSION_COOKIE, SESSION_TTL_SECS};
use crate::models::{Credentials, Currency, User};
use crate::routes::api::UserResponse;
use crate::services::password;
use crate::time_utils::{format_utc_rfc3339, truncate_to_second};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

/// Signup form payload.
#[derive(Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[validate(range(min = 1, message = "average cigarettes per day must be positive"))]
    pub avg_cigarettes_per_day: u32,
    #[validate(range(min = 1, message = "cigarettes per pack must be positive"))]
    pub cigarettes_per_pack: u32,
    #[validate(range(min = 0.0, message = "price per pack cannot be negative"))]
    pub price_per_pack: f64,
    pub currency: Currency,
}

/// Login form payload.
#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Successful auth response: session token plus the profile.
#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Create an account: credentials plus the initial profile document.
async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<SignupRequest>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    payload.validate()?;

    let email = payload.email.trim().to_lowercase();

    if state.db.get_credentials_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("email is already registered".to_string()));
    }

    let user_id = uuid::Uuid::new_v4().to_string();
    let now = truncate_to_second(chrono::Utc::now());
    let now_str = format_utc_rfc3339(now);

    let hashed = password::hash_password(&payload.password)?;
    let credentials = Credentials {
        user_id: user_id.clone(),
        email: email.clone(),
        password_salt: hashed.salt,
        password_hash: hashed.hash,
    };

    let user = User {
        user_id: user_id.clone(),
        name: payload.name.trim().to_string(),
        email,
        avg_cigarettes_per_day: payload.avg_cigarettes_per_day,
        cigarettes_per_pack: payload.cigarettes_per_pack,
        price_per_pack: payload.price_per_pack,
        currency: payload.currency,
        created_at: now_str.clone(),
        updated_at: now_str,
    };

    // Credentials first: a profile without credentials is unreachable,
    // but credentials without a profile would break login.
    state.db.set_credentials(&credentials).await?;
    state.db.upsert_user(&user).await?;

    tracing::info!(user_id = %user.user_id, "Account created");

    let token = create_jwt(&user.user_id, &state.config.jwt_signing_key)?;
    let jar = jar.add(session_cookie(&state, token.clone()));

    Ok((
        jar,
        Json(AuthResponse {
            token,
            user: UserResponse::from(user),
        }),
    ))
}

/// Sign in with email and password.
///
/// Unknown email and wrong password return the same 401 so responses do
/// not reveal which addresses have accounts.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    payload.validate()?;

    let email = payload.email.trim().to_lowercase();

    let credentials = state
        .db
        .get_credentials_by_email(&email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !password::verify_password(
        &payload.password,
        &credentials.password_salt,
        &credentials.password_hash,
    ) {
        return Err(AppError::Unauthorized);
    }

    let user = state
        .db
        .get_user(&credentials.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "credentials exist without a profile for user {}",
                credentials.user_id
            ))
        })?;

    tracing::info!(user_id = %user.user_id, "User signed in");

    let token = create_jwt(&user.user_id, &state.config.jwt_signing_key)?;
    let jar = jar.add(session_cookie(&state, token.clone()));

    Ok((
        jar,
        Json(AuthResponse {
            token,
            user: UserResponse::from(user),
        }),
    ))
}

/// Logout response body.
#[derive(Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Sign out: clear the session cookie.
///
/// Bearer-token clients just drop their token; nothing is stored
/// server-side.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<LogoutResponse>) {
    let jar = jar.add(removal_cookie(&state));
    (jar, Json(LogoutResponse { success: true }))
}

/// Build the session cookie with attributes matching the deployment.
fn session_cookie(state: &Arc<AppState>, token: String) -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(SESSION_TTL_SECS as i64))
        .build();

    if is_secure_deployment(state) {
        cookie.set_secure(true);
    }

    cookie
}

/// Build the expired cookie used to clear the session on logout.
///
/// Removal attributes must match the creation attributes or browsers
/// keep the original cookie.
fn removal_cookie(state: &Arc<AppState>) -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::ZERO)
        .build();

    if is_secure_deployment(state) {
        cookie.set_secure(true);
    }

    cookie
}

fn is_secure_deployment(state: &Arc<AppState>) -> bool {
    !state.config.frontend_url.starts_with("http://localhost")
        && !state.config.frontend_url.starts_with("http://127.0.0.1")
}
