use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::auth::extractor::ACCESS_COOKIE;
use crate::auth::jwt::{encode_token, Claims, TOKEN_TTL_MINUTES};
use crate::auth::password;
use crate::error::AppError;
use crate::state::SharedState;
use crate::submission::validate::FieldError;

const USERNAME_MIN_CHARS: usize = 3;
const PASSWORD_MIN_CHARS: usize = 6;

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub access_token: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn auth_cookie(access_token: &str) -> CookieJar {
    let access = Cookie::build((ACCESS_COOKIE, access_token.to_string()))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(TOKEN_TTL_MINUTES))
        .build();

    CookieJar::new().add(access)
}

fn clear_auth_cookie() -> CookieJar {
    let access = Cookie::build((ACCESS_COOKIE, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build();
    CookieJar::new().add(access)
}

fn check_login_fields(req: &LoginRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let username = req.username.trim();
    if username.is_empty() {
        errors.push(FieldError {
            field: "username".to_string(),
            message: "Username is required".to_string(),
        });
    } else if username.chars().count() < USERNAME_MIN_CHARS {
        errors.push(FieldError {
            field: "username".to_string(),
            message: format!("Username must be at least {USERNAME_MIN_CHARS} characters"),
        });
    }

    if req.password.is_empty() {
        errors.push(FieldError {
            field: "password".to_string(),
            message: "Password is required".to_string(),
        });
    } else if req.password.chars().count() < PASSWORD_MIN_CHARS {
        errors.push(FieldError {
            field: "password".to_string(),
            message: format!("Password must be at least {PASSWORD_MIN_CHARS} characters"),
        });
    }

    errors
}

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let errors = check_login_fields(&req);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }
    let username = req.username.trim();

    if state.login_limiter.check(username).is_err() {
        tracing::warn!(username, "Login blocked by rate limiter");
        return Err(AppError::RateLimited(
            "Too many login attempts. Please try again later.".to_string(),
        ));
    }

    let valid = password::check_admin(&state.config.admin, username, &req.password)
        .map_err(AppError::Internal)?;

    if !valid {
        state.login_limiter.record_failure(username);
        tracing::info!(username, "Failed admin login");
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }
    state.login_limiter.reset(username);

    let access_token =
        encode_token(&Claims::new(username), &state.config.jwt_secret).map_err(AppError::Internal)?;
    tracing::info!(username, "Admin logged in");

    Ok((auth_cookie(&access_token), Json(AuthResponse { access_token })))
}

pub async fn logout() -> (CookieJar, Json<MessageResponse>) {
    (clear_auth_cookie(), Json(MessageResponse {
        message: "Logged out successfully".to_string(),
    }))
}
