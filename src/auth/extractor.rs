use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use crate::auth::jwt;
use crate::error::AppError;
use crate::state::SharedState;

pub const ACCESS_COOKIE: &str = "access_token";

/// An authenticated dashboard user.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub username: String,
}

impl FromRequestParts<SharedState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        // Try Bearer token from Authorization header first
        if let Some(auth_header) = parts.headers.get("authorization") {
            let auth_str = auth_header
                .to_str()
                .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return admin_from_token(token, state);
            }
        }

        // Try cookie-based auth
        let jar = CookieJar::from_headers(&parts.headers);
        if let Some(cookie) = jar.get(ACCESS_COOKIE) {
            return admin_from_token(cookie.value(), state);
        }

        Err(AppError::Unauthorized(
            "Missing authentication token".to_string(),
        ))
    }
}

fn admin_from_token(token: &str, state: &SharedState) -> Result<AdminUser, AppError> {
    let claims = jwt::decode_token(token, &state.config.jwt_secret)
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

    // A token minted for a since-renamed admin is no longer valid.
    if claims.sub != state.config.admin.username {
        return Err(AppError::Unauthorized("Invalid or expired token".to_string()));
    }

    Ok(AdminUser {
        username: claims.sub,
    })
}
