use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::{db::User, names, rejections::AppError, AppState};

/// Guard extractor that resolves the `x-user-id` header to a stored user.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(user_id) = parts
            .headers
            .get(names::USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
        else {
            return Err(AppError::Unauthorized);
        };

        match state.db.get_user(user_id).await {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) => Err(AppError::Unauthorized),
            Err(e) => {
                tracing::error!("could not look up user {user_id}: {e}");
                Err(AppError::Internal("could not look up user"))
            }
        }
    }
}

/// Guard extractor for the admin routes. Requires a bearer token matching
/// the configured admin token; with no token configured nothing gets in.
pub struct AdminGuard;

impl FromRequestParts<AppState> for AdminGuard {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config.admin_token.as_deref() else {
            return Err(AppError::Forbidden);
        };

        let provided = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim);

        match provided {
            Some(token) if token == expected => Ok(AdminGuard),
            _ => Err(AppError::Unauthorized),
        }
    }
}
