use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::{
    db::User,
    extractors::CurrentUser,
    names,
    rejections::{AppError, ResultExt},
    AppState,
};

const MAX_DISPLAY_NAME_LEN: usize = 80;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::USERS_URL, post(create_user))
        .route(names::CURRENT_USER_URL, get(current_user))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateUser {
    display_name: String,
}

async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUser>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let display_name = body.display_name.trim();
    if display_name.is_empty() {
        return Err(AppError::Input("displayName is required"));
    }
    if display_name.chars().count() > MAX_DISPLAY_NAME_LEN {
        return Err(AppError::Input("displayName is too long"));
    }

    let user = state
        .db
        .create_user(display_name)
        .await
        .reject("could not create user")?;

    Ok((StatusCode::CREATED, Json(user)))
}

async fn current_user(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}
