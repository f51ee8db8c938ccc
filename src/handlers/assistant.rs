use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;

use crate::{
    assistant::AssistantReply,
    names,
    rejections::{AppError, ResultExt},
    AppState,
};

const MAX_MESSAGE_LEN: usize = 4000;

pub fn routes() -> Router<AppState> {
    Router::new().route(names::ASSISTANT_URL, post(chat))
}

#[derive(Deserialize)]
struct ChatMessage {
    message: String,
}

async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatMessage>,
) -> Result<Json<AssistantReply>, AppError> {
    let message = body.message.trim();
    if message.is_empty() {
        return Err(AppError::Input("message is required"));
    }
    if message.chars().count() > MAX_MESSAGE_LEN {
        return Err(AppError::Input("message is too long"));
    }

    let reply = state
        .assistant
        .reply(message)
        .await
        .reject("assistant is unavailable")?;

    Ok(Json(reply))
}
