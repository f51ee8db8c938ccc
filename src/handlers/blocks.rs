use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, patch},
    Json, Router,
};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::{
    db::{NewBlock, StudyBlock},
    extractors::CurrentUser,
    names,
    planner::BlockKind,
    rejections::{AppError, ResultExt},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::BLOCKS_URL, get(list_blocks).post(create_block))
        .route(names::BLOCK_URL, delete(delete_block))
        .route(names::TOGGLE_BLOCK_URL, patch(toggle_block))
        .route(names::MOVE_BLOCK_URL, patch(move_block))
}

/// Accepts `HH:MM` as well as `HH:MM:SS`.
fn parse_time(value: &str) -> Result<NaiveTime, AppError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .reject_input("times must look like HH:MM")
}

#[derive(Deserialize)]
struct Range {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

async fn list_blocks(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Query(range): Query<Range>,
) -> Result<Json<Vec<StudyBlock>>, AppError> {
    let blocks = state
        .db
        .list_blocks(&user.id, range.from, range.to)
        .await
        .reject("could not list blocks")?;

    Ok(Json(blocks))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBlock {
    discipline_id: String,
    title: Option<String>,
    date: NaiveDate,
    start_time: String,
    end_time: String,
    #[serde(default)]
    kind: Option<BlockKind>,
    #[serde(default)]
    pomodoros: Option<u32>,
}

async fn create_block(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<CreateBlock>,
) -> Result<(StatusCode, Json<StudyBlock>), AppError> {
    let discipline_id = body.discipline_id.trim().to_string();
    if discipline_id.is_empty() {
        return Err(AppError::Input("disciplineId is required"));
    }

    let start_time = parse_time(&body.start_time)?;
    let end_time = parse_time(&body.end_time)?;
    if start_time >= end_time {
        return Err(AppError::Input("startTime must be before endTime"));
    }

    let pomodoros = body.pomodoros.unwrap_or(1);
    if pomodoros < 1 {
        return Err(AppError::Input("pomodoros must be at least 1"));
    }

    let title = body
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| format!("Estudo: {}", state.catalog.name_of(&discipline_id)));

    let block = state
        .db
        .create_block(
            &user.id,
            NewBlock {
                discipline_id,
                title,
                date: body.date,
                start_time,
                end_time,
                kind: body.kind.unwrap_or(BlockKind::Study),
                pomodoros,
            },
        )
        .await
        .reject("could not create block")?;

    Ok((StatusCode::CREATED, Json(block)))
}

async fn toggle_block(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StudyBlock>, AppError> {
    state
        .db
        .toggle_block(&user.id, &id)
        .await
        .reject("could not toggle block")?
        .map(Json)
        .ok_or(AppError::NotFound("block not found"))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoveBlock {
    date: NaiveDate,
    start_time: String,
}

async fn move_block(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<MoveBlock>,
) -> Result<Json<StudyBlock>, AppError> {
    let start_time = parse_time(&body.start_time)?;

    let block = state
        .db
        .get_block(&user.id, &id)
        .await
        .reject("could not get block")?
        .ok_or(AppError::NotFound("block not found"))?;

    // The block keeps its duration and must still end on the same day.
    let duration = block.end_time - block.start_time;
    let (end_time, wrapped) = start_time.overflowing_add_signed(duration);
    if wrapped != 0 || end_time <= start_time {
        return Err(AppError::Input("block must end on the same day it starts"));
    }

    state
        .db
        .move_block(&user.id, &id, body.date, start_time, end_time)
        .await
        .reject("could not move block")?
        .map(Json)
        .ok_or(AppError::NotFound("block not found"))
}

async fn delete_block(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let deleted = state
        .db
        .delete_block(&user.id, &id)
        .await
        .reject("could not delete block")?;

    if !deleted {
        return Err(AppError::NotFound("block not found"));
    }

    tracing::info!("block {id} deleted by user_id={}", user.id);
    Ok(StatusCode::NO_CONTENT)
}
