use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use maud::Markup;

use crate::{
    db::StudyBlock,
    extractors::CurrentUser,
    names,
    progress::{self, ProgressReport},
    rejections::{AppError, ResultExt},
    views, AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::PROGRESS_URL, get(progress_report))
        .route(names::PROGRESS_CSV_URL, get(export_csv))
        .route(names::PROGRESS_REPORT_URL, get(printable_report))
}

async fn build_report(
    state: &AppState,
    user_id: &str,
) -> Result<(Vec<StudyBlock>, ProgressReport), AppError> {
    let blocks = state
        .db
        .list_blocks(user_id, None, None)
        .await
        .reject("could not list blocks")?;
    let history = state
        .db
        .history(user_id)
        .await
        .reject("could not get history")?;

    let report = progress::report(&blocks, &history, &state.catalog);
    Ok((blocks, report))
}

async fn progress_report(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<ProgressReport>, AppError> {
    let (_, report) = build_report(&state, &user.id).await?;
    Ok(Json(report))
}

async fn export_csv(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let blocks = state
        .db
        .list_blocks(&user.id, None, None)
        .await
        .reject("could not list blocks")?;

    let body = progress::blocks_csv(&blocks, &state.catalog).reject("could not export blocks")?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"cronograma.csv\"",
            ),
        ],
        body,
    ))
}

async fn printable_report(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Markup, AppError> {
    let (blocks, report) = build_report(&state, &user.id).await?;

    Ok(views::report::progress_report(views::report::ReportData {
        user: &user,
        report: &report,
        blocks: &blocks,
        catalog: &state.catalog,
    }))
}
