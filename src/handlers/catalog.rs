use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::{
    catalog::{Discipline, Level},
    names,
    rejections::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::DISCIPLINES_URL, get(list_disciplines))
        .route(names::DISCIPLINE_URL, get(get_discipline))
}

#[derive(Deserialize)]
struct CatalogQuery {
    level: Option<Level>,
    tag: Option<String>,
}

async fn list_disciplines(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Json<Vec<Discipline>> {
    let tag = query.tag.as_deref().map(str::trim).filter(|t| !t.is_empty());
    let disciplines = state
        .catalog
        .filter(query.level, tag)
        .into_iter()
        .cloned()
        .collect();

    Json(disciplines)
}

async fn get_discipline(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Discipline>, AppError> {
    state
        .catalog
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(AppError::NotFound("discipline not found"))
}
