use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;

use crate::{
    catalog::Catalog,
    extractors::CurrentUser,
    names,
    planner::{self, GeneratedPlan, PlanSettings},
    rejections::{AppError, ResultExt},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::GENERATE_SCHEDULE_URL, post(generate_schedule))
        .route(names::SCHEDULE_URL, post(replace_schedule))
}

/// Names disciplines from the catalog where the request left them out, then
/// runs the generator for today.
fn build_plan(catalog: &Catalog, mut settings: PlanSettings) -> Result<GeneratedPlan, AppError> {
    for d in &mut settings.disciplines {
        if d.name.is_none() {
            d.name = catalog.get(&d.id).map(|c| c.name.clone());
        }
    }

    planner::generate(&settings, Utc::now().date_naive())
        .map_err(|e| AppError::Validation(e.to_string()))
}

async fn generate_schedule(
    State(state): State<AppState>,
    Json(settings): Json<PlanSettings>,
) -> Result<Json<GeneratedPlan>, AppError> {
    let plan = build_plan(&state.catalog, settings)?;
    tracing::debug!("generated {} blocks", plan.summary.total);
    Ok(Json(plan))
}

async fn replace_schedule(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(settings): Json<PlanSettings>,
) -> Result<Json<GeneratedPlan>, AppError> {
    let plan = build_plan(&state.catalog, settings)?;

    state
        .db
        .replace_blocks(&user.id, &plan.blocks)
        .await
        .reject("could not save schedule")?;

    Ok(Json(plan))
}
