use std::path::{Component, Path, PathBuf};

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::AreaCount,
    extractors::AdminGuard,
    import::{self, ImportError, ImportReport},
    names,
    rejections::{AppError, ResultExt},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::IMPORT_QUESTIONS_URL, post(import_questions))
        .route(names::QUESTION_STATS_URL, get(question_stats))
}

/// Resolves a file name inside the import directory. Anything other than a
/// single plain path component is refused.
fn source_path(import_dir: &Path, source: &str) -> Option<PathBuf> {
    let source = source.trim();
    let mut components = Path::new(source).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if !source.contains('\\') => {
            Some(import_dir.join(name))
        }
        _ => None,
    }
}

#[derive(Deserialize)]
struct ImportRequest {
    source: String,
}

async fn import_questions(
    _: AdminGuard,
    State(state): State<AppState>,
    Json(body): Json<ImportRequest>,
) -> Result<Json<ImportReport>, AppError> {
    let path = source_path(&state.config.import_dir, &body.source)
        .ok_or(AppError::Input("source must be a file name inside the import directory"))?;

    if !path.is_file() {
        tracing::warn!("import source {} does not exist", path.display());
        return Err(AppError::NotFound("import source not found"));
    }

    let loaded = tokio::task::spawn_blocking(move || import::load(&path))
        .await
        .reject("import task failed")?;

    let (rows, normalized) = match loaded {
        Ok(loaded) => loaded,
        Err(e @ (ImportError::UnsupportedFormat(_) | ImportError::MissingColumn(_))) => {
            return Err(AppError::Validation(e.to_string()))
        }
        Err(e) => {
            tracing::error!("could not read import source: {e}");
            return Err(AppError::Internal("could not read import source"));
        }
    };

    let outcome = state
        .db
        .replace_questions(&normalized.questions)
        .await
        .reject("could not write questions")?;

    let report = ImportReport::new(rows, &normalized, outcome.batches);
    tracing::info!(
        "imported {} questions from {} ({} removed, {} invalid, {} duplicates)",
        report.imported,
        body.source,
        outcome.removed,
        report.invalid,
        report.duplicates
    );

    Ok(Json(report))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuestionStats {
    total: i64,
    per_area: Vec<AreaCount>,
}

async fn question_stats(
    _: AdminGuard,
    State(state): State<AppState>,
) -> Result<Json<QuestionStats>, AppError> {
    let total = state
        .db
        .questions_count()
        .await
        .reject("could not count questions")?;
    let per_area = state
        .db
        .question_stats()
        .await
        .reject("could not get question stats")?;

    Ok(Json(QuestionStats { total, per_area }))
}
