pub mod assistant;
pub mod catalog;
pub mod config;
pub mod db;
pub mod extractors;
pub mod handlers;
pub mod import;
pub mod models;
pub mod names;
pub mod planner;
pub mod practice;
pub mod progress;
pub mod rejections;
pub mod utils;
pub mod views;

use std::sync::Arc;
use std::time::Instant;

use axum::{middleware, Router};

use crate::{assistant::Assistant, catalog::Catalog, config::Config};

#[derive(Clone)]
pub struct AppState {
    pub db: db::Db,
    pub catalog: Arc<Catalog>,
    pub config: Arc<Config>,
    pub assistant: Assistant,
}

impl AppState {
    pub fn new(db: db::Db, config: Config) -> color_eyre::Result<Self> {
        let catalog = Catalog::seed()?;
        let assistant = Assistant::new(config.llm.clone())?;

        Ok(Self {
            db,
            catalog: Arc::new(catalog),
            config: Arc::new(config),
            assistant,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::users::routes())
        .merge(handlers::catalog::routes())
        .merge(handlers::schedule::routes())
        .merge(handlers::blocks::routes())
        .merge(handlers::practice::routes())
        .merge(handlers::progress::routes())
        .merge(handlers::assistant::routes())
        .merge(handlers::admin::routes())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn log_request(
    req: axum::http::Request<axum::body::Body>,
    next: middleware::Next,
) -> axum::response::Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(req).await;

    tracing::debug!(
        "{method} {path} -> {} in {}ms",
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}
