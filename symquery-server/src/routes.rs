//! HTTP routes for the query service.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use std::time::Duration;
use symquery_intent::{respond, Envelope, QueryError};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Per-request settings shared with the handlers.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Wall-clock budget for one query's classification and engine work.
    pub budget: Duration,
}

/// Builds the application router.
pub fn app(config: AppConfig) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/solve", post(solve))
        .with_state(config)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn index() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

#[derive(Debug, Deserialize)]
struct SolveRequest {
    #[serde(default)]
    query: String,
}

/// `POST /solve`: runs the full query pipeline inside a blocking task under the
/// configured time budget.
///
/// Status codes: 200 for a successful envelope, 400 for a missing or empty query
/// (checked before any classification), 422 for every pipeline failure including a
/// blown budget.
async fn solve(
    State(config): State<AppConfig>,
    Json(request): Json<SolveRequest>,
) -> (StatusCode, Json<Envelope>) {
    let query = request.query;
    if query.trim().is_empty() {
        let envelope = Envelope::failure(&QueryError::EmptyQuery);
        return (StatusCode::BAD_REQUEST, Json(envelope));
    }

    let work = tokio::task::spawn_blocking(move || respond(&query));
    let envelope = match tokio::time::timeout(config.budget, work).await {
        Ok(Ok(envelope)) => envelope,
        Ok(Err(join_err)) => {
            warn!(error = %join_err, "query task failed");
            Envelope::failure(&QueryError::Computation("internal failure".into()))
        },
        Err(_) => {
            warn!(budget = ?config.budget, "query exceeded the time budget");
            Envelope::failure(&QueryError::Computation(format!(
                "computation exceeded the {}s budget",
                config.budget.as_secs(),
            )))
        },
    };

    let status = if envelope.ok {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    (status, Json(envelope))
}
