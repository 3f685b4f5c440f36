use std::sync::Arc;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bn_core::{Cluster, Error};
use bn_feeds::fetch_all;
use bn_news::{normalize, Evaluation};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};
use crate::AppState;

pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("❌ Request failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "ok": false, "error": self.0.to_string() })),
        )
            .into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BreakingQuery {
    /// Report without saving the snapshot or retaining clusters.
    #[serde(default)]
    pub dry_run: bool,
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

pub async fn list_clusters(State(state): State<Arc<AppState>>) -> Json<Vec<Cluster>> {
    let items = normalize(fetch_all(&state.fetchers).await);
    Json(state.pipeline.cluster(items).await)
}

pub async fn check_breaking(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BreakingQuery>,
) -> Result<Json<Value>, ApiError> {
    let raw = fetch_all(&state.fetchers).await;
    let last = state.store.latest().await?;
    let last_titles = last.as_ref().map(|s| s.titles.as_slice());

    let report = match state.pipeline.evaluate(raw, state.retained().await, last_titles).await {
        Evaluation::Unchanged(change) => {
            return Ok(Json(json!({ "ok": true, "breaking": false, "reason": "unchanged", "change": change })));
        }
        Evaluation::Evaluated(report) => report,
    };

    if !report.is_breaking() {
        return Ok(Json(json!({ "ok": true, "breaking": false, "reason": "no-breaking" })));
    }

    let reported: Vec<Cluster> = report.breaking_clusters().cloned().collect();
    if !query.dry_run {
        state.store.save(&report.headline_snapshot()).await?;
        state.remember(reported.clone(), report.retained.clone()).await;
        info!("💾 Saved headline snapshot ({} titles)", report.headlines.len());
    }

    Ok(Json(json!({
        "ok": true,
        "breaking": true,
        "decisions": report.breaking,
        "clusters": reported,
    })))
}
