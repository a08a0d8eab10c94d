//! HTTP surface: health probe, streaming summarize endpoint and model lists.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures::StreamExt;
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use yt_transcript::TranscriptApi;

use crate::{
    models::{ModelCatalog, ModelProvider},
    types::SummarizeRequest,
    ProviderSelector, SummaryPipeline,
};

pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

struct AppState<T, P>
where
    T: TranscriptApi + Send + Sync + 'static,
    P: ProviderSelector + Send + Sync + 'static,
{
    pipeline: Arc<SummaryPipeline<T, P>>,
    catalog: Arc<ModelCatalog>,
}

// derive(Clone) would demand T: Clone and P: Clone
impl<T, P> Clone for AppState<T, P>
where
    T: TranscriptApi + Send + Sync + 'static,
    P: ProviderSelector + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
            catalog: Arc::clone(&self.catalog),
        }
    }
}

pub fn router<T, P>(pipeline: Arc<SummaryPipeline<T, P>>, catalog: Arc<ModelCatalog>) -> Router
where
    T: TranscriptApi + Send + Sync + 'static,
    P: ProviderSelector + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/api/summarize", post(summarize::<T, P>))
        .route("/api/models/{provider}", get(models::<T, P>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState { pipeline, catalog })
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn summarize<T, P>(
    State(state): State<AppState<T, P>>,
    Json(request): Json<SummarizeRequest>,
) -> Response
where
    T: TranscriptApi + Send + Sync + 'static,
    P: ProviderSelector + Send + Sync + 'static,
{
    tracing::info!(url = %request.url, provider = ?request.provider(), "Summarize request");

    let lines = state
        .pipeline
        .stream(request)
        .map(|event| event.to_ndjson());

    ([(header::CONTENT_TYPE, NDJSON_CONTENT_TYPE)], Body::from_stream(lines)).into_response()
}

async fn models<T, P>(
    State(state): State<AppState<T, P>>,
    Path(provider): Path<String>,
) -> Response
where
    T: TranscriptApi + Send + Sync + 'static,
    P: ProviderSelector + Send + Sync + 'static,
{
    match provider.parse::<ModelProvider>() {
        Ok(provider) => {
            let models = state.catalog.list(provider).await;
            Json(json!({ "models": models })).into_response()
        }
        Err(detail) => (StatusCode::BAD_REQUEST, Json(json!({ "detail": detail }))).into_response(),
    }
}
