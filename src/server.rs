use std::sync::Arc;

use anyhow::Context;
use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::cache::DocumentCache;
use crate::config::ServerConfig;
use crate::query::{TimelineParams, TimelineQuery};
use crate::resolver;

/// Fixed body returned for every failed resolution, mirroring the upstream
/// timeline server's NotFoundException payload. The client only ever sees
/// this; the actual cause is logged server-side.
pub const ERROR_RESPONSE: &str = "{\"exception\":\"NotFoundException\",\"message\":\"java.lang.Exception: Timeline entity { id: dag_1415292900390_0001_11.hh, type: TEZ_DAG_ID } is not found\",\"javaClassName\":\"org.apache.hadoop.yarn.webapp.NotFoundException\"}";

#[derive(Clone)]
pub struct AppState {
    cache: DocumentCache,
    config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            cache: DocumentCache::new(),
            config: Arc::new(config),
        }
    }
}

/// Builds the router: a single catch-all route over the data root, CORS
/// pinned to the configured UI origin with credentials, and request
/// tracing.
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let origin: HeaderValue = state
        .config
        .ui_origin
        .parse()
        .with_context(|| format!("invalid UI origin: {}", state.config.ui_origin))?;

    let cors = CorsLayer::new()
        .allow_methods(AllowMethods::list(vec![Method::GET, Method::OPTIONS]))
        .allow_origin(AllowOrigin::exact(origin))
        .allow_headers(AllowHeaders::list(vec![
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
        ]))
        .allow_credentials(true);

    Ok(Router::new()
        .fallback(serve_timeline)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

async fn serve_timeline(
    State(state): State<AppState>,
    uri: Uri,
    Query(params): Query<TimelineParams>,
) -> Response {
    let request_path = state
        .config
        .data_root
        .join(uri.path().trim_start_matches('/'));
    let query = TimelineQuery::from(params);

    match resolver::resolve(&state.cache, request_path.clone(), query).await {
        Ok(payload) => {
            info!(path = %request_path.display(), "resolved timeline request");
            Json(payload).into_response()
        }
        Err(err) => {
            warn!(path = %request_path.display(), %err, "timeline request failed");
            (
                StatusCode::NOT_FOUND,
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                )],
                ERROR_RESPONSE,
            )
                .into_response()
        }
    }
}
