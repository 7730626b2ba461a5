//! Route table, CORS and request logging.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers;
use crate::state::ServerState;

/// Builds the application router.
///
/// `/health` and `/static` are matched before `/{slug}`, so those two names
/// cannot be used as slugs. `/api/assistente/{slug}` has three segments and
/// never overlaps the slug routes.
pub fn app(state: Arc<ServerState>, static_dir: &Path) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
                version = ?req.version(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    let api_routes = Router::new()
        .route("/{slug}/api/signed-url", get(handlers::assistant::signed_url))
        .route("/{slug}/api/getAgentId", get(handlers::assistant::agent_id))
        .route("/{slug}", get(handlers::assistant::get))
        .route("/api/assistente/{slug}", get(handlers::assistant::profile))
        .layer(trace_layer);

    Router::new()
        .merge(api_routes)
        .route("/health", get(handlers::health))
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(cors_layer())
        .with_state(state)
}

/// Any origin, method and header, with credentials. A literal `*` is not
/// allowed together with credentials, so the request values are mirrored.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
