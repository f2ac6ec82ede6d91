//! Router configuration.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer, compression::CompressionLayer, services::ServeDir,
    trace::TraceLayer,
};

use super::handlers::{
    delete_file, files_page, list_files, upload_file, upload_page, AppState,
};
use super::middleware::{basic_auth, handle_panic};

/// Room for multipart boundaries and the description field on top of the file itself.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Create the main router.
///
/// Everything except `/uploads/*` and `/health` requires Basic credentials.
pub fn create_router(app_state: Arc<AppState>, upload_dir: impl AsRef<Path>) -> Router {
    let body_limit = usize::try_from(app_state.max_file_size)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);

    let protected = Router::new()
        .route("/upload", get(upload_page).post(upload_file))
        .route("/files", get(files_page))
        .route("/api/files", get(list_files))
        .route("/api/files/:filename", delete(delete_file))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), basic_auth))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(app_state);

    Router::new()
        .merge(protected)
        .merge(create_health_router())
        .nest_service("/uploads", ServeDir::new(upload_dir.as_ref()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(CompressionLayer::new()),
        )
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

async fn health_check() -> &'static str {
    "OK"
}
