use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use frameline_store::ContentStore;

use crate::handler;

/// Uploads larger than this are rejected at the body layer.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Build the axum router over a shared content store.
///
/// Unhandled methods on these routes answer 405 via axum's method routing.
pub fn build_router(store: Arc<ContentStore>) -> Router {
    Router::new()
        .route("/photos/list", get(handler::list_photos))
        .route(
            "/photos/:hash",
            get(handler::download_photo)
                .post(handler::upload_photo)
                .delete(handler::delete_photo),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}
