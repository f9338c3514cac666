use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use crate::handlers::upload;
use crate::middleware::auth::auth_middleware;
use crate::state::AppState;

// Above the image cap so multipart framing never trips the limit first;
// oversized images must reach the handler's own size check.
const MAX_UPLOAD_BODY_BYTES: usize = 6 * 1024 * 1024;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/upload/image", post(upload::upload_image))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_BYTES))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/images/:file_name", get(upload::serve_image))
        .merge(protected)
}
