use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::handlers::favorites;
use crate::middleware::auth::auth_middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(favorites::list_favorites))
        .route("/", post(favorites::add_favorite))
        .route("/:gym_id", delete(favorites::remove_favorite))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
