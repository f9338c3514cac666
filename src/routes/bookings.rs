use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::handlers::bookings;
use crate::middleware::auth::auth_middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(bookings::create_booking))
        .route("/", get(bookings::list_bookings))
        // Same listing; the client splits past from upcoming
        .route("/history", get(bookings::list_bookings))
        .route("/:id/cancel", put(bookings::cancel_booking))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
