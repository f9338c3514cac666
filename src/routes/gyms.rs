use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{gyms, reviews, time_slots, trainers};
use crate::middleware::auth::auth_middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(gyms::create_gym))
        .route("/:id", put(gyms::update_gym))
        .route("/:id", delete(gyms::delete_gym))
        .route("/owner/mine", get(gyms::owned_gyms))
        .route("/:id/stats", get(gyms::gym_stats))
        .route("/:id/slots", post(time_slots::add_time_slot))
        .route("/:id/slots/:slot_id", delete(time_slots::delete_time_slot))
        .route("/:id/trainers", post(trainers::add_trainer))
        .route("/:id/trainers/:trainer_id", delete(trainers::delete_trainer))
        .route("/:id/reviews", post(reviews::add_review))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/", get(gyms::search_gyms))
        .route("/:id", get(gyms::get_gym))
        .route("/:id/slots", get(time_slots::list_time_slots))
        .route("/:id/trainers", get(trainers::list_trainers))
        .route("/:id/reviews", get(reviews::list_reviews))
        .merge(protected)
}
