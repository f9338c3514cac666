use axum::{
    extract::{Path, State},
    response::Json,
    Extension,
};
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::Collection;
use validator::Validate;

use crate::errors::{AppError, Result};
use crate::models::gym::Gym;
use crate::models::review::{mean_rating, CreateReviewRequest, Review, ReviewResponse};
use crate::models::user::Claims;
use crate::state::AppState;

// Public: reviews for a gym, newest first
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(gym_id): Path<String>,
) -> Result<Json<Vec<ReviewResponse>>> {
    let collection: Collection<Review> = state.db.collection("reviews");

    let gym_id = ObjectId::parse_str(&gym_id)?;
    let cursor = collection
        .find(doc! { "gym_id": gym_id })
        .sort(doc! { "created_at": -1 })
        .await?;
    let reviews: Vec<Review> = cursor.try_collect().await?;

    Ok(Json(reviews.into_iter().map(ReviewResponse::from).collect()))
}

// Adds a review and folds it into the gym's listed rating
pub async fn add_review(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(gym_id): Path<String>,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<Json<ReviewResponse>> {
    payload.validate()?;

    let gyms: Collection<Gym> = state.db.collection("gyms");
    let reviews: Collection<Review> = state.db.collection("reviews");

    let gym_id = ObjectId::parse_str(&gym_id)?;
    gyms.find_one(doc! { "_id": gym_id })
        .await?
        .ok_or(AppError::GymNotFound)?;

    let review = Review {
        id: Some(ObjectId::new()),
        gym_id,
        user_id: ObjectId::parse_str(&claims.sub)?,
        rating: payload.rating,
        comment: payload.comment,
        created_at: Utc::now(),
    };
    reviews.insert_one(&review).await?;

    // Recompute the gym's rating from all of its reviews
    let cursor = reviews.find(doc! { "gym_id": gym_id }).await?;
    let all: Vec<Review> = cursor.try_collect().await?;
    let ratings: Vec<i32> = all.iter().map(|r| r.rating).collect();

    gyms.update_one(
        doc! { "_id": gym_id },
        doc! { "$set": { "rating": mean_rating(&ratings) } },
    )
    .await?;

    Ok(Json(ReviewResponse::from(review)))
}
