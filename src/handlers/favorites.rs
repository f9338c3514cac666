use axum::{
    extract::{Path, State},
    response::Json,
    Extension,
};
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::Collection;

use crate::errors::{AppError, Result};
use crate::models::favorite::{AddFavoriteRequest, Favorite};
use crate::models::gym::{Gym, GymResponse};
use crate::models::user::Claims;
use crate::state::AppState;

// Favorited gyms as full gym documents
pub async fn list_favorites(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<GymResponse>>> {
    let favorites: Collection<Favorite> = state.db.collection("favorites");
    let gyms: Collection<Gym> = state.db.collection("gyms");

    let user_id = ObjectId::parse_str(&claims.sub)?;
    let cursor = favorites.find(doc! { "user_id": user_id }).await?;
    let rows: Vec<Favorite> = cursor.try_collect().await?;

    let gym_ids: Vec<ObjectId> = rows.iter().map(|f| f.gym_id).collect();
    let cursor = gyms.find(doc! { "_id": { "$in": gym_ids } }).await?;
    let gym_docs: Vec<Gym> = cursor.try_collect().await?;

    Ok(Json(gym_docs.into_iter().map(GymResponse::from).collect()))
}

pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<AddFavoriteRequest>,
) -> Result<Json<serde_json::Value>> {
    let favorites: Collection<Favorite> = state.db.collection("favorites");
    let gyms: Collection<Gym> = state.db.collection("gyms");

    let user_id = ObjectId::parse_str(&claims.sub)?;
    let gym_id = ObjectId::parse_str(&payload.gym_id)?;

    gyms.find_one(doc! { "_id": gym_id })
        .await?
        .ok_or(AppError::GymNotFound)?;

    let existing = favorites
        .find_one(doc! { "user_id": user_id, "gym_id": gym_id })
        .await?;
    if existing.is_some() {
        return Err(AppError::DuplicateEntry);
    }

    let favorite = Favorite {
        id: Some(ObjectId::new()),
        user_id,
        gym_id,
        created_at: Utc::now(),
    };
    favorites.insert_one(&favorite).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Added to favorites",
    })))
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(gym_id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let favorites: Collection<Favorite> = state.db.collection("favorites");

    let user_id = ObjectId::parse_str(&claims.sub)?;
    let gym_id = ObjectId::parse_str(&gym_id)?;

    let result = favorites
        .delete_one(doc! { "user_id": user_id, "gym_id": gym_id })
        .await?;

    if result.deleted_count == 0 {
        return Err(AppError::DocumentNotFound);
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Removed from favorites",
    })))
}
