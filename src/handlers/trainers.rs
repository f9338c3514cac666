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
use crate::handlers::gyms::find_owned_gym;
use crate::models::trainer::{CreateTrainerRequest, Trainer, TrainerResponse};
use crate::models::user::Claims;
use crate::state::AppState;

// Public: trainers for a gym, oldest first
pub async fn list_trainers(
    State(state): State<AppState>,
    Path(gym_id): Path<String>,
) -> Result<Json<Vec<TrainerResponse>>> {
    let collection: Collection<Trainer> = state.db.collection("trainers");

    let gym_id = ObjectId::parse_str(&gym_id)?;
    let cursor = collection
        .find(doc! { "gym_id": gym_id })
        .sort(doc! { "created_at": 1 })
        .await?;
    let trainers: Vec<Trainer> = cursor.try_collect().await?;

    Ok(Json(trainers.into_iter().map(TrainerResponse::from).collect()))
}

pub async fn add_trainer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(gym_id): Path<String>,
    Json(payload): Json<CreateTrainerRequest>,
) -> Result<Json<TrainerResponse>> {
    payload.validate()?;

    let gym = find_owned_gym(&state, &gym_id, &claims).await?;
    let collection: Collection<Trainer> = state.db.collection("trainers");

    let trainer = Trainer {
        id: Some(ObjectId::new()),
        gym_id: gym.id.ok_or(AppError::GymNotFound)?,
        name: payload.name.trim().to_string(),
        speciality: payload.speciality.trim().to_string(),
        created_at: Utc::now(),
    };
    collection.insert_one(&trainer).await?;

    Ok(Json(TrainerResponse::from(trainer)))
}

pub async fn delete_trainer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((gym_id, trainer_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>> {
    let gym = find_owned_gym(&state, &gym_id, &claims).await?;
    let collection: Collection<Trainer> = state.db.collection("trainers");

    let trainer_id = ObjectId::parse_str(&trainer_id)?;
    let result = collection
        .delete_one(doc! { "_id": trainer_id, "gym_id": gym.id })
        .await?;

    if result.deleted_count == 0 {
        return Err(AppError::DocumentNotFound);
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Trainer removed successfully",
    })))
}
