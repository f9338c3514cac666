use axum::{
    extract::{Path, State},
    response::Json,
    Extension,
};
use chrono::{NaiveTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::Collection;

use crate::errors::{AppError, Result};
use crate::handlers::gyms::find_owned_gym;
use crate::models::time_slot::{CreateTimeSlotRequest, TimeSlot, TimeSlotResponse};
use crate::models::user::Claims;
use crate::state::AppState;

pub(crate) fn validate_slot(payload: &CreateTimeSlotRequest) -> Result<()> {
    let start = NaiveTime::parse_from_str(&payload.start_time, "%H:%M")
        .map_err(|_| AppError::invalid_data("Start time must be HH:MM"))?;
    let end = NaiveTime::parse_from_str(&payload.end_time, "%H:%M")
        .map_err(|_| AppError::invalid_data("End time must be HH:MM"))?;

    if start >= end {
        return Err(AppError::invalid_data("Start time must be before end time"));
    }
    if payload.max_capacity < 1 {
        return Err(AppError::invalid_data("Capacity must be at least 1"));
    }

    Ok(())
}

// Public: slots for a gym, earliest first
pub async fn list_time_slots(
    State(state): State<AppState>,
    Path(gym_id): Path<String>,
) -> Result<Json<Vec<TimeSlotResponse>>> {
    let collection: Collection<TimeSlot> = state.db.collection("time_slots");

    let gym_id = ObjectId::parse_str(&gym_id)?;
    let cursor = collection
        .find(doc! { "gym_id": gym_id })
        .sort(doc! { "start_time": 1 })
        .await?;
    let slots: Vec<TimeSlot> = cursor.try_collect().await?;

    Ok(Json(slots.into_iter().map(TimeSlotResponse::from).collect()))
}

pub async fn add_time_slot(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(gym_id): Path<String>,
    Json(payload): Json<CreateTimeSlotRequest>,
) -> Result<Json<TimeSlotResponse>> {
    validate_slot(&payload)?;

    let gym = find_owned_gym(&state, &gym_id, &claims).await?;
    let collection: Collection<TimeSlot> = state.db.collection("time_slots");

    let slot = TimeSlot {
        id: Some(ObjectId::new()),
        gym_id: gym.id.ok_or(AppError::GymNotFound)?,
        start_time: payload.start_time,
        end_time: payload.end_time,
        max_capacity: payload.max_capacity,
        created_at: Utc::now(),
    };
    collection.insert_one(&slot).await?;

    Ok(Json(TimeSlotResponse::from(slot)))
}

pub async fn delete_time_slot(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((gym_id, slot_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>> {
    let gym = find_owned_gym(&state, &gym_id, &claims).await?;
    let collection: Collection<TimeSlot> = state.db.collection("time_slots");

    let slot_id = ObjectId::parse_str(&slot_id)?;
    let result = collection
        .delete_one(doc! { "_id": slot_id, "gym_id": gym.id })
        .await?;

    if result.deleted_count == 0 {
        return Err(AppError::DocumentNotFound);
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Time slot removed successfully",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(start: &str, end: &str, capacity: i32) -> CreateTimeSlotRequest {
        CreateTimeSlotRequest {
            start_time: start.to_string(),
            end_time: end.to_string(),
            max_capacity: capacity,
        }
    }

    #[test]
    fn well_formed_slot_is_accepted() {
        assert!(validate_slot(&request("06:00", "07:30", 20)).is_ok());
    }

    #[test]
    fn malformed_times_are_rejected() {
        assert!(validate_slot(&request("6am", "07:30", 20)).is_err());
        assert!(validate_slot(&request("06:00", "", 20)).is_err());
    }

    #[test]
    fn start_must_precede_end() {
        assert!(validate_slot(&request("08:00", "07:00", 20)).is_err());
        assert!(validate_slot(&request("08:00", "08:00", 20)).is_err());
    }

    #[test]
    fn capacity_must_be_positive() {
        assert!(validate_slot(&request("06:00", "07:00", 0)).is_err());
        assert!(validate_slot(&request("06:00", "07:00", -5)).is_err());
    }
}
