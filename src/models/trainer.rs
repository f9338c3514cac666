use chrono::{DateTime, Utc};
use mongodb::bson;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trainer {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub gym_id: ObjectId,
    pub name: String,
    pub speciality: String,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTrainerRequest {
    #[validate(length(min = 1, message = "Trainer name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Speciality is required"))]
    pub speciality: String,
}

#[derive(Debug, Serialize)]
pub struct TrainerResponse {
    pub id: String,
    pub name: String,
    pub speciality: String,
}

impl From<Trainer> for TrainerResponse {
    fn from(trainer: Trainer) -> Self {
        TrainerResponse {
            id: trainer.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: trainer.name,
            speciality: trainer.speciality,
        }
    }
}
