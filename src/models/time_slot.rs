use chrono::{DateTime, Utc};
use mongodb::bson;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlot {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub gym_id: ObjectId,
    // "HH:MM" wall-clock times; lexical order is time order.
    pub start_time: String,
    pub end_time: String,
    pub max_capacity: i32,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTimeSlotRequest {
    pub start_time: String,
    pub end_time: String,
    pub max_capacity: i32,
}

#[derive(Debug, Serialize)]
pub struct TimeSlotResponse {
    pub id: String,
    pub start_time: String,
    pub end_time: String,
    pub max_capacity: i32,
}

impl From<TimeSlot> for TimeSlotResponse {
    fn from(slot: TimeSlot) -> Self {
        TimeSlotResponse {
            id: slot.id.map(|id| id.to_hex()).unwrap_or_default(),
            start_time: slot.start_time,
            end_time: slot.end_time,
            max_capacity: slot.max_capacity,
        }
    }
}
