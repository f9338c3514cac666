use chrono::{DateTime, Utc};
use mongodb::bson;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gym {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub owner_id: ObjectId,
    pub name: String,
    pub location: String,
    pub description: String,
    pub price_per_session: f64,
    pub rating: f64,
    pub image_url: String,
    pub amenities: Vec<String>,
    pub contact_email: String,
    pub contact_phone: String,
    pub is_active: bool,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateGymRequest {
    #[validate(length(min = 1, message = "Gym name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price_per_session: f64,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateGymRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price_per_session: Option<f64>,
    pub image_url: Option<String>,
    pub amenities: Option<Vec<String>>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub is_active: Option<bool>,
}

// Query parameters for gym search
#[derive(Debug, Deserialize)]
pub struct GymQuery {
    pub name: Option<String>,
    pub location: Option<String>,
    pub max_price: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct GymResponse {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub location: String,
    pub description: String,
    pub price_per_session: f64,
    pub rating: f64,
    pub image_url: String,
    pub amenities: Vec<String>,
    pub contact_email: String,
    pub contact_phone: String,
    pub is_active: bool,
}

impl From<Gym> for GymResponse {
    fn from(gym: Gym) -> Self {
        GymResponse {
            id: gym.id.map(|id| id.to_hex()).unwrap_or_default(),
            owner_id: gym.owner_id.to_hex(),
            name: gym.name,
            location: gym.location,
            description: gym.description,
            price_per_session: gym.price_per_session,
            rating: gym.rating,
            image_url: gym.image_url,
            amenities: gym.amenities,
            contact_email: gym.contact_email,
            contact_phone: gym.contact_phone,
            is_active: gym.is_active,
        }
    }
}

// Owner dashboard entry
#[derive(Debug, Serialize)]
pub struct OwnedGymResponse {
    pub id: String,
    pub name: String,
    pub location: String,
    pub bookings_count: u64,
}

#[derive(Debug, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct GymStatsResponse {
    pub total_bookings: u64,
    pub today_bookings: u64,
    pub week_bookings: u64,
    pub total_revenue: f64,
    pub status_breakdown: Vec<StatusCount>,
}
