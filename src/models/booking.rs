use chrono::{DateTime, Utc};
use mongodb::bson;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

pub const STATUS_CONFIRMED: &str = "confirmed";
pub const STATUS_CANCELLED: &str = "cancelled";

pub const PAYMENT_PENDING: &str = "pending";

pub const PAYMENT_METHODS: [&str; 3] = ["card", "upi", "netbanking"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub gym_id: ObjectId,
    // Calendar date in "YYYY-MM-DD" form; lexical order is date order.
    pub booking_date: String,
    pub status: String,
    pub payment_status: String,
    pub payment_method: String,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub gym_id: String,
    pub booking_date: String,
    pub payment_method: String,
}

// Gym summary embedded in booking listings
#[derive(Debug, Serialize)]
pub struct BookingGym {
    pub name: String,
    pub location: String,
    pub price_per_session: f64,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: String,
    pub booking_date: String,
    pub status: String,
    pub payment_status: String,
    pub payment_method: String,
    pub gym: Option<BookingGym>,
}
