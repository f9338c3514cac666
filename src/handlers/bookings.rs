use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    response::Json,
    Extension,
};
use chrono::{NaiveDate, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::Collection;

use crate::errors::{AppError, Result};
use crate::models::booking::{
    Booking, BookingGym, BookingResponse, CreateBookingRequest, PAYMENT_METHODS,
    PAYMENT_PENDING, STATUS_CANCELLED, STATUS_CONFIRMED,
};
use crate::models::gym::Gym;
use crate::models::user::Claims;
use crate::state::AppState;

pub(crate) fn validate_booking_date(date: &str, today: NaiveDate) -> Result<()> {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::invalid_data("Booking date must be YYYY-MM-DD"))?;

    if parsed < today {
        return Err(AppError::invalid_data("Booking date cannot be in the past"));
    }

    Ok(())
}

pub(crate) fn validate_payment_method(method: &str) -> Result<()> {
    if !PAYMENT_METHODS.contains(&method) {
        return Err(AppError::invalid_data(
            "Payment method must be one of: card, upi, netbanking",
        ));
    }
    Ok(())
}

pub async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<Json<BookingResponse>> {
    validate_booking_date(&payload.booking_date, Utc::now().date_naive())?;
    validate_payment_method(&payload.payment_method)?;

    let gyms: Collection<Gym> = state.db.collection("gyms");
    let gym_id = ObjectId::parse_str(&payload.gym_id)?;
    let gym = gyms
        .find_one(doc! { "_id": gym_id, "is_active": true })
        .await?
        .ok_or(AppError::GymNotFound)?;

    let bookings: Collection<Booking> = state.db.collection("bookings");
    let now = Utc::now();
    let booking = Booking {
        id: Some(ObjectId::new()),
        user_id: ObjectId::parse_str(&claims.sub)?,
        gym_id,
        booking_date: payload.booking_date,
        status: STATUS_CONFIRMED.to_string(),
        payment_status: PAYMENT_PENDING.to_string(),
        payment_method: payload.payment_method,
        created_at: now,
        updated_at: now,
    };

    bookings.insert_one(&booking).await?;

    tracing::info!(
        "Booking created for gym '{}' on {} by {}",
        gym.name,
        booking.booking_date,
        claims.email
    );

    Ok(Json(BookingResponse {
        id: booking.id.map(|id| id.to_hex()).unwrap_or_default(),
        booking_date: booking.booking_date,
        status: booking.status,
        payment_status: booking.payment_status,
        payment_method: booking.payment_method,
        gym: Some(BookingGym {
            name: gym.name,
            location: gym.location,
            price_per_session: gym.price_per_session,
        }),
    }))
}

// Own bookings with their gym summaries, newest date first
pub async fn list_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<BookingResponse>>> {
    let bookings: Collection<Booking> = state.db.collection("bookings");
    let gyms: Collection<Gym> = state.db.collection("gyms");

    let user_id = ObjectId::parse_str(&claims.sub)?;
    let cursor = bookings
        .find(doc! { "user_id": user_id })
        .sort(doc! { "booking_date": -1 })
        .await?;
    let rows: Vec<Booking> = cursor.try_collect().await?;

    let gym_ids: Vec<ObjectId> = rows.iter().map(|b| b.gym_id).collect();
    let cursor = gyms.find(doc! { "_id": { "$in": gym_ids } }).await?;
    let gym_docs: Vec<Gym> = cursor.try_collect().await?;

    let by_id: HashMap<ObjectId, &Gym> = gym_docs
        .iter()
        .filter_map(|g| g.id.map(|id| (id, g)))
        .collect();

    let responses = rows
        .into_iter()
        .map(|booking| {
            let gym = by_id.get(&booking.gym_id).map(|g| BookingGym {
                name: g.name.clone(),
                location: g.location.clone(),
                price_per_session: g.price_per_session,
            });
            BookingResponse {
                id: booking.id.map(|id| id.to_hex()).unwrap_or_default(),
                booking_date: booking.booking_date,
                status: booking.status,
                payment_status: booking.payment_status,
                payment_method: booking.payment_method,
                gym,
            }
        })
        .collect();

    Ok(Json(responses))
}

pub async fn cancel_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let bookings: Collection<Booking> = state.db.collection("bookings");

    let booking_id = ObjectId::parse_str(&booking_id)?;
    let user_id = ObjectId::parse_str(&claims.sub)?;

    let result = bookings
        .update_one(
            doc! {
                "_id": booking_id,
                "user_id": user_id,
                "status": STATUS_CONFIRMED,
            },
            doc! {
                "$set": {
                    "status": STATUS_CANCELLED,
                    "updated_at": mongodb::bson::DateTime::from_millis(
                        Utc::now().timestamp_millis()
                    ),
                }
            },
        )
        .await?;

    if result.matched_count == 0 {
        return Err(AppError::BookingNotFound);
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Booking cancelled successfully",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 26).unwrap()
    }

    #[test]
    fn booking_date_must_be_iso_formatted() {
        assert!(validate_booking_date("26-08-2026", today()).is_err());
        assert!(validate_booking_date("2026/08/26", today()).is_err());
        assert!(validate_booking_date("tomorrow", today()).is_err());
    }

    #[test]
    fn past_booking_dates_are_rejected() {
        assert!(validate_booking_date("2026-08-25", today()).is_err());
    }

    #[test]
    fn today_and_future_dates_are_accepted() {
        assert!(validate_booking_date("2026-08-26", today()).is_ok());
        assert!(validate_booking_date("2026-09-01", today()).is_ok());
    }

    #[test]
    fn payment_method_whitelist() {
        assert!(validate_payment_method("card").is_ok());
        assert!(validate_payment_method("upi").is_ok());
        assert!(validate_payment_method("netbanking").is_ok());
        assert!(validate_payment_method("cash").is_err());
        assert!(validate_payment_method("").is_err());
    }
}
