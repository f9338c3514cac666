use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    response::Json,
    Extension,
};
use chrono::{Duration, NaiveDate, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::Collection;
use validator::Validate;

use crate::errors::{AppError, Result};
use crate::models::booking::Booking;
use crate::models::gym::{
    CreateGymRequest, Gym, GymQuery, GymResponse, GymStatsResponse, OwnedGymResponse,
    StatusCount, UpdateGymRequest,
};
use crate::models::user::Claims;
use crate::state::AppState;

/// Search filter over active gyms. Name and location are substring
/// matches, so user input is escaped before it becomes a pattern.
pub(crate) fn build_search_filter(query: &GymQuery) -> Document {
    let mut filter = doc! { "is_active": true };

    if let Some(name) = &query.name {
        filter.insert("name", doc! { "$regex": regex::escape(name), "$options": "i" });
    }

    if let Some(location) = &query.location {
        filter.insert(
            "location",
            doc! { "$regex": regex::escape(location), "$options": "i" },
        );
    }

    if let Some(max_price) = query.max_price {
        filter.insert("price_per_session", doc! { "$lte": max_price });
    }

    filter
}

// Search active gyms, best-rated first
pub async fn search_gyms(
    State(state): State<AppState>,
    Query(query): Query<GymQuery>,
) -> Result<Json<Vec<GymResponse>>> {
    let collection: Collection<Gym> = state.db.collection("gyms");

    let filter = build_search_filter(&query);
    let cursor = collection.find(filter).sort(doc! { "rating": -1 }).await?;
    let gyms: Vec<Gym> = cursor.try_collect().await?;

    Ok(Json(gyms.into_iter().map(GymResponse::from).collect()))
}

pub async fn get_gym(
    State(state): State<AppState>,
    Path(gym_id): Path<String>,
) -> Result<Json<GymResponse>> {
    let collection: Collection<Gym> = state.db.collection("gyms");

    let object_id = ObjectId::parse_str(&gym_id)?;
    let gym = collection
        .find_one(doc! { "_id": object_id })
        .await?
        .ok_or(AppError::GymNotFound)?;

    Ok(Json(GymResponse::from(gym)))
}

pub async fn create_gym(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateGymRequest>,
) -> Result<Json<GymResponse>> {
    payload.validate()?;

    let collection: Collection<Gym> = state.db.collection("gyms");
    let owner_id = ObjectId::parse_str(&claims.sub)?;

    let now = Utc::now();
    let gym = Gym {
        id: Some(ObjectId::new()),
        owner_id,
        name: payload.name,
        location: payload.location,
        description: payload.description,
        price_per_session: payload.price_per_session,
        rating: 4.0, // listing default until reviews arrive
        image_url: payload.image_url,
        amenities: payload.amenities,
        contact_email: payload.contact_email,
        contact_phone: payload.contact_phone,
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    collection.insert_one(&gym).await?;

    tracing::info!("Gym '{}' listed by {}", gym.name, claims.email);

    Ok(Json(GymResponse::from(gym)))
}

/// Loads the gym and checks the caller owns it. Mutations and analytics
/// all go through this.
pub(crate) async fn find_owned_gym(
    state: &AppState,
    gym_id: &str,
    claims: &Claims,
) -> Result<Gym> {
    let collection: Collection<Gym> = state.db.collection("gyms");

    let object_id = ObjectId::parse_str(gym_id)?;
    let gym = collection
        .find_one(doc! { "_id": object_id })
        .await?
        .ok_or(AppError::GymNotFound)?;

    let caller = ObjectId::parse_str(&claims.sub)?;
    if gym.owner_id != caller {
        return Err(AppError::Unauthorized);
    }

    Ok(gym)
}

pub async fn update_gym(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(gym_id): Path<String>,
    Json(payload): Json<UpdateGymRequest>,
) -> Result<Json<GymResponse>> {
    payload.validate()?;

    let gym = find_owned_gym(&state, &gym_id, &claims).await?;
    let collection: Collection<Gym> = state.db.collection("gyms");

    let mut set = Document::new();
    if let Some(name) = payload.name {
        set.insert("name", name);
    }
    if let Some(location) = payload.location {
        set.insert("location", location);
    }
    if let Some(description) = payload.description {
        set.insert("description", description);
    }
    if let Some(price) = payload.price_per_session {
        set.insert("price_per_session", price);
    }
    if let Some(image_url) = payload.image_url {
        set.insert("image_url", image_url);
    }
    if let Some(amenities) = payload.amenities {
        set.insert("amenities", amenities);
    }
    if let Some(contact_email) = payload.contact_email {
        set.insert("contact_email", contact_email);
    }
    if let Some(contact_phone) = payload.contact_phone {
        set.insert("contact_phone", contact_phone);
    }
    if let Some(is_active) = payload.is_active {
        set.insert("is_active", is_active);
    }
    set.insert(
        "updated_at",
        mongodb::bson::DateTime::from_millis(Utc::now().timestamp_millis()),
    );

    collection
        .update_one(doc! { "_id": gym.id }, doc! { "$set": set })
        .await?;

    let updated = collection
        .find_one(doc! { "_id": gym.id })
        .await?
        .ok_or(AppError::GymNotFound)?;

    Ok(Json(GymResponse::from(updated)))
}

pub async fn delete_gym(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(gym_id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let gym = find_owned_gym(&state, &gym_id, &claims).await?;
    let collection: Collection<Gym> = state.db.collection("gyms");

    collection.delete_one(doc! { "_id": gym.id }).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Gym deleted successfully",
    })))
}

// Owner dashboard: owned gyms with their booking counts
pub async fn owned_gyms(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<OwnedGymResponse>>> {
    let gyms: Collection<Gym> = state.db.collection("gyms");
    let bookings: Collection<Booking> = state.db.collection("bookings");

    let owner_id = ObjectId::parse_str(&claims.sub)?;
    let cursor = gyms.find(doc! { "owner_id": owner_id }).await?;
    let owned: Vec<Gym> = cursor.try_collect().await?;

    let mut responses = Vec::with_capacity(owned.len());
    for gym in owned {
        let count = bookings
            .count_documents(doc! { "gym_id": gym.id })
            .await?;
        responses.push(OwnedGymResponse {
            id: gym.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: gym.name,
            location: gym.location,
            bookings_count: count,
        });
    }

    Ok(Json(responses))
}

pub async fn gym_stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(gym_id): Path<String>,
) -> Result<Json<GymStatsResponse>> {
    let gym = find_owned_gym(&state, &gym_id, &claims).await?;

    let bookings: Collection<Booking> = state.db.collection("bookings");
    let cursor = bookings.find(doc! { "gym_id": gym.id }).await?;
    let rows: Vec<Booking> = cursor.try_collect().await?;

    let today = Utc::now().date_naive();
    let stats = compute_stats(&rows, gym.price_per_session, today);

    Ok(Json(stats))
}

/// Booking analytics over raw rows: totals, today/last-7-days windows,
/// status breakdown, gross revenue at the current session price.
pub(crate) fn compute_stats(
    bookings: &[Booking],
    price_per_session: f64,
    today: NaiveDate,
) -> GymStatsResponse {
    let today_str = today.format("%Y-%m-%d").to_string();
    let week_ago_str = (today - Duration::days(7)).format("%Y-%m-%d").to_string();

    let today_bookings = bookings
        .iter()
        .filter(|b| b.booking_date == today_str)
        .count() as u64;

    let week_bookings = bookings
        .iter()
        .filter(|b| b.booking_date.as_str() >= week_ago_str.as_str())
        .count() as u64;

    let mut status_counts: BTreeMap<String, u64> = BTreeMap::new();
    for booking in bookings {
        *status_counts.entry(booking.status.clone()).or_insert(0) += 1;
    }

    GymStatsResponse {
        total_bookings: bookings.len() as u64,
        today_bookings,
        week_bookings,
        total_revenue: bookings.len() as f64 * price_per_session,
        status_breakdown: status_counts
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::{PAYMENT_PENDING, STATUS_CANCELLED, STATUS_CONFIRMED};

    fn booking(date: &str, status: &str) -> Booking {
        Booking {
            id: Some(ObjectId::new()),
            user_id: ObjectId::new(),
            gym_id: ObjectId::new(),
            booking_date: date.to_string(),
            status: status.to_string(),
            payment_status: PAYMENT_PENDING.to_string(),
            payment_method: "card".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn stats_count_windows_and_revenue() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();
        let rows = vec![
            booking("2026-08-26", STATUS_CONFIRMED), // today
            booking("2026-08-21", STATUS_CONFIRMED), // this week
            booking("2026-08-01", STATUS_CANCELLED), // older
        ];

        let stats = compute_stats(&rows, 250.0, today);

        assert_eq!(stats.total_bookings, 3);
        assert_eq!(stats.today_bookings, 1);
        assert_eq!(stats.week_bookings, 2);
        assert_eq!(stats.total_revenue, 750.0);
    }

    #[test]
    fn stats_break_down_by_status() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();
        let rows = vec![
            booking("2026-08-26", STATUS_CONFIRMED),
            booking("2026-08-25", STATUS_CONFIRMED),
            booking("2026-08-24", STATUS_CANCELLED),
        ];

        let stats = compute_stats(&rows, 100.0, today);

        let confirmed = stats
            .status_breakdown
            .iter()
            .find(|s| s.status == STATUS_CONFIRMED)
            .unwrap();
        let cancelled = stats
            .status_breakdown
            .iter()
            .find(|s| s.status == STATUS_CANCELLED)
            .unwrap();
        assert_eq!(confirmed.count, 2);
        assert_eq!(cancelled.count, 1);
    }

    #[test]
    fn search_filter_escapes_regex_metacharacters() {
        let query = GymQuery {
            name: Some("Gold's (24/7) Gym".to_string()),
            location: None,
            max_price: None,
        };

        let filter = build_search_filter(&query);
        let name = filter.get_document("name").unwrap();
        assert_eq!(name.get_str("$regex").unwrap(), r"Gold's \(24/7\) Gym");
    }

    #[test]
    fn search_filter_keeps_plain_substrings_and_price_cap() {
        let query = GymQuery {
            name: Some("iron".to_string()),
            location: Some("Austin".to_string()),
            max_price: Some(300.0),
        };

        let filter = build_search_filter(&query);
        assert_eq!(
            filter.get_document("name").unwrap().get_str("$regex").unwrap(),
            "iron"
        );
        assert_eq!(
            filter
                .get_document("location")
                .unwrap()
                .get_str("$regex")
                .unwrap(),
            "Austin"
        );
        assert_eq!(
            filter
                .get_document("price_per_session")
                .unwrap()
                .get_f64("$lte")
                .unwrap(),
            300.0
        );
    }

    #[test]
    fn stats_for_no_bookings_are_zero() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();
        let stats = compute_stats(&[], 100.0, today);

        assert_eq!(stats.total_bookings, 0);
        assert_eq!(stats.today_bookings, 0);
        assert_eq!(stats.week_bookings, 0);
        assert_eq!(stats.total_revenue, 0.0);
        assert!(stats.status_breakdown.is_empty());
    }
}
