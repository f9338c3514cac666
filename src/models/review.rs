use chrono::{DateTime, Utc};
use mongodb::bson;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub gym_id: ObjectId,
    pub user_id: ObjectId,
    pub rating: i32,
    pub comment: String,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: String,
    pub user_id: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        ReviewResponse {
            id: review.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: review.user_id.to_hex(),
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
        }
    }
}

/// Mean of the given ratings, or the listing default when none exist.
pub fn mean_rating(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 4.0;
    }
    let sum: i32 = ratings.iter().sum();
    sum as f64 / ratings.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_rating_averages_all_reviews() {
        assert_eq!(mean_rating(&[5, 3]), 4.0);
        assert_eq!(mean_rating(&[1]), 1.0);
        assert!((mean_rating(&[5, 4, 4]) - 4.333).abs() < 0.001);
    }

    #[test]
    fn mean_rating_defaults_without_reviews() {
        assert_eq!(mean_rating(&[]), 4.0);
    }
}
