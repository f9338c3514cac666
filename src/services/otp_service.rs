use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use mongodb::{
    bson::{doc, DateTime},
    Collection, Database,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, Result};
use crate::models::otp::PasswordResetOtp;

const RESET_PURPOSE: &str = "password_reset";

/// Claims of the short-lived token handed out once an OTP has been
/// consumed. It is the only authorization the completion step accepts;
/// no signed-in session is involved anywhere in the reset flow.
#[derive(Debug, Serialize, Deserialize)]
struct ResetClaims {
    sub: String,
    purpose: String,
    exp: usize,
}

#[derive(Clone)]
pub struct OtpService {
    db: Database,
    jwt_secret: String,
}

impl OtpService {
    pub fn new(db: Database, jwt_secret: String) -> Self {
        Self { db, jwt_secret }
    }

    // Uniform 6-digit code, never zero-padded
    pub fn generate_otp() -> String {
        let mut rng = rand::thread_rng();
        rng.gen_range(100_000..=999_999).to_string()
    }

    pub fn is_valid_otp_format(code: &str) -> bool {
        code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit())
    }

    /// Issues a fresh code for `email` and persists it. Earlier unused
    /// codes for the same address stay valid; each request is an
    /// independent row.
    pub async fn create_reset_code(&self, email: &str) -> Result<String> {
        let collection: Collection<PasswordResetOtp> =
            self.db.collection(PasswordResetOtp::COLLECTION);

        let code = Self::generate_otp();
        let now = Utc::now();
        let expires_at = now + Duration::minutes(PasswordResetOtp::VALIDITY_MINUTES);

        let row = PasswordResetOtp {
            id: None,
            email: email.to_string(),
            otp: code.clone(),
            expires_at: DateTime::from_millis(expires_at.timestamp_millis()),
            used: false,
            created_at: DateTime::from_millis(now.timestamp_millis()),
        };

        collection.insert_one(&row).await?;

        Ok(code)
    }

    /// Consumes the newest unused, unexpired row matching `(email, code)`.
    /// Returns false when no such row exists; the caller reports one
    /// generic error for wrong, expired and already-used codes alike.
    pub async fn verify_and_consume(&self, email: &str, code: &str) -> Result<bool> {
        let collection: Collection<PasswordResetOtp> =
            self.db.collection(PasswordResetOtp::COLLECTION);

        let now = DateTime::from_millis(Utc::now().timestamp_millis());
        let filter = doc! {
            "email": email,
            "otp": code,
            "used": false,
            "expires_at": { "$gte": now },
        };

        let row = collection
            .find_one(filter)
            .sort(doc! { "created_at": -1 })
            .await?;

        let Some(row) = row else {
            return Ok(false);
        };

        // One-way transition; the row is kept as an audit record.
        collection
            .update_one(
                doc! { "_id": row.id },
                doc! { "$set": { "used": true } },
            )
            .await?;

        Ok(true)
    }

    /// Token proving OTP possession for `email`, valid as long as a code
    /// would have been.
    pub fn generate_reset_token(&self, email: &str) -> Result<String> {
        let expiration = Utc::now()
            .checked_add_signed(Duration::minutes(PasswordResetOtp::VALIDITY_MINUTES))
            .ok_or_else(|| AppError::service("Failed to calculate token expiration"))?
            .timestamp() as usize;

        let claims = ResetClaims {
            sub: email.to_string(),
            purpose: RESET_PURPOSE.to_string(),
            exp: expiration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::service(format!("Token generation failed: {}", e)))
    }

    /// Checks that `token` was minted by `generate_reset_token` for the
    /// same email and has not expired.
    pub fn verify_reset_token(&self, token: &str, email: &str) -> Result<()> {
        let data = decode::<ResetClaims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::AuthError)?;

        if data.claims.purpose != RESET_PURPOSE || data.claims.sub != email {
            return Err(AppError::AuthError);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn service() -> OtpService {
        // The client is lazy; these tests never touch the wire.
        let client = mongodb::Client::with_uri_str("mongodb://localhost:27017")
            .await
            .unwrap();
        OtpService::new(client.database("flexifit_test"), "test-secret".to_string())
    }

    // Backed by a running MongoDB (MONGODB_URI, default localhost); run
    // with `cargo test -- --ignored`.
    async fn live_service() -> OtpService {
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let client = mongodb::Client::with_uri_str(uri).await.unwrap();
        OtpService::new(client.database("flexifit_test"), "test-secret".to_string())
    }

    fn unique_email() -> String {
        format!("{}@example.com", mongodb::bson::oid::ObjectId::new().to_hex())
    }

    #[test]
    fn generated_codes_are_six_digits_in_range() {
        for _ in 0..1_000 {
            let code = OtpService::generate_otp();
            assert_eq!(code.len(), 6);
            let value: u32 = code.parse().unwrap();
            assert!((100_000..=999_999).contains(&value));
        }
    }

    #[test]
    fn otp_format_requires_exactly_six_digits() {
        assert!(OtpService::is_valid_otp_format("123456"));
        assert!(OtpService::is_valid_otp_format("000000"));
        assert!(!OtpService::is_valid_otp_format("12345"));
        assert!(!OtpService::is_valid_otp_format("1234567"));
        assert!(!OtpService::is_valid_otp_format("12a456"));
        assert!(!OtpService::is_valid_otp_format(""));
    }

    #[tokio::test]
    async fn reset_token_round_trips_for_matching_email() {
        let service = service().await;
        let token = service.generate_reset_token("user@example.com").unwrap();
        assert!(service.verify_reset_token(&token, "user@example.com").is_ok());
    }

    #[tokio::test]
    async fn reset_token_is_rejected_for_other_email() {
        let service = service().await;
        let token = service.generate_reset_token("user@example.com").unwrap();
        assert!(service.verify_reset_token(&token, "other@example.com").is_err());
    }

    #[tokio::test]
    async fn reset_token_with_wrong_purpose_is_rejected() {
        let service = service().await;
        let claims = ResetClaims {
            sub: "user@example.com".to_string(),
            purpose: "session".to_string(),
            exp: (Utc::now().timestamp() + 600) as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(service.verify_reset_token(&token, "user@example.com").is_err());
    }

    #[tokio::test]
    async fn garbage_reset_token_is_rejected() {
        let service = service().await;
        assert!(service.verify_reset_token("not-a-jwt", "user@example.com").is_err());
    }

    #[tokio::test]
    #[ignore]
    async fn code_is_consumed_exactly_once() {
        let service = live_service().await;
        let email = unique_email();

        let code = service.create_reset_code(&email).await.unwrap();
        assert!(service.verify_and_consume(&email, &code).await.unwrap());
        assert!(!service.verify_and_consume(&email, &code).await.unwrap());
    }

    #[tokio::test]
    #[ignore]
    async fn expired_code_is_rejected() {
        let service = live_service().await;
        let email = unique_email();

        let collection = service
            .db
            .collection::<PasswordResetOtp>(PasswordResetOtp::COLLECTION);
        let past = Utc::now() - Duration::minutes(PasswordResetOtp::VALIDITY_MINUTES + 1);
        let row = PasswordResetOtp {
            id: None,
            email: email.clone(),
            otp: "123456".to_string(),
            expires_at: DateTime::from_millis(past.timestamp_millis()),
            used: false,
            created_at: DateTime::from_millis(past.timestamp_millis()),
        };
        collection.insert_one(&row).await.unwrap();

        assert!(!service.verify_and_consume(&email, "123456").await.unwrap());
    }

    #[tokio::test]
    #[ignore]
    async fn earlier_code_survives_a_newer_request() {
        let service = live_service().await;
        let email = unique_email();

        let first = service.create_reset_code(&email).await.unwrap();
        let second = service.create_reset_code(&email).await.unwrap();

        // Each request is an independent row, so both codes verify.
        assert!(service.verify_and_consume(&email, &first).await.unwrap());
        assert!(service.verify_and_consume(&email, &second).await.unwrap());
    }
}
