use axum::{extract::State, response::Json};
use bcrypt::{hash, DEFAULT_COST};
use chrono::Utc;
use mongodb::bson::{doc, DateTime};
use mongodb::Collection;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{AppError, Result};
use crate::models::user::User;
use crate::services::otp_service::OtpService;
use crate::state::AppState;

// Request DTOs
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub reset_token: String,
    pub new_password: String,
    pub confirm_password: String,
}

// Response DTOs
#[derive(Debug, Serialize)]
pub struct ForgotPasswordResponse {
    pub success: bool,
    pub message: String,
    pub redirect_to: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyOtpResponse {
    pub success: bool,
    pub message: String,
    pub reset_token: String,
}

#[derive(Debug, Serialize)]
pub struct ResetPasswordResponse {
    pub success: bool,
    pub message: String,
}

pub(crate) fn validate_new_password(new_password: &str, confirm_password: &str) -> Result<()> {
    if new_password != confirm_password {
        return Err(AppError::invalid_data("Passwords do not match"));
    }
    if new_password.len() < 6 {
        return Err(AppError::invalid_data(
            "Password must be at least 6 characters",
        ));
    }
    Ok(())
}

// 1. Request a reset code. The account is not required to exist; a code
// is issued for whatever address was entered.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>> {
    payload.validate()?;

    let code = state.otp_service.create_reset_code(&payload.email).await?;

    // If the send fails after the insert the code is not rolled back; it
    // simply expires with the rest.
    if let Err(e) = state
        .email_service
        .send_reset_code(&payload.email, &code)
        .await
    {
        tracing::error!("Failed to send reset code to {}: {}", payload.email, e);
        return Err(e);
    }

    tracing::info!("Password reset code issued for {}", payload.email);

    Ok(Json(ForgotPasswordResponse {
        success: true,
        message: "Check your email for the verification code".to_string(),
        redirect_to: state.config.reset_password_url(&payload.email),
    }))
}

// 2. Verify the code. A match consumes the row and hands back a
// short-lived token that authorizes the completion step.
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(payload): Json<VerifyOtpRequest>,
) -> Result<Json<VerifyOtpResponse>> {
    if !OtpService::is_valid_otp_format(&payload.otp) {
        return Err(AppError::invalid_data("OTP must be 6 digits"));
    }

    let consumed = state
        .otp_service
        .verify_and_consume(&payload.email, &payload.otp)
        .await?;

    if !consumed {
        return Err(AppError::OtpInvalidOrExpired);
    }

    let reset_token = state.otp_service.generate_reset_token(&payload.email)?;

    Ok(Json(VerifyOtpResponse {
        success: true,
        message: "OTP verified successfully".to_string(),
        reset_token,
    }))
}

// 3. Set the new password. Authorized by the reset token alone; the
// caller has proven code possession, not a login.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<ResetPasswordResponse>> {
    validate_new_password(&payload.new_password, &payload.confirm_password)?;

    state
        .otp_service
        .verify_reset_token(&payload.reset_token, &payload.email)?;

    let password_hash = hash(&payload.new_password, DEFAULT_COST)
        .map_err(|e| AppError::service(format!("Password hashing failed: {}", e)))?;

    let users: Collection<User> = state.db.collection("users");
    let now = DateTime::from_millis(Utc::now().timestamp_millis());

    let result = users
        .update_one(
            doc! { "email": &payload.email },
            doc! { "$set": { "password_hash": password_hash, "updated_at": now } },
        )
        .await?;

    if result.matched_count == 0 {
        return Err(AppError::UserNotFound);
    }

    tracing::info!("Password reset completed for {}", payload.email);

    Ok(Json(ResetPasswordResponse {
        success: true,
        message: "Password reset successful. Please sign in.".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_passwords_are_rejected_regardless_of_strength() {
        assert!(validate_new_password("longenoughpassword", "different").is_err());
    }

    #[test]
    fn short_passwords_are_rejected() {
        assert!(validate_new_password("12345", "12345").is_err());
    }

    #[test]
    fn six_character_matching_password_is_accepted() {
        assert!(validate_new_password("123456", "123456").is_ok());
    }
}
