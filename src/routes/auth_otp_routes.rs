use axum::{routing::post, Router};

use crate::{handlers::auth_otp, state::AppState};

pub fn auth_otp_routes() -> Router<AppState> {
    Router::new()
        // Request a reset code
        .route("/auth/forgot-password", post(auth_otp::forgot_password))

        // Verify the code, trading it for a reset token
        .route("/auth/verify-otp", post(auth_otp::verify_otp))

        // Set the new password with the reset token
        .route("/auth/reset-password", post(auth_otp::reset_password))
}
