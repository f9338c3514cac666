use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

/// One issued password-reset code. Rows are inserted on every reset
/// request and marked used on successful verification; they are never
/// deleted, so the collection doubles as an audit trail. Several unused
/// rows may exist for the same email at once.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PasswordResetOtp {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub otp: String,          // 6-digit code
    pub expires_at: DateTime, // creation time + 10 minutes
    pub used: bool,
    pub created_at: DateTime,
}

impl PasswordResetOtp {
    pub const COLLECTION: &'static str = "password_reset_otps";
    pub const VALIDITY_MINUTES: i64 = 10;
}
