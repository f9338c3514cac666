use std::sync::Arc;

use mongodb::Database;

use crate::config::AppConfig;
use crate::services::email_service::EmailService;
use crate::services::otp_service::OtpService;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<AppConfig>,
    pub otp_service: OtpService,
    pub email_service: Arc<EmailService>,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Self {
        let otp_service = OtpService::new(db.clone(), config.jwt_secret.clone());
        let email_service = Arc::new(EmailService::new(
            config.resend_api_key.clone(),
            config.email_from.clone(),
        ));

        AppState {
            db,
            config: Arc::new(config),
            otp_service,
            email_service,
        }
    }
}
