// config.rs
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_name: String,
    pub jwt_secret: String,
    pub resend_api_key: String,
    pub email_from: String,
    pub app_base_url: String,
    pub port: u16,
    pub host: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenv().ok();

        AppConfig {
            database_url: env::var("DATABASE_URL")
                .expect("DATABASE_URL must be set"),
            database_name: env::var("DATABASE_NAME")
                .unwrap_or_else(|_| "flexifit".to_string()),
            jwt_secret: env::var("JWT_SECRET")
                .expect("JWT_SECRET must be set"),
            resend_api_key: env::var("RESEND_API_KEY")
                .unwrap_or_default(),
            email_from: env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "FlexiFit <onboarding@resend.dev>".to_string()),
            app_base_url: env::var("APP_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a number"),
            host: env::var("HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
        }
    }

    /// URL the client lands on after requesting a reset code, carrying the
    /// email as a query parameter.
    pub fn reset_password_url(&self, email: &str) -> String {
        format!(
            "{}/reset-password?email={}",
            self.app_base_url,
            urlencoding::encode(email)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_password_url_carries_email_query_param() {
        let config = AppConfig {
            database_url: String::new(),
            database_name: "flexifit".to_string(),
            jwt_secret: "secret".to_string(),
            resend_api_key: String::new(),
            email_from: String::new(),
            app_base_url: "https://flexifit.example".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
        };

        assert_eq!(
            config.reset_password_url("user@example.com"),
            "https://flexifit.example/reset-password?email=user%40example.com"
        );
    }
}
