use reqwest::Client;
use serde_json::json;

use crate::errors::{AppError, Result};

const RESEND_API_BASE: &str = "https://api.resend.com";

/// Outbound transactional mail through the Resend HTTP API. Delivery
/// failures surface as one opaque error; there is no retry and a code
/// persisted before a failed send stays consumable.
#[derive(Clone)]
pub struct EmailService {
    api_key: String,
    from: String,
    base_url: String,
    client: Client,
}

impl EmailService {
    pub fn new(api_key: String, from: String) -> Self {
        Self {
            api_key,
            from,
            base_url: RESEND_API_BASE.to_string(),
            client: Client::new(),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(api_key: String, from: String, base_url: String) -> Self {
        Self {
            api_key,
            from,
            base_url,
            client: Client::new(),
        }
    }

    pub async fn send_reset_code(&self, email: &str, otp: &str) -> Result<()> {
        let subject = "Your FlexiFit password reset code";
        let html = format!(
            "<h2>Reset your password</h2>\
             <p>We received a request to reset your FlexiFit password. \
             Enter this code to continue:</p>\
             <p style=\"font-size:32px;letter-spacing:8px;font-weight:bold\">{}</p>\
             <p>The code is valid for 10 minutes.</p>\
             <p>If you didn't request a password reset, you can safely ignore \
             this email. Your password will remain unchanged.</p>",
            otp
        );

        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "from": self.from,
                "to": [email],
                "subject": subject,
                "html": html,
            }))
            .send()
            .await
            .map_err(|e| AppError::email(format!("Email API error: {}", e)))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(AppError::email(format!(
                "Email sending failed with status: {}",
                response.status()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(base_url: String) -> EmailService {
        EmailService::with_base_url(
            "re_test_key".to_string(),
            "FlexiFit <onboarding@resend.dev>".to_string(),
            base_url,
        )
    }

    #[tokio::test]
    async fn posts_resend_shaped_payload() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(header("authorization", "Bearer re_test_key"))
            .and(body_partial_json(json!({
                "from": "FlexiFit <onboarding@resend.dev>",
                "to": ["user@example.com"],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "em_1" })))
            .expect(1)
            .mount(&server)
            .await;

        let result = service(server.uri())
            .send_reset_code("user@example.com", "123456")
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = service(server.uri())
            .send_reset_code("user@example.com", "123456")
            .await;
        assert!(matches!(result, Err(AppError::EmailError(_))));
    }

    #[tokio::test]
    async fn email_body_contains_the_code() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(wiremock::matchers::body_string_contains("654321"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let result = service(server.uri())
            .send_reset_code("user@example.com", "654321")
            .await;
        assert!(result.is_ok());
    }
}
