use axum::extract::State;
use axum::{http::Method, response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

mod config;
mod database;
mod errors;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;
mod state;

use config::AppConfig;
use database::connection::get_db_client;
use state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    create_directories().await;

    let config = AppConfig::from_env();
    if config.resend_api_key.is_empty() {
        tracing::warn!("RESEND_API_KEY not set; password reset emails will fail to send");
    }

    let db = get_db_client(&config.database_url, &config.database_name).await;

    let port = config.port;
    let app_state = AppState::new(db, config);

    let app = build_router(app_state);
    start_server(app, port).await;
}

async fn create_directories() {
    if let Err(e) = tokio::fs::create_dir_all("uploads/images").await {
        tracing::warn!("Failed to create uploads/images: {}", e);
    }
}

fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .allow_credentials(false);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/api/health", get(api_health_check))
        .nest("/api/auth", routes::auth::routes(app_state.clone()))
        .nest("/api", routes::auth_otp_routes::auth_otp_routes())
        .nest("/api/gyms", routes::gyms::routes(app_state.clone()))
        .nest("/api/bookings", routes::bookings::routes(app_state.clone()))
        .nest("/api/favorites", routes::favorites::routes(app_state.clone()))
        .nest("/api", routes::upload::routes(app_state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

async fn start_server(app: Router, port: u16) {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!("🚀 Server starting on {}", addr);

    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Server error: {}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    }
}

async fn root_handler() -> &'static str {
    "🏋️ FlexiFit Gym Booking API"
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn api_health_check(State(state): State<AppState>) -> Json<Value> {
    use mongodb::bson::doc;

    let db_status = match state.db.run_command(doc! { "ping": 1 }).await {
        Ok(_) => "connected",
        Err(_) => "disconnected",
    };

    Json(json!({
        "status": "healthy",
        "database": db_status,
        "email": !state.config.resend_api_key.is_empty(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use mongodb::bson::oid::ObjectId;
    use tower::ServiceExt;

    use crate::handlers::upload::MAX_IMAGE_BYTES;
    use crate::models::user::{Claims, UserType};

    const JWT_SECRET: &str = "router-test-secret";
    const BOUNDARY: &str = "router-test-boundary";

    async fn test_state() -> AppState {
        // The client is lazy; these tests never touch the wire.
        let client = mongodb::Client::with_uri_str("mongodb://localhost:27017")
            .await
            .unwrap();
        let config = AppConfig {
            database_url: "mongodb://localhost:27017".to_string(),
            database_name: "flexifit_test".to_string(),
            jwt_secret: JWT_SECRET.to_string(),
            resend_api_key: String::new(),
            email_from: String::new(),
            app_base_url: "http://localhost:5173".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
        };
        AppState::new(client.database("flexifit_test"), config)
    }

    fn bearer_token() -> String {
        let claims = Claims {
            sub: ObjectId::new().to_hex(),
            email: "uploader@example.com".to_string(),
            user_type: UserType::GymOwner,
            exp: (Utc::now().timestamp() + 3_600) as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
        )
        .unwrap()
    }

    // Multipart body with one "image" field carrying PNG-signed bytes
    fn multipart_png_body(image_len: usize) -> Vec<u8> {
        let mut data = vec![0u8; image_len];
        data[..8].copy_from_slice(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);

        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"image\"; \
                 filename=\"photo.png\"\r\nContent-Type: image/png\r\n\r\n",
                BOUNDARY
            )
            .as_bytes(),
        );
        body.extend_from_slice(&data);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    fn upload_request(image_len: usize) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/upload/image")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .header("authorization", format!("Bearer {}", bearer_token()))
            .body(Body::from(multipart_png_body(image_len)))
            .unwrap()
    }

    #[tokio::test]
    async fn image_between_two_and_five_mib_is_accepted() {
        tokio::fs::create_dir_all("uploads/images").await.unwrap();

        let app = build_router(test_state().await);
        let response = app.oneshot(upload_request(3 * 1024 * 1024)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let file_name = payload["file_name"].as_str().unwrap().to_string();
        tokio::fs::remove_file(format!("uploads/images/{}", file_name))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn oversized_image_reaches_the_size_check() {
        let app = build_router(test_state().await);
        let response = app.oneshot(upload_request(MAX_IMAGE_BYTES + 1)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(payload["error"], "Image too large");
    }
}
