use axum::{extract::State, response::Json, Extension};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use mongodb::bson::{doc, oid::ObjectId, DateTime};
use mongodb::Collection;
use validator::Validate;

use crate::errors::{AppError, Result};
use crate::models::user::{
    AuthResponse, Claims, LoginRequest, RegisterRequest, User, UserResponse,
};
use crate::state::AppState;

const SESSION_TTL_SECS: i64 = 86_400; // 24 hours

fn issue_session_token(jwt_secret: &str, user: &User) -> Result<String> {
    let claims = Claims {
        sub: user.id.map(|id| id.to_hex()).unwrap_or_default(),
        email: user.email.clone(),
        user_type: user.user_type,
        exp: (Utc::now().timestamp() + SESSION_TTL_SECS) as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_ref()),
    )
    .map_err(|e| AppError::service(format!("Token generation failed: {}", e)))
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>> {
    payload.validate()?;

    let collection: Collection<User> = state.db.collection("users");

    let existing = collection
        .find_one(doc! { "email": &payload.email })
        .await?;
    if existing.is_some() {
        return Err(AppError::DuplicateEntry);
    }

    let password_hash = hash(&payload.password, DEFAULT_COST)
        .map_err(|e| AppError::service(format!("Password hashing failed: {}", e)))?;

    let now = Utc::now();
    let user = User {
        id: Some(ObjectId::new()),
        email: payload.email,
        full_name: payload.full_name,
        user_type: payload.user_type,
        password_hash,
        created_at: now,
        updated_at: now,
        last_sign_in_at: None,
    };

    collection.insert_one(&user).await?;

    let token = issue_session_token(&state.config.jwt_secret, &user)?;

    Ok(Json(AuthResponse {
        user: UserResponse::from(user),
        token,
    }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let collection: Collection<User> = state.db.collection("users");

    let mut user = collection
        .find_one(doc! { "email": &payload.email })
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let valid = verify(&payload.password, &user.password_hash)
        .map_err(|_| AppError::InvalidCredentials)?;
    if !valid {
        return Err(AppError::InvalidCredentials);
    }

    let now = DateTime::from_millis(Utc::now().timestamp_millis());
    collection
        .update_one(
            doc! { "_id": user.id },
            doc! { "$set": { "last_sign_in_at": now } },
        )
        .await?;
    user.last_sign_in_at = Some(now);

    let token = issue_session_token(&state.config.jwt_secret, &user)?;

    Ok(Json(AuthResponse {
        user: UserResponse::from(user),
        token,
    }))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<UserResponse>> {
    let collection: Collection<User> = state.db.collection("users");

    let user_id = ObjectId::parse_str(&claims.sub)?;
    let user = collection
        .find_one(doc! { "_id": user_id })
        .await?
        .ok_or(AppError::UserNotFound)?;

    Ok(Json(UserResponse::from(user)))
}
