use std::sync::Arc;

use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use courier_db::Database;
use courier_types::api::{RegisterRequest, StatusResponse};

use crate::error::ApiError;
use crate::storage::Storage;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub storage: Storage,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation("username and password are required"));
    }

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| anyhow!("password hashing failed: {}", e))?
        .to_string();

    // Run blocking DB insert off the async runtime
    let db = state.clone();
    tokio::task::spawn_blocking(move || db.db.create_user(&req.username, &password_hash))
        .await
        .map_err(|e| anyhow!("spawn_blocking join error: {}", e))??;

    Ok((
        StatusCode::CREATED,
        Json(StatusResponse {
            message: "user registered",
        }),
    ))
}
