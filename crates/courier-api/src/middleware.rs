use anyhow::anyhow;
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Basic};
use tracing::debug;

use crate::auth::AppState;
use crate::error::ApiError;

/// Username that passed the credential check, for handlers downstream.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub String);

/// Validate HTTP Basic credentials against the users table.
///
/// Runs before every protected handler; credentials are re-verified on each
/// request, no sessions or tokens. Missing header, unknown user, and wrong
/// password all collapse into the same 401 so the response never reveals
/// whether a username exists.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(Authorization(basic)) = req.headers().typed_get::<Authorization<Basic>>() else {
        return Err(ApiError::Unauthorized);
    };

    let db = state.clone();
    let username = basic.username().to_string();
    let lookup = username.clone();
    let user = tokio::task::spawn_blocking(move || db.db.get_user_by_username(&lookup))
        .await
        .map_err(|e| anyhow!("spawn_blocking join error: {}", e))??;

    let Some(user) = user else {
        debug!(username = %username, "auth rejected: unknown user");
        return Err(ApiError::Unauthorized);
    };

    // Constant-time verify against the stored Argon2id hash
    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| anyhow!("stored hash for {} is unreadable: {}", user.username, e))?;

    if Argon2::default()
        .verify_password(basic.password().as_bytes(), &parsed_hash)
        .is_err()
    {
        debug!(username = %username, "auth rejected: password mismatch");
        return Err(ApiError::Unauthorized);
    }

    req.extensions_mut().insert(AuthenticatedUser(user.username));
    Ok(next.run(req).await)
}
