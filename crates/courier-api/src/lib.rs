pub mod auth;
pub mod error;
pub mod files;
pub mod messages;
pub mod middleware;
pub mod storage;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use crate::auth::AppState;

/// Assemble the full route table. Registration is the only public endpoint;
/// everything else sits behind the Basic-auth gate.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/account/register", post(auth::register))
        .with_state(state.clone());

    let protected = Router::new()
        .route("/message/text", post(messages::post_text))
        .route("/message/file", post(files::post_file))
        .route("/message/list", get(messages::list_messages))
        .route("/message/content", get(messages::get_content))
        .layer(from_fn_with_state(state.clone(), middleware::require_auth))
        .with_state(state);

    Router::new().merge(public).merge(protected)
}
