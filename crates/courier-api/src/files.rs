use anyhow::anyhow;
use axum::{
    Extension, Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::warn;

use courier_types::api::StatusResponse;
use courier_types::models::MessageKind;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::AuthenticatedUser;
use crate::storage::sanitize_filename;

/// POST /message/file — the first file field of the multipart stream becomes
/// the blob; its locator is what gets persisted as the message content.
pub async fn post_file(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthenticatedUser>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::Validation("malformed multipart body"))?
    {
        let Some(original) = field.file_name() else {
            continue;
        };
        let filename =
            sanitize_filename(original).ok_or(ApiError::Validation("unusable filename"))?;

        let locator = state
            .storage
            .save_field(&filename, field)
            .await
            .map_err(|e| anyhow!("blob write for {} failed: {}", filename, e))?;
        let locator = locator.to_string_lossy().into_owned();

        let db = state.clone();
        let content = locator.clone();
        let insert = tokio::task::spawn_blocking(move || {
            db.db.insert_message(&content, MessageKind::File.as_str())
        })
        .await
        .map_err(|e| anyhow!("spawn_blocking join error: {}", e))?;

        if let Err(e) = insert {
            // The blob is already on disk and nothing references it now.
            warn!("insert failed: {}; blob {} is orphaned", e, locator);
            return Err(ApiError::Internal(e));
        }

        return Ok((
            StatusCode::CREATED,
            Json(StatusResponse {
                message: "file message posted",
            }),
        ));
    }

    Err(ApiError::Validation("file field is required"))
}
