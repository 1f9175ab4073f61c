use anyhow::anyhow;
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;

use courier_db::models::MessageRow;
use courier_types::api::{MessageResponse, PostTextRequest, StatusResponse};
use courier_types::models::MessageKind;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::AuthenticatedUser;

/// Ceiling on page size; client values above it are clamped, not rejected.
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    pub id: i64,
}

pub async fn post_text(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthenticatedUser>,
    Json(req): Json<PostTextRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.content.is_empty() {
        return Err(ApiError::Validation("content is required"));
    }

    // Run blocking DB insert off the async runtime
    let db = state.clone();
    tokio::task::spawn_blocking(move || {
        db.db.insert_message(&req.content, MessageKind::Text.as_str())
    })
    .await
    .map_err(|e| anyhow!("spawn_blocking join error: {}", e))??;

    Ok((
        StatusCode::CREATED,
        Json(StatusResponse {
            message: "text message created",
        }),
    ))
}

pub async fn list_messages(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Extension(_user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = query.limit.min(MAX_PAGE_SIZE);
    let offset = u64::from(query.page.max(1) - 1) * u64::from(limit);

    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_messages(limit, offset))
        .await
        .map_err(|e| anyhow!("spawn_blocking join error: {}", e))??;

    let messages: Vec<MessageResponse> = rows.into_iter().map(to_response).collect();
    Ok(Json(messages))
}

/// GET /message/content — the stored kind decides the representation: the
/// literal body as plain text, or the blob with a MIME type inferred from
/// the locator's extension.
pub async fn get_content(
    State(state): State<AppState>,
    Query(query): Query<ContentQuery>,
    Extension(_user): Extension<AuthenticatedUser>,
) -> Result<Response, ApiError> {
    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || db.db.get_message(query.id))
        .await
        .map_err(|e| anyhow!("spawn_blocking join error: {}", e))??
        .ok_or(ApiError::NotFound("message"))?;

    let kind = MessageKind::from_db(&row.kind)
        .ok_or_else(|| anyhow!("message {} has corrupt kind '{}'", row.id, row.kind))?;

    match kind {
        MessageKind::Text => Ok((
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string())],
            row.content,
        )
            .into_response()),
        MessageKind::File => {
            let bytes = match tokio::fs::read(&row.content).await {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    warn!("blob for message {} is gone from {}", row.id, row.content);
                    return Err(ApiError::NotFound("file"));
                }
                Err(e) => return Err(anyhow!("failed to read {}: {}", row.content, e).into()),
            };

            let mime = mime_guess::from_path(&row.content).first_or_octet_stream();
            Ok(([(header::CONTENT_TYPE, mime.to_string())], bytes).into_response())
        }
    }
}

fn to_response(row: MessageRow) -> MessageResponse {
    let kind = MessageKind::from_db(&row.kind).unwrap_or_else(|| {
        warn!("message {} has corrupt kind '{}'", row.id, row.kind);
        MessageKind::Text
    });
    let created_at = parse_created_at(&row.created_at, row.id);

    MessageResponse {
        id: row.id,
        content: row.content,
        kind,
        created_at,
    }
}

fn parse_created_at(raw: &str, id: i64) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
            // Parse as naive UTC and convert.
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' on message {}: {}", raw, id, e);
            DateTime::default()
        })
}
