// handlers/protected/messages.rs - Contact message inbox

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Extension,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::crud::{Form, Record};
use crate::database::models::{ContactMessage, MessageFlags};
use crate::middleware::{ApiResponse, ApiResult};

/// GET /admin/messages - Newest first
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<ContactMessage>> {
    let messages = state.repo::<ContactMessage>().list().await?;
    Ok(ApiResponse::success(messages))
}

/// GET /admin/messages/:id - No side effects; see `mark_read`
pub async fn show(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<ContactMessage> {
    let Path(id) = id?;
    let message = state.repo::<ContactMessage>().select_404(id).await?;
    Ok(ApiResponse::success(message))
}

/// POST /admin/messages/:id/read - Mark read; a message already read is
/// returned as-is without a write.
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<ContactMessage> {
    let Path(id) = id?;

    let _ticket = state.submissions.begin(user.user_id, ContactMessage::TABLE)?;
    let messages = state.repo::<ContactMessage>();
    let message = messages.select_404(id).await?;
    if message.read {
        return Ok(ApiResponse::success(message));
    }

    let updated = messages.update(id, MessageFlags::mark_read().into_row()).await?;
    tracing::debug!(%id, "Message marked read");
    Ok(ApiResponse::success(updated))
}

/// DELETE /admin/messages/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Value> {
    let Path(id) = id?;

    let _ticket = state.submissions.begin(user.user_id, ContactMessage::TABLE)?;
    state.repo::<ContactMessage>().delete(id).await?;

    tracing::info!(%id, "Message deleted");
    Ok(ApiResponse::success(json!({ "id": id, "deleted": true })))
}
