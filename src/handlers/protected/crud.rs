// handlers/protected/crud.rs - /admin/:table and /admin/:table/:id
//
// One set of handlers shared by every `Entity`; the router instantiates them
// per table.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::crud::{check_patch, draft_row, sets_end_date_only, to_row, Entity, Form};
use crate::middleware::{ApiResponse, ApiResult};

/// GET /admin/:table - All rows in the entity's fixed order
pub async fn list<E: Entity>(State(state): State<AppState>) -> ApiResult<Vec<E>> {
    let rows = state.repo::<E>().list().await?;
    Ok(ApiResponse::success(rows))
}

/// GET /admin/:table/:id
pub async fn show<E: Entity>(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<E> {
    let Path(id) = id?;
    let row = state.repo::<E>().select_404(id).await?;
    Ok(ApiResponse::success(row))
}

/// POST /admin/:table - Create from a full draft; `201` with the stored row
pub async fn create<E: Entity>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<E::Draft>, JsonRejection>,
) -> ApiResult<E> {
    let Json(draft) = payload?;
    draft.validate()?;

    let _ticket = state.submissions.begin(user.user_id, E::TABLE)?;
    let created = state.repo::<E>().create(draft_row::<E>(draft, user.user_id)).await?;

    tracing::info!(table = %E::TABLE, id = %created.id(), "{} created", E::LABEL);
    Ok(ApiResponse::created(created))
}

/// PUT|PATCH /admin/:table/:id - Partial update; absent fields are unchanged
pub async fn update<E: Entity>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<E::Patch>, JsonRejection>,
) -> ApiResult<E> {
    let Path(id) = id?;
    let Json(patch) = payload?;
    patch.validate()?;

    let _ticket = state.submissions.begin(user.user_id, E::TABLE)?;
    let repo = state.repo::<E>();
    let changes = patch.into_row();
    if sets_end_date_only(&changes) {
        let stored = repo.select_404(id).await?;
        check_patch(&to_row(&stored), &changes)?;
    }
    let updated = repo.update(id, changes).await?;

    tracing::info!(table = %E::TABLE, %id, "{} updated", E::LABEL);
    Ok(ApiResponse::success(updated))
}

/// DELETE /admin/:table/:id - `404` when the id is unknown
pub async fn delete<E: Entity>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Value> {
    let Path(id) = id?;

    let _ticket = state.submissions.begin(user.user_id, E::TABLE)?;
    state.repo::<E>().delete(id).await?;

    tracing::info!(table = %E::TABLE, %id, "{} deleted", E::LABEL);
    Ok(ApiResponse::success(json!({ "id": id, "deleted": true })))
}
