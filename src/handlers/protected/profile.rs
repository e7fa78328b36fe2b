// handlers/protected/profile.rs - GET|PUT /admin/profile

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde_json::Value;

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::crud::Form;
use crate::database::models::{Profile, ProfileForm};
use crate::database::Table;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /admin/profile - The caller's profile, `null` if never saved
pub async fn profile_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Option<Profile>> {
    let profile = state.repo::<Profile>().find_by("user_id", user.user_id.to_string()).await?;
    Ok(ApiResponse::success(profile))
}

/// PUT /admin/profile - Validate and upsert the caller's profile
///
/// One lookup by `user_id`, then one write: update when a profile exists,
/// insert otherwise.
pub async fn profile_put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<ProfileForm>, JsonRejection>,
) -> ApiResult<Profile> {
    let Json(form) = payload?;
    form.validate()?;

    let _ticket = state.submissions.begin(user.user_id, Table::Profiles)?;
    let profiles = state.repo::<Profile>();
    let row = form.into_row();

    let saved = match profiles.find_by("user_id", user.user_id.to_string()).await? {
        Some(existing) => profiles.update(existing.id, row).await?,
        None => {
            let mut row = row;
            row.insert("user_id".to_string(), Value::String(user.user_id.to_string()));
            profiles.create(row).await?
        }
    };

    tracing::info!(user_id = %user.user_id, "Profile saved");
    Ok(ApiResponse::success(saved))
}
