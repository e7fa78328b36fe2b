use axum::{extract::State, Extension};
use serde::Serialize;

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::crud::Entity;
use crate::database::models::{ContactMessage, Education, Experience, Skill};
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct Section {
    pub label: &'static str,
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub user: AuthUser,
    pub sections: Vec<Section>,
    pub unread_messages: usize,
}

fn section<E: Entity>() -> Section {
    Section { label: E::LABEL, path: format!("/admin/{}", E::PATH) }
}

/// GET /admin - Signed-in user, admin sections and unread message count
pub async fn dashboard_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Dashboard> {
    let unread_messages = state.repo::<ContactMessage>().count_where("read", false).await?;

    let sections = vec![
        Section { label: "Profile", path: "/admin/profile".to_string() },
        section::<Experience>(),
        section::<Education>(),
        section::<Skill>(),
        Section { label: "Messages", path: "/admin/messages".to_string() },
    ];

    Ok(ApiResponse::success(Dashboard { user, sections, unread_messages }))
}
