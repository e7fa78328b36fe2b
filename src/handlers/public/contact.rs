// handlers/public/contact.rs - POST /contact handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::app::AppState;
use crate::crud::Form;
use crate::database::models::{ContactForm, ContactMessage};
use crate::middleware::{ApiResponse, ApiResult};

/// POST /contact - Leave a message for the site owner
///
/// Expected Input:
/// ```json
/// { "name": "Grace", "email": "grace@example.com", "subject": "", "message": "Hello!" }
/// ```
///
/// A blank or missing subject is stored as the configured default subject.
/// New messages are always unread. Responds `201` with the stored message.
pub async fn contact_post(
    State(state): State<AppState>,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> ApiResult<ContactMessage> {
    let Json(form) = payload?;
    form.validate()?;

    let row = form.into_row_with_subject(&state.config.site.default_contact_subject);
    let message = state.repo::<ContactMessage>().create(row).await?;

    tracing::info!(message_id = %message.id, "Contact message received");
    Ok(ApiResponse::created(message))
}
