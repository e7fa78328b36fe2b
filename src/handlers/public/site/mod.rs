pub mod content;

use crate::middleware::ApiResponse;
use content::{SiteContent, SITE};

/// GET / - Portfolio sections (hero, about, projects, experience, contact)
pub async fn index() -> ApiResponse<SiteContent> {
    ApiResponse::success(SITE)
}
