pub mod response;
pub mod session;
pub mod submit_guard;

pub use response::{ApiResponse, ApiResult};
pub use session::{require_session, MaybeUser, LOGIN_PATH};
pub use submit_guard::{SubmitGuard, SubmitTicket};
