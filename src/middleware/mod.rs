pub mod auth;
pub mod response;

pub use auth::{ensure_can_act_for, require_admin, require_authenticated};
pub use response::{ApiResponse, ApiResult};
