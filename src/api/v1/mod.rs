mod error;
mod handler;
mod router;

pub use error::{ApiError, ApiErrorCode, recover_error};
pub use handler::ApiResponse;
pub use router::{auth_routes, routes};
