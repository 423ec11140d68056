use super::error::*;
use crate::application_port::TokenVerificationService;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::{self, reject};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn err(code: ApiErrorCode, message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UserInfoQuery {
    pub provider: Option<String>,
}

/// Replies with the bare `{id, email, name}` object on success.
pub async fn user_info(
    provider: String,
    authorization: Option<String>,
    verification_service: Arc<dyn TokenVerificationService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let user = verification_service
        .verify(authorization.as_deref().unwrap_or_default(), &provider)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&user))
}
