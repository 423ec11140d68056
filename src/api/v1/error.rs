use crate::api::v1::handler::ApiResponse;
use crate::application_port::*;
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use tracing::warn;
use warp::http::StatusCode;
use warp::{Rejection, reject};

pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    if let Some(code) = err.find::<ApiErrorCode>() {
        let json = warp::reply::json(&ApiResponse::<()>::err(*code, code.to_string()));
        Ok(warp::reply::with_status(json, code.status()))
    } else {
        let code = if err.is_not_found() {
            ApiErrorCode::NotFound
        } else if err.find::<reject::InvalidQuery>().is_some() {
            ApiErrorCode::InvalidRequest
        } else if err.find::<reject::MethodNotAllowed>().is_some() {
            ApiErrorCode::MethodNotAllowed
        } else {
            warn!("unhandled rejection: {:?}", err);
            ApiErrorCode::InternalError
        };
        let json = warp::reply::json(&ApiResponse::<()>::err(code, code.to_string()));
        Ok(warp::reply::with_status(json, code.status()))
    }
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum ApiErrorCode {
    #[error("Provider is required")]
    MissingProvider,
    #[error("Authorization header is required")]
    MissingToken,
    #[error("Unsupported provider")]
    UnsupportedProvider,
    #[error("Failed to verify token with provider")]
    ProviderUnreachable,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Failed to decode response from provider")]
    ProviderResponseInvalid,
    #[error("Missing required user information")]
    MissingUserInfo,
    #[error("Malformed request")]
    InvalidRequest,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Not found")]
    NotFound,
    #[error("Internal error")]
    InternalError,
}

impl ApiErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ApiErrorCode::MissingProvider
            | ApiErrorCode::UnsupportedProvider
            | ApiErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ApiErrorCode::MissingToken
            | ApiErrorCode::InvalidToken
            | ApiErrorCode::MissingUserInfo => StatusCode::UNAUTHORIZED,
            ApiErrorCode::ProviderUnreachable => StatusCode::BAD_GATEWAY,
            ApiErrorCode::ProviderResponseInvalid | ApiErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiErrorCode::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl reject::Reject for ApiErrorCode {}

impl From<VerifyError> for ApiErrorCode {
    fn from(error: VerifyError) -> Self {
        match error {
            VerifyError::MissingProvider => ApiErrorCode::MissingProvider,
            VerifyError::MissingToken => ApiErrorCode::MissingToken,
            VerifyError::UnsupportedProvider(_) => ApiErrorCode::UnsupportedProvider,
            VerifyError::ProviderUnreachable(_) => ApiErrorCode::ProviderUnreachable,
            VerifyError::InvalidToken => ApiErrorCode::InvalidToken,
            VerifyError::DecodeFailure(_) => ApiErrorCode::ProviderResponseInvalid,
            VerifyError::MissingUserInfo => ApiErrorCode::MissingUserInfo,
        }
    }
}
