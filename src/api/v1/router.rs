use super::error::ApiErrorCode;
use super::handler::{self, UserInfoQuery};
use crate::application_port::TokenVerificationService;
use crate::server::*;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::HeaderMap;
use warp::http::header::AUTHORIZATION;
use warp::{Filter, reject};

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    auth_routes(
        server.token_verification_service.clone(),
        server.default_provider.clone(),
    )
}

pub fn auth_routes(
    verification_service: Arc<dyn TokenVerificationService>,
    default_provider: String,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    // GET /auth/userinfo[?provider=name]
    let user_info = warp::path("auth")
        .and(warp::path("userinfo"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<UserInfoQuery>())
        .map(move |query: UserInfoQuery| {
            query.provider.unwrap_or_else(|| default_provider.clone())
        })
        .and(with_authorization())
        .and(with(verification_service.clone()))
        .and_then(handler::user_info);

    // GET /auth/<provider>/userinfo
    let provider_user_info = warp::path("auth")
        .and(warp::path::param::<String>())
        .and(warp::path("userinfo"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_authorization())
        .and(with(verification_service))
        .and_then(handler::user_info);

    user_info.or(provider_user_info)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

/// Absent header reads as `None`; a value that is not visible ASCII can't carry a
/// usable token and is rejected as invalid.
fn with_authorization() -> impl Filter<Extract = (Option<String>,), Error = warp::Rejection> + Clone
{
    warp::header::headers_cloned().and_then(|headers: HeaderMap| async move {
        match headers.get(AUTHORIZATION) {
            None => Ok(None),
            Some(value) => value
                .to_str()
                .map(|s| Some(s.to_string()))
                .map_err(|_| reject::custom(ApiErrorCode::InvalidToken)),
        }
    })
}
