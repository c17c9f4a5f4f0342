use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};

use super::auth::extract_bearer_from_headers;
use crate::config;
use crate::error::ApiError;

/// Static bearer-token check for the edge-function tier (OTP endpoints,
/// dev seeding). These calls are made by trusted frontends before any
/// user session exists, so they authenticate with the deployment's
/// service key rather than a JWT.
pub async fn service_key_middleware(
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, impl IntoResponse> {
    let token = extract_bearer_from_headers(&headers)
        .map_err(|msg| {
            let api_error = ApiError::unauthorized(msg);
            (
                StatusCode::from_u16(api_error.status_code()).unwrap(),
                Json(api_error.to_json()),
            )
        })?;

    let service_key = &config::config().security.service_key;
    if service_key.is_empty() || token != *service_key {
        let api_error = ApiError::unauthorized("Invalid service key");
        return Err((
            StatusCode::from_u16(api_error.status_code()).unwrap(),
            Json(api_error.to_json()),
        ));
    }

    Ok(next.run(request).await)
}
