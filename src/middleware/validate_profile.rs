use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};

use super::auth::AuthUser;
use crate::database::manager::DatabaseManager;
use crate::database::models::Profile;
use crate::error::ApiError;

/// Profile row revalidated against the database for this request
#[derive(Clone, Debug)]
pub struct ValidatedProfile(pub Profile);

/// Middleware that validates the subject of the JWT against the live
/// profiles table. Ensures the profile still exists and that the role
/// baked into the token has not drifted from the database.
pub async fn validate_profile_middleware(
    mut request: Request,
    next: Next,
) -> Result<Response, impl IntoResponse> {
    // Get AuthUser from JWT middleware
    let auth_user = request.extensions().get::<AuthUser>()
        .ok_or_else(|| {
            let api_error = ApiError::unauthorized("JWT authentication required before profile validation");
            (
                StatusCode::from_u16(api_error.status_code()).unwrap(),
                Json(api_error.to_json()),
            )
        })?
        .clone();

    let pool = DatabaseManager::pool().await
        .map_err(|e| {
            let api_error: ApiError = e.into();
            (
                StatusCode::from_u16(api_error.status_code()).unwrap(),
                Json(api_error.to_json()),
            )
        })?;

    let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
        .bind(auth_user.user_id)
        .fetch_optional(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Database error validating profile {}: {}", auth_user.user_id, e);
            let api_error = ApiError::internal_server_error("Failed to validate profile");
            (
                StatusCode::from_u16(api_error.status_code()).unwrap(),
                Json(api_error.to_json()),
            )
        })?;

    let profile = profile.ok_or_else(|| {
        tracing::warn!("Profile validation failed: {} no longer exists", auth_user.user_id);
        let api_error = ApiError::unauthorized("Profile no longer exists");
        (
            StatusCode::from_u16(api_error.status_code()).unwrap(),
            Json(api_error.to_json()),
        )
    })?;

    // Verify that JWT claims match the database record
    if profile.role != auth_user.role {
        tracing::warn!(
            "Profile validation failed: JWT role {:?} doesn't match database role {:?} for {}",
            auth_user.role,
            profile.role,
            profile.id
        );
        let api_error = ApiError::forbidden("Session role mismatch, please sign in again");
        return Err((
            StatusCode::from_u16(api_error.status_code()).unwrap(),
            Json(api_error.to_json()),
        ));
    }

    tracing::debug!(
        "Profile validation successful: {} ({:?}, {:?})",
        profile.id,
        profile.role,
        profile.status_account
    );

    // Inject validated profile into request
    request.extensions_mut().insert(ValidatedProfile(profile));

    Ok(next.run(request).await)
}
