use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};
use crate::config;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::otp_service::OtpError;
use crate::services::{ClaimService, OtpService, ProfileService};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub phone: String,
    /// A previously verified OTP session
    pub otp_id: Uuid,
}

/// POST /auth/login - Exchange a verified OTP session for a JWT
///
/// Expected Input:
/// ```json
/// {
///   "phone": "081234567890",
///   "otp_id": "otp_uuid"
/// }
/// ```
///
/// Expected Output (Success):
/// ```json
/// {
///   "success": true,
///   "data": {
///     "token": "eyJhbGciOiJIUzI1NiI...",
///     "user": { "id": "...", "nama": "...", "role": "user" },
///     "expires_in": 14400
///   }
/// }
/// ```
pub async fn login(Json(payload): Json<LoginRequest>) -> ApiResult<Value> {
    let otp_service = OtpService::new().await.map_err(login_otp_error)?;
    let otp = otp_service
        .find_verified(&payload.phone, payload.otp_id)
        .await
        .map_err(login_otp_error)?;

    let profiles = ProfileService::new().await?;
    let profile = profiles
        .find_by_phone(&otp.phone)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Akun tidak ditemukan untuk nomor ini"))?;

    // Fresh sign-in: drop any stale cached claim snapshot
    let claims_service = ClaimService::new().await?;
    claims_service.invalidate(profile.id).await;

    let token = generate_jwt(Claims::new(profile.id, profile.phone.clone(), profile.role))?;
    let expires_in = config::config().security.jwt_expiry_hours * 3600;

    tracing::info!("Login: profile {} ({:?})", profile.id, profile.role);
    Ok(ApiResponse::success(json!({
        "token": token,
        "user": {
            "id": profile.id,
            "nama": profile.nama,
            "role": profile.role,
            "status_account": profile.status_account,
        },
        "expires_in": expires_in,
    })))
}

fn login_otp_error(err: OtpError) -> ApiError {
    match err {
        OtpError::NotFound => ApiError::unauthorized("OTP belum diverifikasi atau tidak ditemukan"),
        other => {
            tracing::error!("OTP lookup failed during login: {}", other);
            ApiError::internal_server_error("An error occurred while processing your request")
        }
    }
}
