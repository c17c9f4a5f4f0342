// POST /auth/otp/request and /auth/otp/verify
//
// This is the edge-function boundary: responses carry explicit
// machine-readable fields (`error`, `expired`, `max_attempts`,
// `attempts_remaining`) instead of relying on the HTTP status alone, and
// user-facing messages are in Indonesian. Every validation failure is a
// 400; only unexpected errors produce a 500.

use axum::{http::StatusCode, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};
use crate::config;
use crate::is_development;
use crate::services::otp_service::OtpError;
use crate::services::{ClaimService, OtpService, ProfileService};

#[derive(Debug, Deserialize)]
pub struct OtpRequestBody {
    pub phone: String,
    /// Claim whose phone verification this code completes
    pub claim_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct OtpVerifyBody {
    pub phone: String,
    pub otp_code: String,
    pub otp_id: Option<Uuid>,
}

/// POST /auth/otp/request - Issue a fresh OTP for a phone number
///
/// The code itself goes out through the SMS provider; the response only
/// carries it in development mode so local frontends can complete the
/// flow without one.
pub async fn otp_request(Json(body): Json<OtpRequestBody>) -> (StatusCode, Json<Value>) {
    // Input shape is checked before any database work so malformed
    // requests get their 400 even when the pool is down
    if !crate::services::otp_service::is_valid_phone(&body.phone) {
        return otp_error_response(OtpError::InvalidPhone);
    }

    let service = match OtpService::new().await {
        Ok(service) => service,
        Err(e) => return otp_error_response(e),
    };

    let issued = match service.issue(&body.phone, body.claim_id).await {
        Ok(issued) => issued,
        Err(e) => return otp_error_response(e),
    };

    let mut response = json!({
        "success": true,
        "otp_id": issued.id,
        "expires_at": issued.expires_at,
    });
    if is_development!() && config::config().otp.expose_codes {
        response["otp_code"] = json!(issued.code);
    }

    (StatusCode::OK, Json(response))
}

/// POST /auth/otp/verify - Verify a submitted OTP code
///
/// On success the row is marked verified, a linked claim advances from
/// draft to pending, and a session token is issued when a profile exists
/// for the phone.
pub async fn otp_verify(Json(body): Json<OtpVerifyBody>) -> (StatusCode, Json<Value>) {
    if !crate::services::otp_service::is_valid_phone(&body.phone) {
        return otp_error_response(OtpError::InvalidPhone);
    }
    if !crate::services::otp_service::is_valid_code(&body.otp_code) {
        return otp_error_response(OtpError::InvalidCode);
    }

    let service = match OtpService::new().await {
        Ok(service) => service,
        Err(e) => return otp_error_response(e),
    };

    let verified = match service.verify(&body.phone, &body.otp_code, body.otp_id).await {
        Ok(verified) => verified,
        Err(e) => return otp_error_response(e),
    };

    // Advance the linked claim. A failure here is logged, not surfaced:
    // the verification itself already succeeded and retrying the claim
    // advance belongs to the next request.
    if let Some(claim_id) = verified.claim_id {
        match ClaimService::new().await {
            Ok(claims) => {
                if let Err(e) = claims.mark_verified(claim_id).await {
                    tracing::error!("Failed to advance claim {} after verification: {}", claim_id, e);
                }
            }
            Err(e) => {
                tracing::error!("Claim service unavailable after verification: {}", e);
            }
        }
    }

    let mut response = json!({
        "success": true,
        "verified": true,
    });

    // Issue a session token when the phone already belongs to a profile
    match ProfileService::new().await {
        Ok(profiles) => match profiles.find_by_phone(&verified.phone).await {
            Ok(Some(profile)) => {
                if let Ok(claims) = ClaimService::new().await {
                    // Fresh sign-in: drop any stale cached claim snapshot
                    claims.invalidate(profile.id).await;
                }
                match generate_jwt(Claims::new(profile.id, profile.phone.clone(), profile.role)) {
                    Ok(token) => {
                        response["token"] = json!(token);
                        response["user"] = json!({
                            "id": profile.id,
                            "nama": profile.nama,
                            "role": profile.role,
                            "status_account": profile.status_account,
                        });
                    }
                    Err(e) => tracing::error!("Failed to issue session token: {}", e),
                }
            }
            Ok(None) => {}
            Err(e) => tracing::error!("Profile lookup failed after verification: {}", e),
        },
        Err(e) => tracing::error!("Profile service unavailable after verification: {}", e),
    }

    (StatusCode::OK, Json(response))
}

/// Map service errors to the edge-function wire format.
fn otp_error_response(err: OtpError) -> (StatusCode, Json<Value>) {
    let (status, body) = match err {
        OtpError::InvalidPhone => (
            StatusCode::BAD_REQUEST,
            json!({ "error": "Format nomor telepon tidak valid" }),
        ),
        OtpError::InvalidCode => (
            StatusCode::BAD_REQUEST,
            json!({ "error": "Kode OTP harus 6 digit" }),
        ),
        OtpError::NotFound => (
            StatusCode::BAD_REQUEST,
            json!({ "error": "Kode OTP tidak ditemukan atau sudah digunakan" }),
        ),
        OtpError::Expired => (
            StatusCode::BAD_REQUEST,
            json!({ "error": "Kode OTP sudah kedaluwarsa. Silakan minta kode baru.", "expired": true }),
        ),
        OtpError::MaxAttempts => (
            StatusCode::BAD_REQUEST,
            json!({ "error": "Terlalu banyak percobaan. Silakan minta kode baru.", "max_attempts": true }),
        ),
        OtpError::CodeMismatch { attempts_remaining } => (
            StatusCode::BAD_REQUEST,
            json!({ "error": "Kode OTP salah.", "attempts_remaining": attempts_remaining }),
        ),
        OtpError::Database(e) => {
            tracing::error!("OTP database error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Terjadi kesalahan pada server" }),
            )
        }
        OtpError::Manager(e) => {
            tracing::error!("OTP database manager error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Terjadi kesalahan pada server" }),
            )
        }
    };
    (status, Json(body))
}
