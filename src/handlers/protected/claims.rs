use axum::extract::Extension;
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config;
use crate::database::models::Claim;
use crate::error::ApiError;
use crate::is_development;
use crate::middleware::{ApiResponse, ApiResult, ValidatedProfile};
use crate::services::otp_service::OtpError;
use crate::services::{ClaimService, OtpService, SubmitClaim};
use crate::types::{JenisPengajuan, Role};

#[derive(Debug, Deserialize)]
pub struct ClaimSubmission {
    pub jenis_pengajuan: JenisPengajuan,
    pub pesantren_nama: String,
    /// Legacy institution code; required for klaim
    pub nip: Option<String>,
    /// Required for pesantren_baru
    pub region_code: Option<String>,
}

/// POST /api/claims - Submit an institution claim or registration
///
/// Creates the claim in draft and issues an OTP to the submitter's
/// phone; verifying that code advances the claim to pending.
pub async fn claim_post(
    Extension(ValidatedProfile(profile)): Extension<ValidatedProfile>,
    Json(body): Json<ClaimSubmission>,
) -> ApiResult<Value> {
    if profile.role != Role::User {
        return Err(ApiError::forbidden("Only user accounts can submit claims"));
    }

    let service = ClaimService::new().await?;
    let claim = service
        .submit(
            profile.id,
            SubmitClaim {
                jenis_pengajuan: body.jenis_pengajuan,
                pesantren_nama: body.pesantren_nama,
                nip: body.nip,
                region_code: body.region_code,
            },
        )
        .await?;

    let otp_service = OtpService::new().await.map_err(submission_otp_error)?;
    let issued = otp_service
        .issue(&profile.phone, Some(claim.id))
        .await
        .map_err(submission_otp_error)?;

    let mut response = json!({
        "claim": claim,
        "otp_id": issued.id,
        "expires_at": issued.expires_at,
    });
    if is_development!() && config::config().otp.expose_codes {
        response["otp_code"] = json!(issued.code);
    }
    Ok(ApiResponse::created(response))
}

/// GET /api/claims/mine - The caller's claim, if any
pub async fn claim_mine_get(
    Extension(ValidatedProfile(profile)): Extension<ValidatedProfile>,
) -> ApiResult<Option<Claim>> {
    let service = ClaimService::new().await?;
    let claim = service.claim_for_user(profile.id).await?;
    Ok(ApiResponse::success(claim))
}

fn submission_otp_error(err: OtpError) -> ApiError {
    match err {
        OtpError::InvalidPhone => {
            ApiError::bad_request("Nomor telepon pada profil tidak valid untuk verifikasi OTP")
        }
        other => {
            tracing::error!("Failed to issue OTP for claim submission: {}", other);
            ApiError::internal_server_error("An error occurred while processing your request")
        }
    }
}
