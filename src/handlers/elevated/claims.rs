use axum::extract::{Extension, Path, Query};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::require_role;
use crate::database::models::Claim;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, ValidatedProfile};
use crate::services::{ClaimService, PaymentService};
use crate::types::{ClaimStatus, JenisPengajuan, Role};

#[derive(Debug, Deserialize)]
pub struct ClaimListQuery {
    pub status: Option<String>,
}

/// GET /api/admin/claims - Monitoring/validation listing
///
/// Regional admins see their own region; central admins see everything.
pub async fn claims_list_get(
    Extension(ValidatedProfile(profile)): Extension<ValidatedProfile>,
    Query(query): Query<ClaimListQuery>,
) -> ApiResult<Vec<Claim>> {
    require_role(&profile, &[Role::AdminRegional, Role::AdminPusat])?;

    let status = match query.status.as_deref() {
        None => None,
        Some(s) => Some(
            ClaimStatus::parse(s)
                .ok_or_else(|| ApiError::bad_request(format!("Unknown claim status: {}", s)))?,
        ),
    };
    let region = match profile.role {
        Role::AdminRegional => profile.region_code.as_deref(),
        _ => None,
    };

    let service = ClaimService::new().await?;
    let claims = service.list(status, region).await?;
    Ok(ApiResponse::success(claims))
}

/// POST /api/admin/claims/:id/approve - Regional sign-off
///
/// Approving a pesantren_baru claim also opens its activation-fee
/// payment, which is what the payment redirect in the route gate waits
/// on.
pub async fn claim_approve_post(
    Extension(ValidatedProfile(profile)): Extension<ValidatedProfile>,
    Path(claim_id): Path<Uuid>,
) -> ApiResult<Value> {
    require_role(&profile, &[Role::AdminRegional, Role::AdminPusat])?;

    let service = ClaimService::new().await?;
    check_region_scope(&profile, &service.get(claim_id).await?)?;

    let claim = service.approve(claim_id, profile.id).await?;

    let payment = if claim.jenis_pengajuan == JenisPengajuan::PesantrenBaru {
        let payments = PaymentService::new().await?;
        Some(payments.open_for_claim(claim.id).await?)
    } else {
        None
    };

    Ok(ApiResponse::success(json!({
        "claim": claim,
        "payment": payment,
    })))
}

/// POST /api/admin/claims/:id/reject
pub async fn claim_reject_post(
    Extension(ValidatedProfile(profile)): Extension<ValidatedProfile>,
    Path(claim_id): Path<Uuid>,
) -> ApiResult<Claim> {
    require_role(&profile, &[Role::AdminRegional, Role::AdminPusat])?;

    let service = ClaimService::new().await?;
    check_region_scope(&profile, &service.get(claim_id).await?)?;

    let claim = service.reject(claim_id, profile.id).await?;
    Ok(ApiResponse::success(claim))
}

/// Regional admins may only act on claims inside their region.
fn check_region_scope(profile: &crate::database::models::Profile, claim: &Claim) -> Result<(), ApiError> {
    if profile.role == Role::AdminRegional
        && profile.region_code.as_deref() != Some(claim.region_code.as_str())
    {
        return Err(ApiError::forbidden("Claim belongs to another region"));
    }
    Ok(())
}
