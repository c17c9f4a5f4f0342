use axum::extract::{Extension, Path};
use uuid::Uuid;

use super::require_role;
use crate::database::models::Profile;
use crate::middleware::{ApiResponse, ApiResult, ValidatedProfile};
use crate::services::ProfileService;
use crate::types::{AccountStatus, Role};

/// POST /api/admin/accounts/:id/activate - Approve a pending account
pub async fn account_activate_post(
    Extension(ValidatedProfile(profile)): Extension<ValidatedProfile>,
    Path(account_id): Path<Uuid>,
) -> ApiResult<Profile> {
    require_role(&profile, &[Role::AdminRegional, Role::AdminPusat])?;

    let service = ProfileService::new().await?;
    let updated = service.set_status(account_id, AccountStatus::Active).await?;
    Ok(ApiResponse::success(updated))
}

/// POST /api/admin/accounts/:id/reject
pub async fn account_reject_post(
    Extension(ValidatedProfile(profile)): Extension<ValidatedProfile>,
    Path(account_id): Path<Uuid>,
) -> ApiResult<Profile> {
    require_role(&profile, &[Role::AdminRegional, Role::AdminPusat])?;

    let service = ProfileService::new().await?;
    let updated = service.set_status(account_id, AccountStatus::Rejected).await?;
    Ok(ApiResponse::success(updated))
}
