use crate::database::models::Profile;
use crate::error::ApiError;
use crate::is_development;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::ProfileService;

/// POST /auth/dev/seed - Seed fixture accounts for every role tier
///
/// Development-only companion to the dashboards: gives local frontends
/// one account per tier without touching the real provisioning flow.
/// Refuses to run in any other environment.
pub async fn dev_seed() -> ApiResult<Vec<Profile>> {
    if !is_development!() {
        return Err(ApiError::forbidden(
            "Seeding is only available in development mode",
        ));
    }

    let service = ProfileService::new().await?;
    let profiles = service.seed_dev_users().await?;
    Ok(ApiResponse::created(profiles))
}
