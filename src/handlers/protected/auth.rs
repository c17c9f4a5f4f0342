use axum::extract::Extension;

use crate::database::models::Profile;
use crate::middleware::{ApiResponse, ApiResult, ValidatedProfile};

/// GET /api/auth/whoami - Current validated profile
///
/// The profile comes from the validation middleware, so the response
/// always reflects the live row rather than the (possibly stale) JWT.
pub async fn whoami(
    Extension(ValidatedProfile(profile)): Extension<ValidatedProfile>,
) -> ApiResult<Profile> {
    Ok(ApiResponse::success(profile))
}
