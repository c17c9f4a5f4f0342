use axum::extract::{Extension, Path, Query};
use serde::Deserialize;
use uuid::Uuid;

use super::require_role;
use crate::database::models::Payment;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, ValidatedProfile};
use crate::services::PaymentService;
use crate::types::{PaymentStatus, Role};

#[derive(Debug, Deserialize)]
pub struct PaymentListQuery {
    pub status: Option<String>,
}

/// GET /api/admin/payments - Finance listing
pub async fn payments_list_get(
    Extension(ValidatedProfile(profile)): Extension<ValidatedProfile>,
    Query(query): Query<PaymentListQuery>,
) -> ApiResult<Vec<Payment>> {
    require_role(&profile, &[Role::AdminFinance, Role::AdminPusat])?;

    let status = match query.status.as_deref() {
        None => None,
        Some("unpaid") => Some(PaymentStatus::Unpaid),
        Some("pending_review") => Some(PaymentStatus::PendingReview),
        Some("settled") => Some(PaymentStatus::Settled),
        Some(s) => {
            return Err(ApiError::bad_request(format!("Unknown payment status: {}", s)));
        }
    };

    let service = PaymentService::new().await?;
    let payments = service.list(status).await?;
    Ok(ApiResponse::success(payments))
}

/// POST /api/admin/payments/:id/settle - Finance sign-off on a transfer
pub async fn payment_settle_post(
    Extension(ValidatedProfile(profile)): Extension<ValidatedProfile>,
    Path(payment_id): Path<Uuid>,
) -> ApiResult<Payment> {
    require_role(&profile, &[Role::AdminFinance])?;

    let service = PaymentService::new().await?;
    let payment = service.settle(payment_id).await?;
    Ok(ApiResponse::success(payment))
}
