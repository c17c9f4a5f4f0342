use axum::extract::Extension;
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config;
use crate::gate::{self, ClaimCheck, GateDecision, GateInput, ProfileSnapshot};
use crate::is_development;
use crate::middleware::{ApiResponse, ApiResult, ValidatedProfile};
use crate::services::ClaimService;
use crate::types::Role;

#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    /// Dashboard path the frontend wants to render
    pub path: String,
    /// Roles the target route is restricted to; empty means any role
    #[serde(default)]
    pub allowed_roles: Vec<Role>,
    /// Internal preview tooling only; ignored outside development
    #[serde(default)]
    pub debug_bypass: bool,
}

/// POST /api/gate/route - Evaluate the access gate for a path
///
/// The frontend calls this before rendering a protected route and
/// follows the returned decision. The claim lookup happens lazily (user
/// role only) and is served from the session cache after the first hit.
pub async fn route_post(
    Extension(ValidatedProfile(profile)): Extension<ValidatedProfile>,
    Json(body): Json<RouteRequest>,
) -> ApiResult<Value> {
    let debug_bypass = body.debug_bypass && is_development!();

    let claim = if profile.role == Role::User {
        let claims = ClaimService::new().await?;
        claims.claim_check(profile.id).await
    } else {
        ClaimCheck::NotApplicable
    };

    let snapshot = ProfileSnapshot {
        role: profile.role,
        status_account: profile.status_account,
    };
    let decision = gate::evaluate(
        &GateInput {
            authenticated: true,
            profile: Some(&snapshot),
            claim,
            requested_path: &body.path,
            allowed_roles: &body.allowed_roles,
            debug_bypass,
        },
        &config::config().gate,
    );

    let value = match decision {
        GateDecision::Render => json!({ "decision": "render" }),
        GateDecision::Redirect { to, return_to } => json!({
            "decision": "redirect",
            "to": to,
            "return_to": return_to,
        }),
    };
    Ok(ApiResponse::success(value))
}
