pub mod accounts;
pub mod claims;
pub mod payments;

use crate::database::models::Profile;
use crate::error::ApiError;
use crate::types::{AccountStatus, Role};

/// Guard for admin operations: the acting account must be active and
/// hold one of the allowed roles. Mirrors the route gate's rules 4-7 on
/// the server side, where the dashboard cannot be trusted to have
/// enforced them.
pub(crate) fn require_role(profile: &Profile, allowed: &[Role]) -> Result<(), ApiError> {
    if profile.status_account != AccountStatus::Active {
        return Err(ApiError::forbidden("Account is not active"));
    }
    if !allowed.contains(&profile.role) {
        tracing::warn!(
            "Role check failed: {} is {:?}, needs one of {:?}",
            profile.id,
            profile.role,
            allowed
        );
        return Err(ApiError::forbidden("Insufficient role for this operation"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn profile(role: Role, status: AccountStatus) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            nama: "Test".to_string(),
            phone: "081234567890".to_string(),
            role,
            status_account: status,
            region_code: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn active_member_passes() {
        let p = profile(Role::AdminRegional, AccountStatus::Active);
        assert!(require_role(&p, &[Role::AdminRegional, Role::AdminPusat]).is_ok());
    }

    #[test]
    fn wrong_role_is_forbidden() {
        let p = profile(Role::AdminFinance, AccountStatus::Active);
        assert!(require_role(&p, &[Role::AdminRegional]).is_err());
    }

    #[test]
    fn inactive_account_is_forbidden_even_with_the_role() {
        let p = profile(Role::AdminPusat, AccountStatus::Pending);
        assert!(require_role(&p, &[Role::AdminPusat]).is_err());
    }
}
