/// Shared domain types used across the codebase
///
/// These are the closed unions the whole system branches on. The access
/// gate matches on them exhaustively, so adding a variant forces every
/// decision site to be revisited at compile time.

use serde::{Deserialize, Serialize};

/// Role tier assigned at account creation. Immutable for the lifetime of
/// a session; carried in JWT claims and revalidated against the live
/// profiles row on every protected request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Role {
    User,
    AdminRegional,
    AdminPusat,
    AdminFinance,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::AdminRegional => "admin_regional",
            Role::AdminPusat => "admin_pusat",
            Role::AdminFinance => "admin_finance",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "user" => Some(Role::User),
            "admin_regional" => Some(Role::AdminRegional),
            "admin_pusat" => Some(Role::AdminPusat),
            "admin_finance" => Some(Role::AdminFinance),
            _ => None,
        }
    }
}

/// Account approval lifecycle. Only `Active` accounts may reach
/// role-specific dashboards; the other two force status pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum AccountStatus {
    Pending,
    Active,
    Rejected,
}

/// Lifecycle of a user's request to be associated with an institution.
///
/// `Draft` is the pre-verification state: the claim row exists but the
/// submitter's phone has not passed OTP verification yet. Verification
/// advances it to `Pending`. The "absent" case is simply no row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ClaimStatus {
    Draft,
    Pending,
    RegionalApproved,
    Rejected,
}

impl ClaimStatus {
    pub fn parse(s: &str) -> Option<ClaimStatus> {
        match s {
            "draft" => Some(ClaimStatus::Draft),
            "pending" => Some(ClaimStatus::Pending),
            "regional_approved" => Some(ClaimStatus::RegionalApproved),
            "rejected" => Some(ClaimStatus::Rejected),
            _ => None,
        }
    }
}

/// Submission type: claiming an existing legacy institution record vs.
/// registering a brand-new institution. Only meaningful once a claim
/// row exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum JenisPengajuan {
    Klaim,
    PesantrenBaru,
}

/// Activation-fee payment lifecycle for pesantren_baru claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    PendingReview,
    Settled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        for role in [Role::User, Role::AdminRegional, Role::AdminPusat, Role::AdminFinance] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("superuser"), None);
    }

    #[test]
    fn claim_status_parses_wire_names() {
        assert_eq!(ClaimStatus::parse("regional_approved"), Some(ClaimStatus::RegionalApproved));
        assert_eq!(ClaimStatus::parse("approved"), None);
    }
}
