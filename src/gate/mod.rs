//! The access gate: a single decision point mapping a session snapshot
//! and a requested dashboard path to "render" or "redirect".
//!
//! This is deliberately a pure function. Session state, the claim lookup
//! and the navigation side effect all live with the callers; the gate
//! only branches on the values it is handed, which is what makes the
//! redirect rules testable without a UI harness or a database.

use serde::{Deserialize, Serialize};

use crate::config::GateConfig;
use crate::types::{AccountStatus, ClaimStatus, JenisPengajuan, Role};

/// The profile fields the gate branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileSnapshot {
    pub role: Role,
    pub status_account: AccountStatus,
}

/// The claim fields the gate branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSnapshot {
    pub status: ClaimStatus,
    pub jenis_pengajuan: JenisPengajuan,
}

/// Result of the lazy claim lookup. The gate must never run against a
/// lookup that is still outstanding; callers resolve it first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimCheck {
    /// Lookup skipped: the role is not `user`
    NotApplicable,
    /// No claim row exists for this user
    Absent,
    Found(ClaimSnapshot),
    /// Lookup failed; fall through to account-status rules rather than
    /// granting or crashing
    Unavailable,
}

/// Outcome of a gate evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Render,
    Redirect {
        to: String,
        /// Originally requested path, carried only by the login redirect
        /// for post-login return
        return_to: Option<String>,
    },
}

impl GateDecision {
    fn redirect(to: &str) -> Self {
        GateDecision::Redirect {
            to: to.to_string(),
            return_to: None,
        }
    }
}

/// Everything the gate is allowed to look at.
#[derive(Debug, Clone, Copy)]
pub struct GateInput<'a> {
    pub authenticated: bool,
    pub profile: Option<&'a ProfileSnapshot>,
    pub claim: ClaimCheck,
    pub requested_path: &'a str,
    pub allowed_roles: &'a [Role],
    /// Internal QA/preview escape hatch; must never be reachable from
    /// normal navigation. The HTTP adapter only honors it in development.
    pub debug_bypass: bool,
}

/// True when `requested` is the target page or nested under it.
fn on_path(requested: &str, target: &str) -> bool {
    requested == target || requested.strip_prefix(target).is_some_and(|rest| rest.starts_with('/'))
}

/// Evaluate the redirect rules in order; the first matching rule wins.
pub fn evaluate(input: &GateInput<'_>, paths: &GateConfig) -> GateDecision {
    // Debug bypass skips every check below
    if input.debug_bypass {
        return GateDecision::Render;
    }

    // Rule 1: unauthenticated requests land on login, keeping the
    // original path for post-login return
    if !input.authenticated {
        return GateDecision::Redirect {
            to: paths.login_path.clone(),
            return_to: Some(input.requested_path.to_string()),
        };
    }

    // Rule 2: authenticated but the profile row never materialized
    let Some(profile) = input.profile else {
        return GateDecision::redirect(&paths.login_path);
    };

    let path = input.requested_path;

    // Rule 3: claim lifecycle, user role only. Unavailable lookups fall
    // through to the account-status rules below.
    if profile.role == Role::User {
        // Submission not started (no row) and submission not yet verified
        // (draft row) land on the same page
        let needs_submission = |path: &str| {
            if on_path(path, &paths.institution_check_path) || on_path(path, &paths.submission_path) {
                None
            } else {
                Some(GateDecision::redirect(&paths.institution_check_path))
            }
        };
        match input.claim {
            ClaimCheck::Absent => {
                if let Some(redirect) = needs_submission(path) {
                    return redirect;
                }
            }
            ClaimCheck::Found(claim) => match claim.status {
                ClaimStatus::Draft => {
                    if let Some(redirect) = needs_submission(path) {
                        return redirect;
                    }
                }
                ClaimStatus::Pending => {
                    if !on_path(path, &paths.verification_pending_path) {
                        return GateDecision::redirect(&paths.verification_pending_path);
                    }
                }
                ClaimStatus::RegionalApproved => match claim.jenis_pengajuan {
                    // Claimants of existing institutions go straight to
                    // the role gate below
                    JenisPengajuan::Klaim => {}
                    JenisPengajuan::PesantrenBaru => {
                        if !on_path(path, &paths.payment_path)
                            && !on_path(path, &paths.payment_pending_path)
                        {
                            return GateDecision::redirect(&paths.payment_path);
                        }
                    }
                },
                ClaimStatus::Rejected => {
                    if !on_path(path, &paths.account_rejected_path) {
                        return GateDecision::redirect(&paths.account_rejected_path);
                    }
                }
            },
            ClaimCheck::NotApplicable | ClaimCheck::Unavailable => {}
        }
    }

    // Rules 4-5: account status pages for everyone else
    match profile.status_account {
        AccountStatus::Pending => {
            if !on_path(path, &paths.verification_pending_path) {
                return GateDecision::redirect(&paths.verification_pending_path);
            }
        }
        AccountStatus::Rejected => {
            if !on_path(path, &paths.account_rejected_path) {
                return GateDecision::redirect(&paths.account_rejected_path);
            }
        }
        AccountStatus::Active => {}
    }

    // Rule 6: the forbidden page itself is always reachable
    if on_path(path, &paths.forbidden_path) {
        return GateDecision::Render;
    }

    // Rule 7: role gate. Mismatches always land on the generic forbidden
    // page; no "correct dashboard" inference.
    if !input.allowed_roles.is_empty() && !input.allowed_roles.contains(&profile.role) {
        return GateDecision::redirect(&paths.forbidden_path);
    }

    GateDecision::Render
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> GateConfig {
        GateConfig::default()
    }

    fn profile(role: Role, status: AccountStatus) -> ProfileSnapshot {
        ProfileSnapshot {
            role,
            status_account: status,
        }
    }

    fn claim(status: ClaimStatus, jenis: JenisPengajuan) -> ClaimCheck {
        ClaimCheck::Found(ClaimSnapshot {
            status,
            jenis_pengajuan: jenis,
        })
    }

    fn gate(
        authenticated: bool,
        profile: Option<&ProfileSnapshot>,
        claim: ClaimCheck,
        path: &str,
        allowed: &[Role],
    ) -> GateDecision {
        evaluate(
            &GateInput {
                authenticated,
                profile,
                claim,
                requested_path: path,
                allowed_roles: allowed,
                debug_bypass: false,
            },
            &paths(),
        )
    }

    #[test]
    fn unauthenticated_redirects_to_login_preserving_path() {
        for path in ["/dashboard", "/admin/klaim", "/pembayaran"] {
            let decision = gate(false, None, ClaimCheck::NotApplicable, path, &[]);
            assert_eq!(
                decision,
                GateDecision::Redirect {
                    to: "/login".into(),
                    return_to: Some(path.into()),
                }
            );
        }
    }

    #[test]
    fn missing_profile_redirects_to_login_without_return() {
        let decision = gate(true, None, ClaimCheck::NotApplicable, "/dashboard", &[]);
        assert_eq!(
            decision,
            GateDecision::Redirect {
                to: "/login".into(),
                return_to: None,
            }
        );
    }

    #[test]
    fn user_without_claim_is_sent_to_institution_check() {
        let p = profile(Role::User, AccountStatus::Active);
        let decision = gate(true, Some(&p), ClaimCheck::Absent, "/dashboard", &[]);
        assert_eq!(decision, GateDecision::redirect("/cek-pesantren"));

        // ...unless already on the check or submission pages
        for path in ["/cek-pesantren", "/pengajuan", "/pengajuan/baru"] {
            assert_eq!(
                gate(true, Some(&p), ClaimCheck::Absent, path, &[]),
                GateDecision::Render,
                "path {path} should render"
            );
        }
    }

    #[test]
    fn draft_claim_counts_as_absent() {
        let p = profile(Role::User, AccountStatus::Active);
        let decision = gate(
            true,
            Some(&p),
            claim(ClaimStatus::Draft, JenisPengajuan::Klaim),
            "/dashboard",
            &[],
        );
        assert_eq!(decision, GateDecision::redirect("/cek-pesantren"));
    }

    #[test]
    fn pending_claim_is_sent_to_verification_page() {
        let p = profile(Role::User, AccountStatus::Active);
        let c = claim(ClaimStatus::Pending, JenisPengajuan::Klaim);
        assert_eq!(
            gate(true, Some(&p), c, "/dashboard", &[]),
            GateDecision::redirect("/menunggu-verifikasi")
        );
        assert_eq!(
            gate(true, Some(&p), c, "/menunggu-verifikasi", &[]),
            GateDecision::Render
        );
    }

    #[test]
    fn approved_klaim_falls_through_to_role_checks() {
        let p = profile(Role::User, AccountStatus::Active);
        let c = claim(ClaimStatus::RegionalApproved, JenisPengajuan::Klaim);
        // No payment redirect; the role gate decides
        assert_eq!(
            gate(true, Some(&p), c, "/dashboard", &[Role::User]),
            GateDecision::Render
        );
        assert_eq!(
            gate(true, Some(&p), c, "/admin", &[Role::AdminPusat]),
            GateDecision::redirect("/forbidden")
        );
    }

    #[test]
    fn approved_pesantren_baru_is_sent_to_payment() {
        let p = profile(Role::User, AccountStatus::Active);
        let c = claim(ClaimStatus::RegionalApproved, JenisPengajuan::PesantrenBaru);
        assert_eq!(
            gate(true, Some(&p), c, "/dashboard", &[]),
            GateDecision::redirect("/pembayaran")
        );
        for path in ["/pembayaran", "/pembayaran/menunggu"] {
            assert_eq!(
                gate(true, Some(&p), c, path, &[]),
                GateDecision::Render,
                "path {path} should render"
            );
        }
    }

    #[test]
    fn rejected_claim_is_sent_to_account_rejected() {
        let p = profile(Role::User, AccountStatus::Active);
        let c = claim(ClaimStatus::Rejected, JenisPengajuan::PesantrenBaru);
        assert_eq!(
            gate(true, Some(&p), c, "/dashboard", &[]),
            GateDecision::redirect("/akun-ditolak")
        );
    }

    #[test]
    fn rejected_account_beats_everything_else() {
        // Regardless of role or claim state, a rejected account only
        // reaches the account-rejected page
        let cases = [
            (Role::User, claim(ClaimStatus::RegionalApproved, JenisPengajuan::Klaim)),
            (Role::AdminRegional, ClaimCheck::NotApplicable),
            (Role::AdminFinance, ClaimCheck::NotApplicable),
        ];
        for (role, c) in cases {
            let p = profile(role, AccountStatus::Rejected);
            assert_eq!(
                gate(true, Some(&p), c, "/dashboard", &[]),
                GateDecision::redirect("/akun-ditolak"),
                "role {role:?}"
            );
            assert_eq!(
                gate(true, Some(&p), c, "/akun-ditolak", &[]),
                GateDecision::Render,
                "role {role:?} on the rejected page itself"
            );
        }
    }

    #[test]
    fn pending_account_is_sent_to_verification_page() {
        let p = profile(Role::AdminRegional, AccountStatus::Pending);
        assert_eq!(
            gate(true, Some(&p), ClaimCheck::NotApplicable, "/admin", &[Role::AdminRegional]),
            GateDecision::redirect("/menunggu-verifikasi")
        );
    }

    #[test]
    fn failed_claim_lookup_falls_through_to_account_status() {
        // Unavailable must not grant access: a pending account still
        // lands on the verification page, an active one on the role gate
        let pending = profile(Role::User, AccountStatus::Pending);
        assert_eq!(
            gate(true, Some(&pending), ClaimCheck::Unavailable, "/dashboard", &[]),
            GateDecision::redirect("/menunggu-verifikasi")
        );

        let active = profile(Role::User, AccountStatus::Active);
        assert_eq!(
            gate(true, Some(&active), ClaimCheck::Unavailable, "/admin", &[Role::AdminPusat]),
            GateDecision::redirect("/forbidden")
        );
    }

    #[test]
    fn forbidden_page_is_always_reachable() {
        let p = profile(Role::User, AccountStatus::Active);
        let c = claim(ClaimStatus::RegionalApproved, JenisPengajuan::Klaim);
        assert_eq!(
            gate(true, Some(&p), c, "/forbidden", &[Role::AdminPusat]),
            GateDecision::Render
        );
    }

    #[test]
    fn role_gate_allows_members_and_redirects_the_rest() {
        let admin = profile(Role::AdminFinance, AccountStatus::Active);
        assert_eq!(
            gate(true, Some(&admin), ClaimCheck::NotApplicable, "/keuangan", &[Role::AdminFinance, Role::AdminPusat]),
            GateDecision::Render
        );
        let regional = profile(Role::AdminRegional, AccountStatus::Active);
        assert_eq!(
            gate(true, Some(&regional), ClaimCheck::NotApplicable, "/keuangan", &[Role::AdminFinance, Role::AdminPusat]),
            GateDecision::redirect("/forbidden")
        );
    }

    #[test]
    fn empty_allowed_roles_renders_for_any_active_account() {
        let p = profile(Role::AdminPusat, AccountStatus::Active);
        assert_eq!(
            gate(true, Some(&p), ClaimCheck::NotApplicable, "/profil", &[]),
            GateDecision::Render
        );
    }

    #[test]
    fn debug_bypass_renders_unconditionally() {
        // A profile every other rule would reject
        let p = profile(Role::User, AccountStatus::Rejected);
        let decision = evaluate(
            &GateInput {
                authenticated: false,
                profile: Some(&p),
                claim: claim(ClaimStatus::Rejected, JenisPengajuan::PesantrenBaru),
                requested_path: "/admin/keuangan",
                allowed_roles: &[Role::AdminFinance],
                debug_bypass: true,
            },
            &paths(),
        );
        assert_eq!(decision, GateDecision::Render);
    }

    #[test]
    fn path_matching_covers_nested_routes_only() {
        assert!(on_path("/pembayaran", "/pembayaran"));
        assert!(on_path("/pembayaran/invoice/3", "/pembayaran"));
        assert!(!on_path("/pembayaran-lama", "/pembayaran"));
    }
}
