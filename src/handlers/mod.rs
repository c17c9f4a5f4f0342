// Three-tier handler architecture:
// Public (no auth) → Protected (JWT auth) → Elevated (admin roles)

pub mod elevated; // Tier 3: admin roles on top of JWT auth (/api/admin/*)
pub mod protected; // Tier 2: JWT authentication required (/api/*)
pub mod public; // Tier 1: no user session; OTP/seed routes take the service key (/auth/*)
