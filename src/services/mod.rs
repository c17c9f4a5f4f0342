pub mod claim_service;
pub mod otp_service;
pub mod payment_service;
pub mod profile_service;

pub use claim_service::{ClaimService, SubmitClaim};
pub use otp_service::OtpService;
pub use payment_service::PaymentService;
pub use profile_service::ProfileService;
