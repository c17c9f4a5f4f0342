pub mod claim;
pub mod otp;
pub mod payment;
pub mod profile;

pub use claim::Claim;
pub use otp::OtpCode;
pub use payment::Payment;
pub use profile::Profile;
