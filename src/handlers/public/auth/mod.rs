pub mod login;
pub mod otp;
pub mod seed;

pub use login::login;
pub use otp::{otp_request, otp_verify};
pub use seed::dev_seed;
