pub mod assessment;
pub mod otp;
pub mod user;
