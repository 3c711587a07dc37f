pub mod flow;
pub mod otp;
pub mod risk;
pub mod session;
