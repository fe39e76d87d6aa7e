pub mod otp;
pub mod phone;
