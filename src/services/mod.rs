pub(crate) mod email_service;
pub(crate) mod otp_service;
