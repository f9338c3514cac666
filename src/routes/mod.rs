pub(crate) mod auth;
pub(crate) mod auth_otp_routes;
pub(crate) mod bookings;
pub(crate) mod favorites;
pub(crate) mod gyms;
pub(crate) mod upload;
