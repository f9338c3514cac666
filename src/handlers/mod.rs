pub(crate) mod auth;
pub(crate) mod auth_otp;
pub(crate) mod bookings;
pub(crate) mod favorites;
pub(crate) mod gyms;
pub(crate) mod reviews;
pub(crate) mod time_slots;
pub(crate) mod trainers;
pub(crate) mod upload;
