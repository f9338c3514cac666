pub(crate) mod booking;
pub(crate) mod favorite;
pub(crate) mod gym;
pub(crate) mod otp;
pub(crate) mod review;
pub(crate) mod time_slot;
pub(crate) mod trainer;
pub(crate) mod user;
