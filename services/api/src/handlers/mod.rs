pub mod artist;
pub mod auth;
pub mod follow;
pub mod profile;
pub mod user;
