pub mod password;
pub mod repository;
pub mod types;
