//! SeaORM entities for the SoundCave API database.

pub mod artists;
pub mod follows;
pub mod users;
