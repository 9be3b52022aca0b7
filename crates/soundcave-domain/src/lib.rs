//! Domain types shared across all SoundCave crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod follow;
pub mod id;
pub mod pagination;
pub mod user;
