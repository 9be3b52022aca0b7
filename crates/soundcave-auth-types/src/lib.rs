//! Auth types shared across SoundCave crates.
//!
//! Provides token issuance/validation and the bearer-credential guard
//! (`Identity` / `AdminIdentity` extractors).

pub mod guard;
pub mod token;
