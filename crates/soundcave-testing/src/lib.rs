//! Test utilities for SoundCave crates.
//!
//! Import from `[dev-dependencies]` only.

pub mod auth;
