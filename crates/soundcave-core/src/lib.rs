//! Service plumbing shared by SoundCave binaries: configuration loading,
//! tracing, request ids, health checks and error rendering.

pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
