//! Data models for the portfolio backend.
//!
//! Field names serialize in camelCase to match the frontend interfaces.

mod contact;
mod profile;
mod project;
mod skill;

pub use contact::*;
pub use profile::*;
pub use project::*;
pub use skill::*;
