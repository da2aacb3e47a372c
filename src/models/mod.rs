//! Core data models for players and their statistics.

mod ids;
mod player;
mod stats;

pub use ids::*;
pub use player::*;
pub use stats::*;
