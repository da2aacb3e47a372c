//! # Baseball Stats
//!
//! Career batting statistics for a roster of players, served over HTTP.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, counting and derived stats)
//! - **calculate**: Derived stat computation, comparison and leaderboards
//! - **storage**: JSONL-backed player store
//! - **ingest**: Bulk import from a JSON player feed
//! - **describe**: Generated player descriptions via a language model
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod describe;
pub mod ingest;
pub mod models;
pub mod storage;

pub use models::*;
