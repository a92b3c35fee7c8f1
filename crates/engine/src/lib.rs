//! Stream orchestration for the tickstream system.
//!
//! This crate handles:
//! - The `Catalog` capability for resolving and opening data sources
//! - The `StreamingEngine` orchestrator: deterministic source ordering,
//!   pipeline construction, and the public chunk iterator

pub mod catalog;
pub mod engine;

pub use catalog::Catalog;
pub use engine::StreamingEngine;
