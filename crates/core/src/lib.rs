//! Core types and configuration for the tickstream system.
//!
//! This crate provides shared types used across all other crates:
//! - Market data record types (quotes, trades, bars, generic data)
//! - Source and engine configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::{EngineConfig, SourceConfig, DEFAULT_BATCH_SIZE, DEFAULT_TARGET_BATCH_SIZE_BYTES};
pub use error::{Error, Result};
pub use types::*;
