//! Streaming batch-merge pipeline for the tickstream system.
//!
//! This crate handles:
//! - The `BatchSource` pull-cursor seam over decoded partition files
//! - Inclusive time-range trimming (`TimeRangeFilter`)
//! - Bounded per-source buffering (`StreamingBuffer`)
//! - Watermark-driven k-way merging (`MergeIterator`)
//! - Memory-target re-chunking (`ChunkAccumulator`)

pub mod accumulator;
pub mod buffer;
pub mod merge;
pub mod source;
pub mod time_filter;

#[cfg(test)]
pub(crate) mod testutil;

pub use accumulator::ChunkAccumulator;
pub use buffer::StreamingBuffer;
pub use merge::MergeIterator;
pub use source::BatchSource;
pub use time_filter::TimeRangeFilter;
