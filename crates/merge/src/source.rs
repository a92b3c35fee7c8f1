//! The pull-cursor seam over decoded partition files.

use tickstream_core::{Record, Result};

/// A resumable cursor over the decoded records of one logical source.
///
/// Implementations decode an ordered partition file list for one
/// `(kind, instrument_id, bar_spec)` triple and yield successive batches of
/// records. The sequence is finite and not restartable.
///
/// Contract:
/// - Records are non-decreasing in `ts_init` within a batch and across the
///   whole sequence.
/// - Every `Some(Ok(_))` batch contains at least one record while data
///   remains; batches never exceed the configured batch size except that the
///   trailing batch may be shorter.
/// - A source with no matching data yields `None` immediately.
/// - A malformed or unreadable partition yields `Some(Err(Error::Decode))`;
///   the error is propagated to the consumer unchanged, never retried.
pub trait BatchSource {
    /// Pull the next batch, or `None` once exhausted.
    fn next_batch(&mut self) -> Option<Result<Vec<Record>>>;
}
