//! Inclusive time-range trimming over a batch source.
//!
//! Bounds are nanosecond timestamps and both are inclusive: a record whose
//! `ts_init` equals `start` or `end` is kept.

use crate::source::BatchSource;
use tickstream_core::{Record, Result, TimestampNs};

/// Trims a `BatchSource` to an inclusive `[start, end]` window.
///
/// Leading batches entirely before `start` are dropped without emitting
/// records. The first overlapping batch is trimmed in place. Once a batch
/// reaches past `end` the trimmed remainder is yielded and the underlying
/// source is never pulled again: every later record is guaranteed to exceed
/// `end` because the source is non-decreasing in `ts_init`.
pub struct TimeRangeFilter {
    source: Box<dyn BatchSource>,
    start: Option<TimestampNs>,
    end: Option<TimestampNs>,
    /// True once the start bound has been applied (or when there is none).
    started: bool,
    done: bool,
}

impl TimeRangeFilter {
    /// Wrap `source` with optional inclusive bounds; `None` = unbounded.
    pub fn new(
        source: Box<dyn BatchSource>,
        start: Option<TimestampNs>,
        end: Option<TimestampNs>,
    ) -> Self {
        Self {
            source,
            start,
            end,
            started: start.is_none(),
            done: false,
        }
    }

    /// Pull the next trimmed batch, or `None` once the window is exhausted.
    pub fn next_batch(&mut self) -> Option<Result<Vec<Record>>> {
        if self.done {
            return None;
        }
        loop {
            let mut batch = match self.source.next_batch() {
                None => {
                    self.done = true;
                    return None;
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                Some(Ok(batch)) => batch,
            };

            // Batches are ascending, so the maximum timestamp is the last one.
            let max_ts = match batch.last() {
                Some(record) => record.ts_init(),
                None => continue,
            };

            if !self.started {
                // `started` is false only while a start bound is pending.
                if let Some(start) = self.start {
                    if max_ts < start {
                        continue;
                    }
                    batch.retain(|r| r.ts_init() >= start);
                }
                self.started = true;
                if batch.is_empty() {
                    continue;
                }
            }

            if let Some(end) = self.end {
                if max_ts > end {
                    batch.retain(|r| r.ts_init() <= end);
                    self.done = true;
                    if batch.is_empty() {
                        return None;
                    }
                    return Some(Ok(batch));
                }
            }

            return Some(Ok(batch));
        }
    }
}
