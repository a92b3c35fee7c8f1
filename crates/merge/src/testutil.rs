//! Shared test fixtures for the pipeline tests.

use crate::source::BatchSource;
use std::collections::VecDeque;
use tickstream_core::{Error, Price, Record, Result, TradeTick};

/// Build a trade record with the given `ts_init`.
pub fn make_trade(ts_init: i64) -> Record {
    make_trade_for(ts_init, "BTCUSDT.BINANCE")
}

/// Build a trade record for a specific instrument.
pub fn make_trade_for(ts_init: i64, instrument_id: &str) -> Record {
    Record::Trade(TradeTick {
        instrument_id: instrument_id.to_string(),
        price: Price::from(50_000.0),
        size: 1.0,
        ts_event: ts_init,
        ts_init,
    })
}

/// Build trade batches of `batch_size` records from ascending timestamps.
pub fn trade_batches(timestamps: &[i64], batch_size: usize) -> Vec<Vec<Record>> {
    timestamps
        .chunks(batch_size)
        .map(|chunk| chunk.iter().copied().map(make_trade).collect())
        .collect()
}

/// An in-memory `BatchSource` over pre-built batches.
pub struct VecBatchSource {
    batches: VecDeque<Vec<Record>>,
}

impl VecBatchSource {
    pub fn new(batches: Vec<Vec<Record>>) -> Self {
        Self {
            batches: batches.into(),
        }
    }

    /// Trade source over ascending timestamps, batched by `batch_size`.
    pub fn from_timestamps(timestamps: &[i64], batch_size: usize) -> Self {
        Self::new(trade_batches(timestamps, batch_size))
    }
}

impl BatchSource for VecBatchSource {
    fn next_batch(&mut self) -> Option<Result<Vec<Record>>> {
        self.batches.pop_front().map(Ok)
    }
}

/// A source that yields some good batches then a decode failure.
pub struct FailingSource {
    good: VecDeque<Vec<Record>>,
    failed: bool,
}

impl FailingSource {
    pub fn new(good: Vec<Vec<Record>>) -> Self {
        Self {
            good: good.into(),
            failed: false,
        }
    }
}

impl BatchSource for FailingSource {
    fn next_batch(&mut self) -> Option<Result<Vec<Record>>> {
        if let Some(batch) = self.good.pop_front() {
            return Some(Ok(batch));
        }
        if self.failed {
            return None;
        }
        self.failed = true;
        Some(Err(Error::decode("corrupt partition file")))
    }
}
