//! Core record types for the tickstream system.

use chrono::{DateTime, TimeZone, Utc};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::mem;

/// Timestamp in nanoseconds since Unix epoch (UTC).
pub type TimestampNs = i64;

/// Price type with ordering support.
pub type Price = OrderedFloat<f64>;

/// Size/quantity type.
pub type Size = f64;

/// Convert a nanosecond timestamp to a UTC datetime.
#[inline]
pub fn ns_to_datetime(ts_ns: TimestampNs) -> DateTime<Utc> {
    Utc.timestamp_nanos(ts_ns)
}

/// Convert a UTC datetime to nanoseconds since epoch.
#[inline]
pub fn datetime_to_ns(dt: DateTime<Utc>) -> TimestampNs {
    dt.timestamp_nanos_opt().unwrap_or(i64::MAX)
}

/// The kind of record a source produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    /// Best bid/ask quote ticks.
    Quote,
    /// Trade (print) ticks.
    Trade,
    /// Aggregated time bars.
    Bar,
    /// Generic/custom data payloads.
    Generic,
}

/// Time unit a bar aggregates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarAggregation {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
}

impl BarAggregation {
    /// Coarseness rank, ascending (MONTH is coarsest).
    #[inline]
    pub fn rank(self) -> u8 {
        match self {
            BarAggregation::Millisecond => 1,
            BarAggregation::Second => 2,
            BarAggregation::Minute => 3,
            BarAggregation::Hour => 4,
            BarAggregation::Day => 5,
            BarAggregation::Week => 6,
            BarAggregation::Month => 7,
        }
    }
}

impl fmt::Display for BarAggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BarAggregation::Millisecond => "MILLISECOND",
            BarAggregation::Second => "SECOND",
            BarAggregation::Minute => "MINUTE",
            BarAggregation::Hour => "HOUR",
            BarAggregation::Day => "DAY",
            BarAggregation::Week => "WEEK",
            BarAggregation::Month => "MONTH",
        };
        write!(f, "{s}")
    }
}

/// Bar period: aggregation unit plus step multiplier, e.g. (HOUR, 4) = 4-hour bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BarSpec {
    /// Aggregation unit.
    pub aggregation: BarAggregation,
    /// Step multiplier (e.g. 4 for 4-hour bars).
    pub step: u32,
}

impl BarSpec {
    pub fn new(aggregation: BarAggregation, step: u32) -> Self {
        Self { aggregation, step }
    }
}

impl fmt::Display for BarSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.step, self.aggregation)
    }
}

/// A Level 1 quote tick (best bid/ask).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteTick {
    /// Instrument identifier, e.g. "BTCUSDT.BINANCE".
    pub instrument_id: String,
    /// Best bid price.
    pub bid_price: Price,
    /// Best ask price.
    pub ask_price: Price,
    /// Best bid size.
    pub bid_size: Size,
    /// Best ask size.
    pub ask_size: Size,
    /// Venue event timestamp (ns).
    pub ts_event: TimestampNs,
    /// Local ingestion timestamp (ns); the merge-ordering key.
    pub ts_init: TimestampNs,
}

impl QuoteTick {
    /// Calculate mid price.
    #[inline]
    pub fn mid(&self) -> f64 {
        (self.bid_price.0 + self.ask_price.0) / 2.0
    }
}

/// A single trade (print) tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeTick {
    /// Instrument identifier.
    pub instrument_id: String,
    /// Trade price.
    pub price: Price,
    /// Trade size.
    pub size: Size,
    /// Venue event timestamp (ns).
    pub ts_event: TimestampNs,
    /// Local ingestion timestamp (ns); the merge-ordering key.
    pub ts_init: TimestampNs,
}

/// An OHLCV bar for one instrument and bar period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Instrument identifier.
    pub instrument_id: String,
    /// Bar period.
    pub spec: BarSpec,
    /// Open price.
    pub open: Price,
    /// High price.
    pub high: Price,
    /// Low price.
    pub low: Price,
    /// Close price.
    pub close: Price,
    /// Total volume.
    pub volume: Size,
    /// Bar close timestamp (ns).
    pub ts_event: TimestampNs,
    /// Local ingestion timestamp (ns); the merge-ordering key.
    pub ts_init: TimestampNs,
}

/// A generic/custom data record routed by payload type name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericData {
    /// Payload type name, e.g. "NewsEvent".
    pub data_type: String,
    /// Opaque payload.
    pub payload: serde_json::Value,
    /// Local ingestion timestamp (ns); the merge-ordering key.
    pub ts_init: TimestampNs,
}

/// Any record the merge engine can carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Record {
    Quote(QuoteTick),
    Trade(TradeTick),
    Bar(Bar),
    Generic(GenericData),
}

impl Record {
    /// The universal merge-ordering key.
    #[inline]
    pub fn ts_init(&self) -> TimestampNs {
        match self {
            Record::Quote(q) => q.ts_init,
            Record::Trade(t) => t.ts_init,
            Record::Bar(b) => b.ts_init,
            Record::Generic(g) => g.ts_init,
        }
    }

    /// The record kind tag.
    #[inline]
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Quote(_) => RecordKind::Quote,
            Record::Trade(_) => RecordKind::Trade,
            Record::Bar(_) => RecordKind::Bar,
            Record::Generic(_) => RecordKind::Generic,
        }
    }

    /// Bar period, for bar records only. Used for deterministic tie-break
    /// ordering across mixed granularities.
    #[inline]
    pub fn bar_ordering(&self) -> Option<(BarAggregation, u32)> {
        match self {
            Record::Bar(b) => Some((b.spec.aggregation, b.spec.step)),
            _ => None,
        }
    }

    /// Approximate resident size in bytes, for memory accounting.
    pub fn size_estimate(&self) -> usize {
        let heap = match self {
            Record::Quote(q) => q.instrument_id.len(),
            Record::Trade(t) => t.instrument_id.len(),
            Record::Bar(b) => b.instrument_id.len(),
            Record::Generic(g) => g.data_type.len() + json_size_estimate(&g.payload),
        };
        mem::size_of::<Self>() + heap
    }
}

/// Rough heap footprint of a JSON payload.
fn json_size_estimate(value: &serde_json::Value) -> usize {
    use serde_json::Value;
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) => mem::size_of::<Value>(),
        Value::String(s) => mem::size_of::<Value>() + s.len(),
        Value::Array(items) => {
            mem::size_of::<Value>() + items.iter().map(json_size_estimate).sum::<usize>()
        }
        Value::Object(map) => {
            mem::size_of::<Value>()
                + map
                    .iter()
                    .map(|(k, v)| k.len() + json_size_estimate(v))
                    .sum::<usize>()
        }
    }
}
