//! Configuration structures for the tickstream system.

use crate::types::{BarSpec, RecordKind, TimestampNs};
use serde::{Deserialize, Serialize};

/// Default per-source buffer capacity and decode batch size (records).
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// Default soft target for emitted chunk size (bytes).
pub const DEFAULT_TARGET_BATCH_SIZE_BYTES: usize = 100 * 1024 * 1024;

/// Configuration for one logical data source.
///
/// A source resolves to exactly one ordered partition file list and one
/// decode stream for a `(kind, instrument_id, bar_spec)` triple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Kind of record this source yields.
    pub kind: RecordKind,
    /// Instrument identifier (None for generic sources).
    pub instrument_id: Option<String>,
    /// Bar period (bar sources only).
    pub bar_spec: Option<BarSpec>,
    /// Payload type name (generic sources only).
    pub data_type: Option<String>,
    /// Inclusive range start (ns); None = unbounded.
    pub start_nanos: Option<TimestampNs>,
    /// Inclusive range end (ns); None = unbounded.
    pub end_nanos: Option<TimestampNs>,
    /// Decode batch size and buffer capacity (records).
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Use the accelerated (native columnar) decode path.
    pub use_accelerated_decode: bool,
    /// External bus client routing id (generic sources only).
    pub generic_client_id: Option<String>,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

impl SourceConfig {
    /// Create a quote tick source for an instrument.
    pub fn quotes(instrument_id: impl Into<String>) -> Self {
        Self {
            kind: RecordKind::Quote,
            instrument_id: Some(instrument_id.into()),
            ..Self::default()
        }
    }

    /// Create a trade tick source for an instrument.
    pub fn trades(instrument_id: impl Into<String>) -> Self {
        Self {
            kind: RecordKind::Trade,
            instrument_id: Some(instrument_id.into()),
            ..Self::default()
        }
    }

    /// Create a bar source for an instrument and bar period.
    pub fn bars(instrument_id: impl Into<String>, spec: BarSpec) -> Self {
        Self {
            kind: RecordKind::Bar,
            instrument_id: Some(instrument_id.into()),
            bar_spec: Some(spec),
            ..Self::default()
        }
    }

    /// Create a generic data source routed to an external bus client.
    pub fn generic(data_type: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            kind: RecordKind::Generic,
            data_type: Some(data_type.into()),
            generic_client_id: Some(client_id.into()),
            ..Self::default()
        }
    }

    /// Restrict the source to an inclusive nanosecond time range.
    pub fn with_range(mut self, start: Option<TimestampNs>, end: Option<TimestampNs>) -> Self {
        self.start_nanos = start;
        self.end_nanos = end;
        self
    }

    /// Override the decode batch size / buffer capacity.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: RecordKind::Trade,
            instrument_id: None,
            bar_spec: None,
            data_type: None,
            start_nanos: None,
            end_nanos: None,
            batch_size: DEFAULT_BATCH_SIZE,
            use_accelerated_decode: false,
            generic_client_id: None,
        }
    }
}

/// Engine-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Soft upper bound on emitted chunk size (bytes). A single oversized
    /// merge round can exceed it; rounds are never split.
    pub target_batch_size_bytes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_batch_size_bytes: DEFAULT_TARGET_BATCH_SIZE_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BarAggregation;

    #[test]
    fn test_default_source_config() {
        let config = SourceConfig::default();
        assert_eq!(config.batch_size, 10_000);
        assert!(config.start_nanos.is_none());
        assert!(!config.use_accelerated_decode);
    }

    #[test]
    fn test_builders() {
        let config = SourceConfig::bars("ESZ4.CME", BarSpec::new(BarAggregation::Hour, 4))
            .with_range(Some(1_000), Some(2_000))
            .with_batch_size(500);
        assert_eq!(config.kind, RecordKind::Bar);
        assert_eq!(config.instrument_id.as_deref(), Some("ESZ4.CME"));
        assert_eq!(config.start_nanos, Some(1_000));
        assert_eq!(config.end_nanos, Some(2_000));
        assert_eq!(config.batch_size, 500);
    }

    #[test]
    fn test_default_engine_config() {
        let config = EngineConfig::default();
        assert_eq!(config.target_batch_size_bytes, 100 * 1024 * 1024);
    }
}
