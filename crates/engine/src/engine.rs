//! The streaming engine: source ordering, pipeline construction, and the
//! public chunk iterator.

use crate::catalog::Catalog;
use std::collections::HashMap;
use tickstream_core::{EngineConfig, Error, Record, RecordKind, Result, SourceConfig};
use tickstream_merge::{ChunkAccumulator, MergeIterator, StreamingBuffer, TimeRangeFilter};
use tracing::debug;

/// Assembles a globally time-ordered, memory-bounded chunk stream out of
/// many independently-sorted sources.
///
/// Construction is fail-fast: invalid ranges and sources that resolve to
/// zero files are rejected before any decode work happens. Iteration yields
/// `Vec<Record>` chunks, each individually ascending in `ts_init` and
/// globally ascending chunk to chunk, sized near the configured byte target.
pub struct StreamingEngine {
    chunks: ChunkAccumulator,
    client_ids: HashMap<String, String>,
    source_count: usize,
}

impl StreamingEngine {
    /// Build the pipeline for `configs`, resolving each through `catalog`.
    ///
    /// Configs are first sorted into deterministic tie-break order: bar
    /// sources ahead of everything else, coarser periods and larger steps
    /// first, all other sources keeping their input order. That order
    /// becomes buffer construction order, which fixes how records sharing a
    /// `ts_init` interleave across sources.
    ///
    /// # Errors
    ///
    /// - `Error::Range` if a config has `end_nanos < start_nanos`.
    /// - `Error::Configuration` if a bar config lacks a bar spec, or any
    ///   config resolves to zero files.
    pub fn new<C>(catalog: &C, mut configs: Vec<SourceConfig>, engine_config: EngineConfig) -> Result<Self>
    where
        C: Catalog + ?Sized,
    {
        for config in &configs {
            if let (Some(start), Some(end)) = (config.start_nanos, config.end_nanos) {
                if end < start {
                    return Err(Error::range(format!(
                        "end {end} precedes start {start} for source {}",
                        source_label(config)
                    )));
                }
            }
            if config.kind == RecordKind::Bar && config.bar_spec.is_none() {
                return Err(Error::configuration(format!(
                    "bar source {} has no bar spec",
                    source_label(config)
                )));
            }
        }

        // Stable sort: non-bar sources keep their original list order.
        configs.sort_by_key(ordering_key);

        let client_ids: HashMap<String, String> = configs
            .iter()
            .filter(|c| c.kind == RecordKind::Generic)
            .filter_map(|c| Some((c.data_type.clone()?, c.generic_client_id.clone()?)))
            .collect();

        let mut buffers = Vec::with_capacity(configs.len());
        for config in &configs {
            let files = catalog.resolve(config)?;
            if files.is_empty() {
                return Err(Error::configuration(format!(
                    "source {} resolved to zero files",
                    source_label(config)
                )));
            }
            debug!(
                source = %source_label(config),
                files = files.len(),
                batch_size = config.batch_size,
                "resolved source"
            );
            let source = catalog.open(config, &files)?;
            let filter = TimeRangeFilter::new(source, config.start_nanos, config.end_nanos);
            buffers.push(StreamingBuffer::new(filter, config.batch_size));
        }

        let source_count = buffers.len();
        debug!(sources = source_count, "streaming engine constructed");

        Ok(Self {
            chunks: ChunkAccumulator::new(
                MergeIterator::new(buffers),
                engine_config.target_batch_size_bytes,
            ),
            client_ids,
            source_count,
        })
    }

    /// Routing map from generic payload type name to external bus client id.
    pub fn client_id_map(&self) -> &HashMap<String, String> {
        &self.client_ids
    }

    /// Number of sources the engine was constructed over.
    pub fn source_count(&self) -> usize {
        self.source_count
    }
}

impl Iterator for StreamingEngine {
    type Item = Result<Vec<Record>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.chunks.next()
    }
}

/// Deterministic construction order: bars before non-bars, bars by
/// descending (aggregation rank, step) so a daily bar always precedes an
/// hourly bar sharing its close timestamp.
fn ordering_key(config: &SourceConfig) -> (u8, i16, i64) {
    match (config.kind, config.bar_spec) {
        (RecordKind::Bar, Some(spec)) => (
            0,
            -i16::from(spec.aggregation.rank()),
            -i64::from(spec.step),
        ),
        _ => (1, 0, 0),
    }
}

fn source_label(config: &SourceConfig) -> String {
    match config.kind {
        RecordKind::Bar => format!(
            "{}[{}]",
            config.instrument_id.as_deref().unwrap_or("?"),
            config
                .bar_spec
                .map_or_else(|| "?".to_string(), |s| s.to_string())
        ),
        RecordKind::Generic => format!(
            "generic[{}]",
            config.data_type.as_deref().unwrap_or("?")
        ),
        kind => format!(
            "{}[{:?}]",
            config.instrument_id.as_deref().unwrap_or("?"),
            kind
        ),
    }
}
