//! The injected file-lookup and decode capability.

use std::path::PathBuf;
use tickstream_core::{Result, SourceConfig};
use tickstream_merge::BatchSource;

/// Resolves source configurations to partition files and decode streams.
///
/// Passed into [`crate::StreamingEngine::new`] explicitly; the engine never
/// reaches for ambient/global lookup state.
pub trait Catalog {
    /// Resolve a source to its ordered partition file list, ascending by
    /// partition key. Coverage knowledge lives here: a requested range with
    /// no overlap resolves to an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup itself fails (e.g. unreadable index).
    fn resolve(&self, config: &SourceConfig) -> Result<Vec<PathBuf>>;

    /// Open a lazy decode cursor over resolved files, selecting the
    /// accelerated or generic path from `config.use_accelerated_decode`.
    /// No file I/O happens until the cursor is pulled.
    ///
    /// # Errors
    ///
    /// Returns an error if the decode stream cannot be constructed.
    fn open(&self, config: &SourceConfig, files: &[PathBuf]) -> Result<Box<dyn BatchSource>>;
}
