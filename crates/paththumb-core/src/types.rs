//! Serializable summaries of download results.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What happened to one input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadReport {
    /// The URL or path as given
    pub source: String,

    /// Strategy that handled it, if any accepted it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloader: Option<String>,

    /// Whether bytes were delivered
    pub delivered: bool,

    /// Size of the delivered payload
    pub bytes: usize,

    /// Whether the strategy allows its output to be cached
    pub cacheable: bool,

    /// Where the output was stored, when it was cached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl DownloadReport {
    /// Report for an input no strategy accepted.
    pub fn unhandled(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            downloader: None,
            delivered: false,
            bytes: 0,
            cacheable: false,
            output: None,
        }
    }
}
