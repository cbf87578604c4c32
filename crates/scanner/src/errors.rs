//! Error types for the source scanner.

use thiserror::Error;

/// Everything a scan of the watched address can fail with.
///
/// All variants are transient from the scanner's perspective: a failed scan is logged and the
/// next timer tick retries from scratch, since nothing is mutated before a successful fetch.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The explorer HTTP call failed.
    #[error("explorer request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The explorer returned a payload that could not be interpreted.
    #[error("malformed explorer response: {0}")]
    MalformedResponse(String),

    /// The downstream candidate queue is gone, i.e. the relay has shut down.
    #[error("candidate queue closed")]
    QueueClosed,
}
