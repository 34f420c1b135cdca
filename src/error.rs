//! Error types for the monitor

use thiserror::Error;

/// Monitor-wide error type
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The market list itself could not be fetched. Aborts the cycle;
    /// the next scheduled cycle retries independently.
    #[error("market source unavailable: {0}")]
    SourceUnavailable(String),

    /// A single market's trade fetch failed. The market is skipped and the
    /// cycle continues.
    #[error("trade fetch failed for market {market_id}: {reason}")]
    TradeFetchFailed { market_id: String, reason: String },

    /// A wallet's profile could not be fetched. Scoring for that wallet is
    /// skipped this cycle rather than defaulting the wallet to novel.
    #[error("profile unavailable for wallet {wallet}: {reason}")]
    ProfileUnavailable { wallet: String, reason: String },

    /// A trade or profile record was missing required fields.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// A cycle was requested while the previous one was still running.
    #[error("previous cycle still running")]
    CycleInProgress,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("notification error: {0}")]
    Notify(String),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
