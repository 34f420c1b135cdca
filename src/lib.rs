//! Polymarket Insider-Activity Monitor
//!
//! Polls public prediction-market trade activity on a fixed interval and
//! scores each wallet's recent activity for insider-trading signals.
//!
//! ## Architecture
//!
//! ```text
//! Gamma/Data clients → Aggregator → Scorer → Decision engine → Notifier
//!                           ↑                      ↑
//!               cross-market merge         dedup ledger (process-wide)
//! ```

pub mod alert;
pub mod analysis;
pub mod client;
pub mod config;
pub mod error;
pub mod monitor;
pub mod notify;
pub mod pipeline;
pub mod sources;
pub mod types;

#[cfg(test)]
mod types_tests;
