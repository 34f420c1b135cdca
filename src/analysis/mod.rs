//! Trade aggregation and insider scoring
//!
//! Pure functions over fetched data:
//! - Window aggregation of raw trades per wallet
//! - Cross-market merge for scan-scoped focus
//! - Weighted suspicion scoring from wallet-history and bet-pattern signals

pub mod aggregator;
pub mod scorer;


pub use aggregator::{aggregate, merge_scan};
pub use scorer::InsiderScorer;
