//! Core types shared across the monitor

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A prediction market, refreshed from the market source every cycle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Market {
    pub id: String,
    pub question: String,
    pub slug: String,
    pub volume: Decimal,
}

impl Market {
    /// Public market page, used in alert messages
    pub fn url(&self) -> String {
        if self.slug.is_empty() {
            "https://polymarket.com".to_string()
        } else {
            format!("https://polymarket.com/market/{}", self.slug)
        }
    }
}

/// Which outcome a trade bought
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Side {
    #[serde(rename = "YES", alias = "Yes")]
    Yes,
    #[serde(rename = "NO", alias = "No")]
    No,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Yes => write!(f, "YES"),
            Side::No => write!(f, "NO"),
        }
    }
}

/// A single observed trade
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trade {
    pub market_id: String,
    pub wallet_address: String,
    pub side: Side,
    pub size_usd: Decimal,
    pub timestamp: DateTime<Utc>,
}

/// One page of trades for a market, with the count of records dropped
/// because required fields were missing
#[derive(Debug, Clone, Default)]
pub struct TradeBatch {
    pub trades: Vec<Trade>,
    pub malformed: usize,
}

/// Snapshot of a wallet's trading history, fetched per wallet per cycle.
/// Never cached across cycles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletProfile {
    pub address: String,
    pub first_seen: DateTime<Utc>,
    /// Lifetime trades recorded for this wallet
    pub total_trade_count: u64,
    /// Lifetime market diversity; informational only, the focus signal is
    /// computed from the current scan
    pub distinct_market_count: u64,
}

impl WalletProfile {
    pub fn account_age_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.first_seen).num_days()
    }
}

/// A wallet's aggregated activity in one market over the trailing window
#[derive(Debug, Clone, PartialEq)]
pub struct WalletActivity {
    pub wallet_address: String,
    pub market_id: String,
    /// Time-ascending
    pub trades: Vec<Trade>,
    pub total_size_usd: Decimal,
    /// Distinct markets this wallet touched across the whole scan, filled in
    /// by the pipeline's merge step
    pub markets_touched_this_window: usize,
}

impl WalletActivity {
    /// The trade with the largest USD size, if any
    pub fn largest_trade(&self) -> Option<&Trade> {
        self.trades.iter().max_by_key(|t| t.size_usd)
    }
}

/// Scoring output for one (wallet, market) pair in one cycle
#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub wallet_address: String,
    pub market_id: String,
    /// Sum of the component points, capped at 100
    pub total_score: u32,
    /// Signal name -> points awarded
    pub components: BTreeMap<&'static str, u32>,
    /// Human-readable description of each signal that fired, in evaluation
    /// order
    pub reasons: Vec<String>,
    pub recommended_side: Side,
    pub total_size_usd: Decimal,
    pub largest_trade_usd: Decimal,
    pub largest_trade_at: DateTime<Utc>,
    pub is_first_trade: bool,
}

/// Dedup key for the alert ledger
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlertKey {
    pub wallet_address: String,
    pub market_id: String,
}

/// Alert tier derived from the total score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Severity {
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Tier for a score, or None when the score is below the alertable range
    pub fn from_score(score: u32) -> Option<Self> {
        match score {
            s if s >= 80 => Some(Severity::Critical),
            s if s >= 65 => Some(Severity::High),
            s if s >= 50 => Some(Severity::Medium),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

/// An alert ready to hand to the notification sink
#[derive(Debug, Clone, Serialize)]
pub struct AlertEvent {
    pub market: Market,
    pub wallet_address: String,
    pub score: u32,
    pub severity: Severity,
    pub recommended_side: Side,
    pub size_usd: Decimal,
    pub is_first_trade: bool,
    /// Timestamp of the wallet's largest trade in this market
    pub trade_timestamp: DateTime<Utc>,
    pub reasons: Vec<String>,
}
