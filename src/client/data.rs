//! Data API client for trade activity
//!
//! The data API reports trade sizes as shares plus an odds price, with an
//! optional `usdcSize`. The USD value of a trade is `usdcSize` when present,
//! otherwise `size * price`.

use crate::error::{MonitorError, Result};
use crate::types::{Side, Trade, TradeBatch, WalletProfile};
use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashSet;
use tracing::debug;

/// Data API client for trades and wallet history
#[derive(Clone)]
pub struct DataClient {
    http: Client,
    base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
struct RawTrade {
    #[serde(rename = "conditionId")]
    condition_id: Option<String>,
    #[serde(rename = "proxyWallet")]
    proxy_wallet: Option<String>,
    outcome: Option<String>,
    size: Option<f64>,
    price: Option<f64>,
    #[serde(rename = "usdcSize")]
    usdc_size: Option<f64>,
    timestamp: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawActivity {
    #[serde(rename = "conditionId")]
    condition_id: Option<String>,
    timestamp: Option<i64>,
}

impl DataClient {
    /// Create a new data API client
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the most recent trades for a market. Records missing required
    /// fields are dropped and counted, never silently.
    pub async fn recent_trades(&self, market_id: &str, limit: usize) -> Result<TradeBatch> {
        let url = format!("{}/trades", self.base_url);
        let resp: Vec<RawTrade> = self
            .http
            .get(&url)
            .query(&[("market", market_id), ("limit", &limit.to_string())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut batch = TradeBatch::default();
        for raw in resp {
            match parse_trade(raw, market_id) {
                Ok(trade) => batch.trades.push(trade),
                Err(e) => {
                    debug!("Dropping trade record for market {}: {}", market_id, e);
                    batch.malformed += 1;
                }
            }
        }

        debug!(
            "Fetched {} trades for market {} ({} malformed)",
            batch.trades.len(),
            market_id,
            batch.malformed
        );
        Ok(batch)
    }

    /// Build a profile snapshot from the wallet's recorded trade activity.
    /// Any failure surfaces as `ProfileUnavailable` so the caller can skip
    /// the wallet instead of scoring it as novel.
    pub async fn wallet_profile(&self, address: &str) -> Result<WalletProfile> {
        let url = format!("{}/activity", self.base_url);
        let resp: Vec<RawActivity> = self
            .http
            .get(&url)
            .query(&[("user", address), ("type", "TRADE"), ("limit", "500")])
            .send()
            .await
            .map_err(|e| profile_unavailable(address, &e))?
            .error_for_status()
            .map_err(|e| profile_unavailable(address, &e))?
            .json()
            .await
            .map_err(|e| profile_unavailable(address, &e))?;

        let mut first_seen: Option<DateTime<Utc>> = None;
        let mut markets = HashSet::new();
        let mut count = 0u64;

        for record in resp {
            let Some(ts) = record.timestamp.and_then(|t| DateTime::from_timestamp(t, 0)) else {
                debug!("Dropping activity record without timestamp for {}", address);
                continue;
            };
            count += 1;
            first_seen = Some(first_seen.map_or(ts, |f| f.min(ts)));
            if let Some(market) = record.condition_id {
                markets.insert(market);
            }
        }

        Ok(WalletProfile {
            address: address.to_string(),
            // No recorded history: the trade that surfaced this wallet is
            // its first
            first_seen: first_seen.unwrap_or_else(Utc::now),
            total_trade_count: count,
            distinct_market_count: markets.len() as u64,
        })
    }
}

fn profile_unavailable(address: &str, err: &dyn std::fmt::Display) -> MonitorError {
    MonitorError::ProfileUnavailable {
        wallet: address.to_string(),
        reason: err.to_string(),
    }
}

fn parse_trade(raw: RawTrade, requested_market: &str) -> Result<Trade> {
    let wallet = raw
        .proxy_wallet
        .filter(|w| !w.is_empty())
        .ok_or_else(|| MonitorError::MalformedRecord("missing proxyWallet".into()))?;

    let timestamp = raw
        .timestamp
        .and_then(|t| DateTime::from_timestamp(t, 0))
        .ok_or_else(|| MonitorError::MalformedRecord("missing or invalid timestamp".into()))?;

    let side = match raw.outcome.as_deref() {
        Some(o) if o.eq_ignore_ascii_case("yes") => Side::Yes,
        Some(o) if o.eq_ignore_ascii_case("no") => Side::No,
        other => {
            return Err(MonitorError::MalformedRecord(format!(
                "unrecognized outcome {:?}",
                other
            )))
        }
    };

    let size_usd = trade_value(raw.usdc_size, raw.size, raw.price)
        .ok_or_else(|| MonitorError::MalformedRecord("missing size/price".into()))?;

    Ok(Trade {
        market_id: raw.condition_id.unwrap_or_else(|| requested_market.to_string()),
        wallet_address: wallet,
        side,
        size_usd,
        timestamp,
    })
}

/// USD value of a trade: `usdcSize` when the API provides it, otherwise
/// shares times odds
fn trade_value(usdc_size: Option<f64>, size: Option<f64>, price: Option<f64>) -> Option<Decimal> {
    if let Some(usdc) = usdc_size {
        if let Ok(d) = Decimal::try_from(usdc) {
            return Some(d);
        }
    }
    let size = Decimal::try_from(size?).ok()?;
    let price = Decimal::try_from(price?).ok()?;
    Some(size * price)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(
        wallet: Option<&str>,
        outcome: Option<&str>,
        usdc: Option<f64>,
        size: Option<f64>,
        price: Option<f64>,
        ts: Option<i64>,
    ) -> RawTrade {
        RawTrade {
            condition_id: Some("0xmarket".to_string()),
            proxy_wallet: wallet.map(String::from),
            outcome: outcome.map(String::from),
            size,
            price,
            usdc_size: usdc,
            timestamp: ts,
        }
    }

    #[test]
    fn test_parse_trade_prefers_usdc_size() {
        let trade = parse_trade(
            raw(Some("0xabc"), Some("Yes"), Some(250.0), Some(1000.0), Some(0.5), Some(1700000000)),
            "0xmarket",
        )
        .unwrap();
        assert_eq!(trade.size_usd, Decimal::try_from(250.0).unwrap());
        assert_eq!(trade.side, Side::Yes);
    }

    #[test]
    fn test_parse_trade_falls_back_to_size_times_price() {
        let trade = parse_trade(
            raw(Some("0xabc"), Some("No"), None, Some(1000.0), Some(0.5), Some(1700000000)),
            "0xmarket",
        )
        .unwrap();
        assert_eq!(trade.size_usd, Decimal::try_from(500.0).unwrap());
        assert_eq!(trade.side, Side::No);
    }

    #[test]
    fn test_parse_trade_missing_wallet_is_malformed() {
        let err = parse_trade(
            raw(None, Some("Yes"), Some(10.0), None, None, Some(1700000000)),
            "0xmarket",
        )
        .unwrap_err();
        assert!(matches!(err, MonitorError::MalformedRecord(_)));
    }

    #[test]
    fn test_parse_trade_unknown_outcome_is_malformed() {
        let err = parse_trade(
            raw(Some("0xabc"), Some("Maybe"), Some(10.0), None, None, Some(1700000000)),
            "0xmarket",
        )
        .unwrap_err();
        assert!(matches!(err, MonitorError::MalformedRecord(_)));
    }

    #[test]
    fn test_parse_trade_missing_timestamp_is_malformed() {
        let err = parse_trade(
            raw(Some("0xabc"), Some("Yes"), Some(10.0), None, None, None),
            "0xmarket",
        )
        .unwrap_err();
        assert!(matches!(err, MonitorError::MalformedRecord(_)));
    }
}
