//! Per-wallet trade aggregation
//!
//! `aggregate` handles one market's trade page; `merge_scan` combines the
//! per-market results so focus is measured across the whole scan.

use crate::types::{Trade, WalletActivity};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

/// Group one market's trades by wallet within the trailing window.
///
/// Trades may arrive in arbitrary chronological order; each wallet's trades
/// come out time-ascending. Trades before `window_start` are discarded.
/// Deterministic, no side effects.
pub fn aggregate(
    trades: Vec<Trade>,
    window_start: DateTime<Utc>,
) -> HashMap<String, WalletActivity> {
    let mut by_wallet: HashMap<String, WalletActivity> = HashMap::new();

    for trade in trades {
        if trade.timestamp < window_start {
            continue;
        }

        let entry = by_wallet
            .entry(trade.wallet_address.clone())
            .or_insert_with(|| WalletActivity {
                wallet_address: trade.wallet_address.clone(),
                market_id: trade.market_id.clone(),
                trades: Vec::new(),
                total_size_usd: Decimal::ZERO,
                markets_touched_this_window: 0,
            });

        entry.total_size_usd += trade.size_usd;
        entry.trades.push(trade);
    }

    for activity in by_wallet.values_mut() {
        activity.trades.sort_by_key(|t| t.timestamp);
        // Distinct markets within this trade set; the cross-scan count is
        // filled in by merge_scan
        activity.markets_touched_this_window = activity
            .trades
            .iter()
            .map(|t| t.market_id.as_str())
            .collect::<HashSet<_>>()
            .len();
    }

    by_wallet
}

/// Merge per-market aggregates into one activity list, recomputing each
/// wallet's market count across every market scanned this cycle.
///
/// Focus is deliberately scan-scoped: it counts only markets seen in the
/// current scan, not the wallet's full on-chain history.
pub fn merge_scan(per_market: Vec<HashMap<String, WalletActivity>>) -> Vec<WalletActivity> {
    let mut touched: HashMap<String, HashSet<String>> = HashMap::new();
    for market_map in &per_market {
        for activity in market_map.values() {
            touched
                .entry(activity.wallet_address.clone())
                .or_default()
                .insert(activity.market_id.clone());
        }
    }

    let mut merged: Vec<WalletActivity> = per_market
        .into_iter()
        .flat_map(|m| m.into_values())
        .collect();

    for activity in &mut merged {
        if let Some(markets) = touched.get(&activity.wallet_address) {
            activity.markets_touched_this_window = markets.len();
        }
    }

    merged
}
