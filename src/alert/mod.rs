//! Alert decisions and deduplication
//!
//! Scored events pass a threshold filter and a per-(wallet, market) dedup
//! ledger before becoming alerts. The ledger is the only mutable state in
//! the pipeline; it lives for the process lifetime and is injected so tests
//! can substitute a fresh one.

#[cfg(test)]
mod tests;

use crate::types::{AlertEvent, AlertKey, Market, ScoreBreakdown, Severity};
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Tracks which (wallet, market) pairs have alerted recently
pub struct AlertLedger {
    /// Key -> last alert timestamp
    alerted: Mutex<HashMap<AlertKey, DateTime<Utc>>>,
    /// Cooldown before the same key may alert again
    cooldown_minutes: i64,
}

impl AlertLedger {
    pub fn new(cooldown_minutes: i64) -> Self {
        Self {
            alerted: Mutex::new(HashMap::new()),
            cooldown_minutes,
        }
    }

    /// Check whether this key may alert (never alerted, or cooldown elapsed)
    pub fn can_alert(&self, key: &AlertKey, now: DateTime<Utc>) -> bool {
        let alerted = self.alerted.lock();
        match alerted.get(key) {
            Some(last) => now - *last >= Duration::minutes(self.cooldown_minutes),
            None => true,
        }
    }

    /// Record that this key alerted
    pub fn mark_alerted(&self, key: AlertKey, now: DateTime<Utc>) {
        self.alerted.lock().insert(key, now);
    }

    /// Drop entries old enough that they could never suppress an alert
    pub fn cleanup(&self, now: DateTime<Utc>) {
        let cutoff = now - Duration::minutes(self.cooldown_minutes * 2);
        self.alerted.lock().retain(|_, last| *last > cutoff);
    }

    pub fn len(&self) -> usize {
        self.alerted.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerted.lock().is_empty()
    }
}

/// Filters scored events against the threshold and the ledger
pub struct AlertDecisionEngine {
    threshold: u32,
}

impl AlertDecisionEngine {
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }

    /// Turn the cycle's breakdowns into alert events.
    ///
    /// Sub-threshold scores never touch the ledger; only emitted alerts
    /// occupy ledger space. Breakdowns whose market is no longer in the
    /// cycle's market set are skipped.
    pub fn decide(
        &self,
        breakdowns: &[ScoreBreakdown],
        markets: &HashMap<String, Market>,
        ledger: &AlertLedger,
        now: DateTime<Utc>,
    ) -> Vec<AlertEvent> {
        let mut events = Vec::new();

        for breakdown in breakdowns {
            if breakdown.total_score < self.threshold {
                continue;
            }
            let Some(severity) = Severity::from_score(breakdown.total_score) else {
                continue;
            };
            let Some(market) = markets.get(&breakdown.market_id) else {
                continue;
            };

            let key = AlertKey {
                wallet_address: breakdown.wallet_address.clone(),
                market_id: breakdown.market_id.clone(),
            };
            if !ledger.can_alert(&key, now) {
                continue;
            }
            ledger.mark_alerted(key, now);

            events.push(AlertEvent {
                market: market.clone(),
                wallet_address: breakdown.wallet_address.clone(),
                score: breakdown.total_score,
                severity,
                recommended_side: breakdown.recommended_side,
                size_usd: breakdown.total_size_usd,
                is_first_trade: breakdown.is_first_trade,
                trade_timestamp: breakdown.largest_trade_at,
                reasons: breakdown.reasons.clone(),
            });
        }

        events
    }
}
