//! In-process monitoring
//!
//! Keeps a bounded history of emitted alerts and running totals of skip
//! decisions, logged after each cycle. Nothing here persists across
//! restarts.

use crate::pipeline::CycleReport;
use crate::types::Severity;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use tokio::sync::RwLock;

/// Cycle and alert statistics for the process lifetime
pub struct Monitor {
    alerts: RwLock<VecDeque<AlertRecord>>,
    totals: RwLock<RunTotals>,
    max_history: usize,
}

#[derive(Debug, Clone)]
pub struct AlertRecord {
    pub timestamp: DateTime<Utc>,
    pub market_id: String,
    pub wallet_address: String,
    pub score: u32,
    pub severity: Severity,
}

#[derive(Debug, Clone, Default)]
pub struct RunTotals {
    pub cycles: usize,
    pub alerts: usize,
    pub critical_alerts: usize,
    pub trade_fetch_failures: usize,
    pub profile_failures: usize,
    pub malformed_records: usize,
}

impl Monitor {
    pub fn new(max_history: usize) -> Self {
        Self {
            alerts: RwLock::new(VecDeque::with_capacity(max_history)),
            totals: RwLock::new(RunTotals::default()),
            max_history,
        }
    }

    pub async fn record_cycle(&self, report: &CycleReport) {
        let mut alerts = self.alerts.write().await;
        for event in &report.alerts {
            if alerts.len() >= self.max_history {
                alerts.pop_front();
            }
            alerts.push_back(AlertRecord {
                timestamp: report.cycle_start,
                market_id: event.market.id.clone(),
                wallet_address: event.wallet_address.clone(),
                score: event.score,
                severity: event.severity,
            });
        }

        let mut totals = self.totals.write().await;
        totals.cycles += 1;
        totals.alerts += report.alerts.len();
        totals.critical_alerts += report
            .alerts
            .iter()
            .filter(|a| a.severity == Severity::Critical)
            .count();
        totals.trade_fetch_failures += report.stats.trade_fetch_failures;
        totals.profile_failures += report.stats.profile_failures;
        totals.malformed_records += report.stats.malformed_records;
    }

    pub async fn totals(&self) -> RunTotals {
        self.totals.read().await.clone()
    }

    pub async fn recent_alerts(&self) -> Vec<AlertRecord> {
        self.alerts.read().await.iter().cloned().collect()
    }

    pub async fn log_stats(&self) {
        let totals = self.totals.read().await;
        tracing::info!(
            "Run totals: {} cycles, {} alerts ({} critical), \
             {} trade-fetch failures, {} profile failures, {} malformed records",
            totals.cycles,
            totals.alerts,
            totals.critical_alerts,
            totals.trade_fetch_failures,
            totals.profile_failures,
            totals.malformed_records
        );
    }
}
