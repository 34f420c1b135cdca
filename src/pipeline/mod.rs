//! Cycle orchestration
//!
//! One polling cycle: pull markets -> pull trades -> aggregate -> merge ->
//! fetch profiles -> score -> decide. A market-list failure aborts the
//! cycle; any single market or wallet failure is skipped, logged, and
//! counted. Overlapping cycles are rejected so the same trade window is
//! never double-counted.


use crate::alert::{AlertDecisionEngine, AlertLedger};
use crate::analysis::{aggregate, merge_scan, InsiderScorer};
use crate::config::ScannerConfig;
use crate::error::{MonitorError, Result};
use crate::sources::{MarketSource, TradeSource, WalletProfileSource};
use crate::types::{AlertEvent, Market, ScoreBreakdown, WalletActivity, WalletProfile};
use chrono::{DateTime, Duration, Utc};
use futures_util::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Observability counters for one cycle. Every skip decision shows up here
/// so silent data loss is detectable.
#[derive(Debug, Clone, Default)]
pub struct CycleStats {
    pub markets_scanned: usize,
    pub trade_fetch_failures: usize,
    pub malformed_records: usize,
    pub trades_in_window: usize,
    pub wallets_seen: usize,
    pub profile_failures: usize,
    pub wallets_scored: usize,
    pub alerts_emitted: usize,
}

/// Outcome of one cycle
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub cycle_start: DateTime<Utc>,
    pub alerts: Vec<AlertEvent>,
    pub stats: CycleStats,
}

/// Drives one fetch-aggregate-score-decide pass
pub struct CyclePipeline {
    markets: Arc<dyn MarketSource>,
    trades: Arc<dyn TradeSource>,
    profiles: Arc<dyn WalletProfileSource>,
    scorer: InsiderScorer,
    engine: AlertDecisionEngine,
    ledger: AlertLedger,
    config: ScannerConfig,
    running: AtomicBool,
}

/// Clears the running flag when the cycle finishes or is cancelled
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl CyclePipeline {
    pub fn new(
        markets: Arc<dyn MarketSource>,
        trades: Arc<dyn TradeSource>,
        profiles: Arc<dyn WalletProfileSource>,
        scorer: InsiderScorer,
        engine: AlertDecisionEngine,
        ledger: AlertLedger,
        config: ScannerConfig,
    ) -> Self {
        Self {
            markets,
            trades,
            profiles,
            scorer,
            engine,
            ledger,
            config,
            running: AtomicBool::new(false),
        }
    }

    /// Run exactly one cycle. Callable directly from tests; the timer loop
    /// in main is just a scheduler around this.
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(MonitorError::CycleInProgress);
        }
        let _guard = RunningGuard(&self.running);

        let cycle_start = Utc::now();
        let window_start = cycle_start - Duration::minutes(self.config.window_minutes);
        let mut stats = CycleStats::default();

        let markets = self
            .markets
            .top_markets(self.config.top_markets)
            .await
            .map_err(|e| MonitorError::SourceUnavailable(e.to_string()))?;
        stats.markets_scanned = markets.len();
        info!("Cycle started: scanning {} markets", markets.len());

        let market_index: HashMap<String, Market> =
            markets.iter().map(|m| (m.id.clone(), m.clone())).collect();

        let per_market = self
            .fetch_trades(&markets, window_start, &mut stats)
            .await;

        let activities = merge_scan(per_market);
        stats.wallets_seen = activities
            .iter()
            .map(|a| a.wallet_address.as_str())
            .collect::<HashSet<_>>()
            .len();

        let profiles = self.fetch_profiles(&activities, &mut stats).await;

        let breakdowns: Vec<ScoreBreakdown> = activities
            .iter()
            .filter_map(|activity| {
                let profile = profiles.get(&activity.wallet_address)?;
                self.scorer.score(activity, profile, cycle_start)
            })
            .collect();
        stats.wallets_scored = breakdowns.len();

        let alerts = self
            .engine
            .decide(&breakdowns, &market_index, &self.ledger, cycle_start);
        stats.alerts_emitted = alerts.len();
        self.ledger.cleanup(cycle_start);

        info!(
            "Cycle done: {} alerts from {} wallets across {} markets \
             ({} fetch failures, {} malformed records)",
            stats.alerts_emitted,
            stats.wallets_seen,
            stats.markets_scanned,
            stats.trade_fetch_failures,
            stats.malformed_records
        );

        Ok(CycleReport {
            cycle_start,
            alerts,
            stats,
        })
    }

    /// Fetch and aggregate each market's trades with bounded concurrency.
    /// A failed or timed-out fetch skips that market only.
    async fn fetch_trades(
        &self,
        markets: &[Market],
        window_start: DateTime<Utc>,
        stats: &mut CycleStats,
    ) -> Vec<HashMap<String, WalletActivity>> {
        let timeout = std::time::Duration::from_secs(self.config.fetch_timeout_secs);
        let limit = self.config.trade_limit;

        let results: Vec<_> = stream::iter(markets.iter().map(|m| m.id.clone()))
            .map(|market_id| async move {
                let fetch = self.trades.recent_trades(&market_id, limit);
                let result = tokio::time::timeout(timeout, fetch).await;
                (market_id, result)
            })
            .buffer_unordered(self.config.max_concurrent_fetches)
            .collect()
            .await;

        let mut per_market = Vec::new();
        for (market_id, result) in results {
            let batch = match result {
                Ok(Ok(batch)) => batch,
                Ok(Err(e)) => {
                    warn!("Skipping market {}: trade fetch failed: {}", market_id, e);
                    stats.trade_fetch_failures += 1;
                    continue;
                }
                Err(_) => {
                    warn!("Skipping market {}: trade fetch timed out", market_id);
                    stats.trade_fetch_failures += 1;
                    continue;
                }
            };

            stats.malformed_records += batch.malformed;
            let aggregated = aggregate(batch.trades, window_start);
            stats.trades_in_window += aggregated.values().map(|a| a.trades.len()).sum::<usize>();
            if !aggregated.is_empty() {
                per_market.push(aggregated);
            }
        }

        per_market
    }

    /// Fetch a fresh profile per distinct wallet with bounded concurrency.
    /// A failed fetch skips scoring that wallet this cycle.
    async fn fetch_profiles(
        &self,
        activities: &[WalletActivity],
        stats: &mut CycleStats,
    ) -> HashMap<String, WalletProfile> {
        let timeout = std::time::Duration::from_secs(self.config.fetch_timeout_secs);
        let wallets: Vec<String> = activities
            .iter()
            .map(|a| a.wallet_address.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let results: Vec<_> = stream::iter(wallets)
            .map(|wallet| async move {
                let fetch = self.profiles.wallet_profile(&wallet);
                let result = tokio::time::timeout(timeout, fetch).await;
                (wallet, result)
            })
            .buffer_unordered(self.config.max_concurrent_fetches)
            .collect()
            .await;

        let mut profiles = HashMap::new();
        for (wallet, result) in results {
            match result {
                Ok(Ok(profile)) => {
                    debug!(
                        "Profile for {}: {} prior trades, {} markets",
                        wallet, profile.total_trade_count, profile.distinct_market_count
                    );
                    profiles.insert(wallet, profile);
                }
                Ok(Err(e)) => {
                    warn!("Skipping wallet {}: {}", wallet, e);
                    stats.profile_failures += 1;
                }
                Err(_) => {
                    warn!("Skipping wallet {}: profile fetch timed out", wallet);
                    stats.profile_failures += 1;
                }
            }
        }

        profiles
    }
}
