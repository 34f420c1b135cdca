//! Configuration loading
//!
//! Settings come from a TOML file plus `MONITOR_`-prefixed environment
//! overrides. `.env` is loaded before the CLI parses anything.

use crate::error::Result;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub polymarket: PolymarketConfig,
    #[serde(default)]
    pub scanner: ScannerConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub alerts: AlertConfig,
    pub telegram: Option<TelegramConfig>,
}

/// API endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct PolymarketConfig {
    #[serde(default = "default_gamma_url")]
    pub gamma_url: String,
    #[serde(default = "default_data_url")]
    pub data_url: String,
}

fn default_gamma_url() -> String {
    "https://gamma-api.polymarket.com".to_string()
}

fn default_data_url() -> String {
    "https://data-api.polymarket.com".to_string()
}

impl Default for PolymarketConfig {
    fn default() -> Self {
        Self {
            gamma_url: default_gamma_url(),
            data_url: default_data_url(),
        }
    }
}

/// Cycle scheduling and fetch fan-out
#[derive(Debug, Clone, Deserialize)]
pub struct ScannerConfig {
    /// How many markets to scan per cycle, ranked by volume
    #[serde(default = "default_top_markets")]
    pub top_markets: usize,
    /// Most recent trades fetched per market
    #[serde(default = "default_trade_limit")]
    pub trade_limit: usize,
    /// Trailing aggregation window relative to cycle start
    #[serde(default = "default_window_minutes")]
    pub window_minutes: i64,
    #[serde(default = "default_cycle_interval_minutes")]
    pub cycle_interval_minutes: u64,
    /// Cap on concurrent trade/profile fetches
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_top_markets() -> usize {
    50
}

fn default_trade_limit() -> usize {
    100
}

fn default_window_minutes() -> i64 {
    60
}

fn default_cycle_interval_minutes() -> u64 {
    5
}

fn default_max_concurrent_fetches() -> usize {
    8
}

fn default_fetch_timeout_secs() -> u64 {
    20
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            top_markets: default_top_markets(),
            trade_limit: default_trade_limit(),
            window_minutes: default_window_minutes(),
            cycle_interval_minutes: default_cycle_interval_minutes(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

/// Signal thresholds
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Lowest bet-size breakpoint; wallets at or below this score no
    /// bet-size points
    #[serde(default = "default_min_bet_size_usd")]
    pub min_bet_size_usd: Decimal,
    /// Accounts younger than this count as new
    #[serde(default = "default_new_wallet_days")]
    pub new_wallet_days: i64,
}

fn default_min_bet_size_usd() -> Decimal {
    Decimal::new(5000, 0)
}

fn default_new_wallet_days() -> i64 {
    30
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_bet_size_usd: default_min_bet_size_usd(),
            new_wallet_days: default_new_wallet_days(),
        }
    }
}

/// Alert threshold and dedup cooldown
#[derive(Debug, Clone, Deserialize)]
pub struct AlertConfig {
    #[serde(default = "default_threshold")]
    pub threshold: u32,
    /// Minutes before the same (wallet, market) pair may alert again.
    /// Defaults to the cycle interval when unset.
    pub cooldown_minutes: Option<i64>,
}

fn default_threshold() -> u32 {
    50
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            cooldown_minutes: None,
        }
    }
}

impl AlertConfig {
    pub fn cooldown_minutes_or(&self, cycle_interval_minutes: u64) -> i64 {
        self.cooldown_minutes
            .unwrap_or(cycle_interval_minutes as i64)
    }
}

/// Telegram notification settings
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    #[serde(default = "default_true")]
    pub notify_errors: bool,
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file, with `MONITOR_`-prefixed
    /// environment variables taking precedence
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("MONITOR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
