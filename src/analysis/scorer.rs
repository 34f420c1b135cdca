//! Insider suspicion scoring
//!
//! Four independently computed signals, each an ordered rule list evaluated
//! first-match-wins. The total is the sum of the awarded points, capped
//! at 100. Pure function over a wallet's window activity and its profile
//! snapshot.

use crate::config::ScoringConfig;
use crate::types::{ScoreBreakdown, WalletActivity, WalletProfile};
use chrono::{DateTime, Timelike, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

pub const SIGNAL_NOVELTY: &str = "wallet_novelty";
pub const SIGNAL_BET_SIZE: &str = "bet_size";
pub const SIGNAL_FOCUS: &str = "market_focus";
pub const SIGNAL_TIMING: &str = "odd_hours";

/// UTC hours treated as off-hours activity
const ODD_HOURS: [u32; 8] = [0, 1, 2, 3, 4, 5, 22, 23];

/// One threshold in a signal table
struct Rule<I> {
    points: u32,
    label: &'static str,
    matches: fn(&I) -> bool,
}

fn first_match<'a, I>(rules: &'a [Rule<I>], input: &I) -> Option<&'a Rule<I>> {
    rules.iter().find(|r| (r.matches)(input))
}

struct NoveltyInput {
    trade_count: u64,
    age_days: i64,
    new_wallet_days: i64,
}

struct BetSizeInput {
    total_usd: Decimal,
    min_bet_usd: Decimal,
}

struct FocusInput {
    markets_touched: usize,
}

struct TimingInput {
    hours: Vec<u32>,
}

/// Rule-table scorer for wallet-trade events
pub struct InsiderScorer {
    config: ScoringConfig,
    novelty: Vec<Rule<NoveltyInput>>,
    bet_size: Vec<Rule<BetSizeInput>>,
    focus: Vec<Rule<FocusInput>>,
    timing: Vec<Rule<TimingInput>>,
}

impl InsiderScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            novelty: vec![
                Rule {
                    points: 40,
                    label: "first recorded trade for this wallet",
                    matches: |i| i.trade_count == 0,
                },
                Rule {
                    points: 25,
                    label: "fewer than 5 prior trades",
                    matches: |i| i.trade_count < 5,
                },
                Rule {
                    points: 20,
                    label: "newly created wallet",
                    matches: |i| i.age_days < i.new_wallet_days,
                },
            ],
            bet_size: vec![
                Rule {
                    points: 30,
                    label: "position above $50k",
                    matches: |i| i.total_usd > Decimal::new(50_000, 0),
                },
                Rule {
                    points: 20,
                    label: "position above $20k",
                    matches: |i| i.total_usd > Decimal::new(20_000, 0),
                },
                Rule {
                    points: 15,
                    label: "position above $10k",
                    matches: |i| i.total_usd > Decimal::new(10_000, 0),
                },
                Rule {
                    points: 10,
                    label: "sizeable position",
                    matches: |i| i.total_usd > i.min_bet_usd,
                },
            ],
            focus: vec![
                Rule {
                    points: 20,
                    label: "all activity concentrated in a single market",
                    matches: |i| i.markets_touched == 1,
                },
                Rule {
                    points: 10,
                    label: "activity concentrated in few markets",
                    matches: |i| i.markets_touched <= 3,
                },
            ],
            timing: vec![Rule {
                points: 10,
                label: "traded during off-hours (UTC night)",
                matches: |i| i.hours.iter().any(|h| ODD_HOURS.contains(h)),
            }],
        }
    }

    /// Score one wallet's window activity in one market against its profile.
    ///
    /// Returns None only for an activity with no trades, which the
    /// aggregator never produces.
    pub fn score(
        &self,
        activity: &WalletActivity,
        profile: &WalletProfile,
        now: DateTime<Utc>,
    ) -> Option<ScoreBreakdown> {
        let largest = activity.largest_trade()?;

        let mut components: BTreeMap<&'static str, u32> = BTreeMap::new();
        let mut reasons = Vec::new();

        let novelty_input = NoveltyInput {
            trade_count: profile.total_trade_count,
            age_days: profile.account_age_days(now),
            new_wallet_days: self.config.new_wallet_days,
        };
        match first_match(&self.novelty, &novelty_input) {
            Some(rule) => {
                components.insert(SIGNAL_NOVELTY, rule.points);
                reasons.push(rule.label.to_string());
            }
            None => {
                components.insert(SIGNAL_NOVELTY, 0);
            }
        }

        let bet_input = BetSizeInput {
            total_usd: activity.total_size_usd,
            min_bet_usd: self.config.min_bet_size_usd,
        };
        match first_match(&self.bet_size, &bet_input) {
            Some(rule) => {
                components.insert(SIGNAL_BET_SIZE, rule.points);
                reasons.push(format!(
                    "{} (${:.0} in the window)",
                    rule.label, activity.total_size_usd
                ));
            }
            None => {
                components.insert(SIGNAL_BET_SIZE, 0);
            }
        }

        let focus_input = FocusInput {
            markets_touched: activity.markets_touched_this_window,
        };
        match first_match(&self.focus, &focus_input) {
            Some(rule) => {
                components.insert(SIGNAL_FOCUS, rule.points);
                reasons.push(format!(
                    "{} ({} in this scan)",
                    rule.label, activity.markets_touched_this_window
                ));
            }
            None => {
                components.insert(SIGNAL_FOCUS, 0);
            }
        }

        let timing_input = TimingInput {
            hours: activity.trades.iter().map(|t| t.timestamp.hour()).collect(),
        };
        match first_match(&self.timing, &timing_input) {
            Some(rule) => {
                components.insert(SIGNAL_TIMING, rule.points);
                reasons.push(rule.label.to_string());
            }
            None => {
                components.insert(SIGNAL_TIMING, 0);
            }
        }

        // The maxima sum to 100, so the cap is a safety invariant rather
        // than a clamp that changes behavior
        let total_score = components.values().sum::<u32>().min(100);

        Some(ScoreBreakdown {
            wallet_address: activity.wallet_address.clone(),
            market_id: activity.market_id.clone(),
            total_score,
            components,
            reasons,
            recommended_side: largest.side,
            total_size_usd: activity.total_size_usd,
            largest_trade_usd: largest.size_usd,
            largest_trade_at: largest.timestamp,
            is_first_trade: profile.total_trade_count == 0,
        })
    }
}
