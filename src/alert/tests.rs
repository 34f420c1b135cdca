//! Unit tests for alert decisions and deduplication

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::types::{AlertKey, Market, ScoreBreakdown, Severity, Side};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use std::collections::{BTreeMap, HashMap};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap()
    }

    fn market(id: &str) -> Market {
        Market {
            id: id.to_string(),
            question: format!("Question for {}?", id),
            slug: format!("slug-{}", id),
            volume: dec!(500000),
        }
    }

    fn market_index(ids: &[&str]) -> HashMap<String, Market> {
        ids.iter().map(|id| (id.to_string(), market(id))).collect()
    }

    fn breakdown(wallet: &str, market_id: &str, score: u32) -> ScoreBreakdown {
        let mut components = BTreeMap::new();
        components.insert("bet_size", score);
        ScoreBreakdown {
            wallet_address: wallet.to_string(),
            market_id: market_id.to_string(),
            total_score: score,
            components,
            reasons: vec!["large position".to_string(), "single market".to_string()],
            recommended_side: Side::Yes,
            total_size_usd: dec!(12000),
            largest_trade_usd: dec!(12000),
            largest_trade_at: now() - Duration::minutes(10),
            is_first_trade: false,
        }
    }

    // ---- ledger ----

    #[test]
    fn test_ledger_allows_unseen_key() {
        let ledger = AlertLedger::new(5);
        let key = AlertKey {
            wallet_address: "0xa".to_string(),
            market_id: "m1".to_string(),
        };
        assert!(ledger.can_alert(&key, now()));
    }

    #[test]
    fn test_ledger_blocks_within_cooldown() {
        let ledger = AlertLedger::new(5);
        let key = AlertKey {
            wallet_address: "0xa".to_string(),
            market_id: "m1".to_string(),
        };
        ledger.mark_alerted(key.clone(), now());
        assert!(!ledger.can_alert(&key, now() + Duration::minutes(4)));
    }

    #[test]
    fn test_ledger_allows_after_cooldown() {
        let ledger = AlertLedger::new(5);
        let key = AlertKey {
            wallet_address: "0xa".to_string(),
            market_id: "m1".to_string(),
        };
        ledger.mark_alerted(key.clone(), now());
        assert!(ledger.can_alert(&key, now() + Duration::minutes(5)));
    }

    #[test]
    fn test_ledger_cleanup_drops_stale_entries() {
        let ledger = AlertLedger::new(5);
        let key = AlertKey {
            wallet_address: "0xa".to_string(),
            market_id: "m1".to_string(),
        };
        ledger.mark_alerted(key, now());
        assert_eq!(ledger.len(), 1);

        ledger.cleanup(now() + Duration::minutes(11));
        assert!(ledger.is_empty());
    }

    // ---- decision engine ----

    #[test]
    fn test_threshold_is_inclusive() {
        let engine = AlertDecisionEngine::new(50);
        let ledger = AlertLedger::new(5);
        let markets = market_index(&["m1", "m2"]);

        let events = engine.decide(
            &[breakdown("0xa", "m1", 49), breakdown("0xb", "m2", 50)],
            &markets,
            &ledger,
            now(),
        );

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].wallet_address, "0xb");
        assert_eq!(events[0].severity, Severity::Medium);
    }

    #[test]
    fn test_severity_tiers_on_events() {
        let engine = AlertDecisionEngine::new(50);
        let ledger = AlertLedger::new(5);
        let markets = market_index(&["m1", "m2", "m3"]);

        let events = engine.decide(
            &[
                breakdown("0xa", "m1", 55),
                breakdown("0xb", "m2", 70),
                breakdown("0xc", "m3", 90),
            ],
            &markets,
            &ledger,
            now(),
        );

        let severities: Vec<Severity> = events.iter().map(|e| e.severity).collect();
        assert_eq!(
            severities,
            vec![Severity::Medium, Severity::High, Severity::Critical]
        );
    }

    #[test]
    fn test_duplicate_key_suppressed_within_cooldown() {
        let engine = AlertDecisionEngine::new(50);
        let ledger = AlertLedger::new(5);
        let markets = market_index(&["m1"]);
        let scored = [breakdown("0xa", "m1", 80)];

        let first = engine.decide(&scored, &markets, &ledger, now());
        assert_eq!(first.len(), 1);

        // Next cycle, cooldown not yet elapsed
        let second = engine.decide(&scored, &markets, &ledger, now() + Duration::minutes(4));
        assert!(second.is_empty());
    }

    #[test]
    fn test_duplicate_key_realerted_after_cooldown() {
        let engine = AlertDecisionEngine::new(50);
        let ledger = AlertLedger::new(5);
        let markets = market_index(&["m1"]);
        let scored = [breakdown("0xa", "m1", 80)];

        engine.decide(&scored, &markets, &ledger, now());
        let later = engine.decide(&scored, &markets, &ledger, now() + Duration::minutes(6));
        assert_eq!(later.len(), 1);
    }

    #[test]
    fn test_sub_threshold_scores_never_occupy_ledger() {
        let engine = AlertDecisionEngine::new(50);
        let ledger = AlertLedger::new(5);
        let markets = market_index(&["m1"]);

        engine.decide(&[breakdown("0xa", "m1", 30)], &markets, &ledger, now());
        assert!(ledger.is_empty());

        // The same key may alert later once it crosses the threshold
        let events = engine.decide(&[breakdown("0xa", "m1", 60)], &markets, &ledger, now());
        assert_eq!(events.len(), 1);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_same_wallet_different_markets_alert_independently() {
        let engine = AlertDecisionEngine::new(50);
        let ledger = AlertLedger::new(5);
        let markets = market_index(&["m1", "m2"]);

        let events = engine.decide(
            &[breakdown("0xa", "m1", 80), breakdown("0xa", "m2", 80)],
            &markets,
            &ledger,
            now(),
        );
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_unknown_market_is_skipped() {
        let engine = AlertDecisionEngine::new(50);
        let ledger = AlertLedger::new(5);
        let markets = market_index(&["m1"]);

        let events = engine.decide(&[breakdown("0xa", "m9", 80)], &markets, &ledger, now());
        assert!(events.is_empty());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_event_carries_breakdown_fields() {
        let engine = AlertDecisionEngine::new(50);
        let ledger = AlertLedger::new(5);
        let markets = market_index(&["m1"]);

        let scored = breakdown("0xa", "m1", 80);
        let events = engine.decide(
            &[scored.clone()],
            &markets,
            &ledger,
            now(),
        );

        let event = &events[0];
        assert_eq!(event.market.id, "m1");
        assert_eq!(event.score, 80);
        assert_eq!(event.recommended_side, Side::Yes);
        assert_eq!(event.size_usd, dec!(12000));
        assert_eq!(event.trade_timestamp, scored.largest_trade_at);
        assert_eq!(event.reasons, scored.reasons);
    }
}
