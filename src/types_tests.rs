//! Tests for core types

#[cfg(test)]
mod tests {
    use super::super::types::*;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    #[test]
    fn test_side_serialization() {
        assert_eq!(serde_json::to_string(&Side::Yes).unwrap(), "\"YES\"");
        assert_eq!(serde_json::to_string(&Side::No).unwrap(), "\"NO\"");
    }

    #[test]
    fn test_side_deserialization() {
        let yes: Side = serde_json::from_str("\"YES\"").unwrap();
        let no: Side = serde_json::from_str("\"NO\"").unwrap();
        assert_eq!(yes, Side::Yes);
        assert_eq!(no, Side::No);
    }

    #[test]
    fn test_side_deserialization_accepts_api_casing() {
        let yes: Side = serde_json::from_str("\"Yes\"").unwrap();
        let no: Side = serde_json::from_str("\"No\"").unwrap();
        assert_eq!(yes, Side::Yes);
        assert_eq!(no, Side::No);
    }

    #[test]
    fn test_side_display() {
        assert_eq!(Side::Yes.to_string(), "YES");
        assert_eq!(Side::No.to_string(), "NO");
    }

    #[test]
    fn test_market_url() {
        let market = Market {
            id: "0xabc".to_string(),
            question: "Test?".to_string(),
            slug: "test-market".to_string(),
            volume: dec!(1000),
        };
        assert_eq!(market.url(), "https://polymarket.com/market/test-market");
    }

    #[test]
    fn test_market_url_without_slug() {
        let market = Market {
            id: "0xabc".to_string(),
            question: "Test?".to_string(),
            slug: String::new(),
            volume: dec!(1000),
        };
        assert_eq!(market.url(), "https://polymarket.com");
    }

    #[test]
    fn test_severity_from_score_boundaries() {
        assert_eq!(Severity::from_score(49), None);
        assert_eq!(Severity::from_score(50), Some(Severity::Medium));
        assert_eq!(Severity::from_score(64), Some(Severity::Medium));
        assert_eq!(Severity::from_score(65), Some(Severity::High));
        assert_eq!(Severity::from_score(79), Some(Severity::High));
        assert_eq!(Severity::from_score(80), Some(Severity::Critical));
        assert_eq!(Severity::from_score(100), Some(Severity::Critical));
    }

    #[test]
    fn test_severity_labels() {
        assert_eq!(Severity::Medium.label(), "MEDIUM");
        assert_eq!(Severity::High.label(), "HIGH");
        assert_eq!(Severity::Critical.label(), "CRITICAL");
    }

    #[test]
    fn test_wallet_activity_largest_trade() {
        let base = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let make = |size, minutes| Trade {
            market_id: "m1".to_string(),
            wallet_address: "0xw".to_string(),
            side: if minutes == 1 { Side::No } else { Side::Yes },
            size_usd: size,
            timestamp: base + Duration::minutes(minutes),
        };

        let activity = WalletActivity {
            wallet_address: "0xw".to_string(),
            market_id: "m1".to_string(),
            trades: vec![make(dec!(100), 0), make(dec!(900), 1), make(dec!(500), 2)],
            total_size_usd: dec!(1500),
            markets_touched_this_window: 1,
        };

        let largest = activity.largest_trade().unwrap();
        assert_eq!(largest.size_usd, dec!(900));
        assert_eq!(largest.side, Side::No);
    }

    #[test]
    fn test_wallet_activity_largest_trade_empty() {
        let activity = WalletActivity {
            wallet_address: "0xw".to_string(),
            market_id: "m1".to_string(),
            trades: vec![],
            total_size_usd: dec!(0),
            markets_touched_this_window: 0,
        };
        assert!(activity.largest_trade().is_none());
    }

    #[test]
    fn test_wallet_profile_account_age() {
        let now = Utc.with_ymd_and_hms(2026, 3, 31, 0, 0, 0).unwrap();
        let profile = WalletProfile {
            address: "0xw".to_string(),
            first_seen: Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap(),
            total_trade_count: 7,
            distinct_market_count: 2,
        };
        assert_eq!(profile.account_age_days(now), 30);
    }

    #[test]
    fn test_alert_key_equality() {
        let a = AlertKey {
            wallet_address: "0xw".to_string(),
            market_id: "m1".to_string(),
        };
        let b = AlertKey {
            wallet_address: "0xw".to_string(),
            market_id: "m1".to_string(),
        };
        let c = AlertKey {
            wallet_address: "0xw".to_string(),
            market_id: "m2".to_string(),
        };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
