//! Gamma API client for market data
//!
//! Supplies the ranked list of active markets scanned each cycle.

use crate::error::Result;
use crate::types::Market;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

/// Gamma API client for market data
#[derive(Clone)]
pub struct GammaClient {
    http: Client,
    base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
struct GammaMarket {
    id: String,
    question: String,
    slug: Option<String>,
    volume: Option<String>,
    active: bool,
    closed: bool,
}

impl GammaClient {
    /// Create a new Gamma client
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the top markets by volume, descending
    pub async fn top_markets(&self, limit: usize) -> Result<Vec<Market>> {
        let url = format!("{}/markets", self.base_url);
        let resp: Vec<GammaMarket> = self
            .http
            .get(&url)
            .query(&[
                ("active", "true"),
                ("closed", "false"),
                ("_sort", "volume:desc"),
                ("_limit", &limit.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let markets: Vec<Market> = resp.into_iter().filter_map(parse_market).collect();
        debug!("Fetched {} active markets", markets.len());
        Ok(markets)
    }
}

fn parse_market(gm: GammaMarket) -> Option<Market> {
    if !gm.active || gm.closed {
        return None;
    }

    Some(Market {
        id: gm.id,
        question: gm.question,
        slug: gm.slug.unwrap_or_default(),
        // Volume comes back as a string like "1234567.89"
        volume: gm
            .volume
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(Decimal::ZERO),
    })
}
