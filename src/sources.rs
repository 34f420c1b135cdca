//! Abstract contracts for the external data the pipeline consumes
//!
//! The pipeline only sees these traits; production wires them to the
//! Polymarket clients, tests substitute mocks.

use crate::client::{DataClient, GammaClient};
use crate::error::Result;
use crate::types::{Market, TradeBatch, WalletProfile};
use async_trait::async_trait;

/// Ranked list of active markets by volume
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketSource: Send + Sync {
    async fn top_markets(&self, limit: usize) -> Result<Vec<Market>>;
}

/// Recent trade records for a market
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TradeSource: Send + Sync {
    async fn recent_trades(&self, market_id: &str, limit: usize) -> Result<TradeBatch>;
}

/// Wallet trading-history snapshots
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletProfileSource: Send + Sync {
    async fn wallet_profile(&self, address: &str) -> Result<WalletProfile>;
}

#[async_trait]
impl MarketSource for GammaClient {
    async fn top_markets(&self, limit: usize) -> Result<Vec<Market>> {
        GammaClient::top_markets(self, limit).await
    }
}

#[async_trait]
impl TradeSource for DataClient {
    async fn recent_trades(&self, market_id: &str, limit: usize) -> Result<TradeBatch> {
        DataClient::recent_trades(self, market_id, limit).await
    }
}

#[async_trait]
impl WalletProfileSource for DataClient {
    async fn wallet_profile(&self, address: &str) -> Result<WalletProfile> {
        DataClient::wallet_profile(self, address).await
    }
}
