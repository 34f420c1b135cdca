//! Polymarket API clients

pub mod data;
pub mod gamma;

pub use data::DataClient;
pub use gamma::GammaClient;

use crate::config::PolymarketConfig;
use crate::error::Result;

/// Facade over the two Polymarket APIs the monitor reads
#[derive(Clone)]
pub struct PolymarketClient {
    pub gamma: GammaClient,
    pub data: DataClient,
}

impl PolymarketClient {
    pub fn new(config: &PolymarketConfig) -> Result<Self> {
        Ok(Self {
            gamma: GammaClient::new(&config.gamma_url)?,
            data: DataClient::new(&config.data_url)?,
        })
    }
}
