//! OKX public REST provider
//!
//! Uses the unauthenticated v5 market endpoints:
//!
//! - `GET /api/v5/market/ticker?instId=BTC-USD` for spot (best bid is used)
//! - `GET /api/v5/market/tickers?instType=OPTION&instFamily=BTC-USD` for the chain
//! - `GET /api/v5/market/ticker?instId=<option>` for a single option

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::MarketDataError;
use crate::provider::MarketDataProvider;
use crate::types::{parse_price, OptionQuote};
use crate::Result;

pub const DEFAULT_BASE_URL: &str = "https://www.okx.com";

/// Response envelope shared by every OKX v5 endpoint
#[derive(Debug, Deserialize)]
pub struct OkxEnvelope<T> {
    pub code: String,
    #[serde(default)]
    pub msg: String,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

impl<T> OkxEnvelope<T> {
    /// Unwrap the payload, turning a non-zero code into an error
    pub fn into_data(self) -> Result<Vec<T>> {
        if self.code != "0" {
            return Err(MarketDataError::Provider(format!(
                "code {}: {}",
                self.code, self.msg
            )));
        }
        Ok(self.data)
    }
}

/// Ticker row. Prices arrive as strings and may be empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OkxTicker {
    pub inst_id: String,
    #[serde(default)]
    pub ask_px: String,
    #[serde(default)]
    pub bid_px: String,
}

impl From<OkxTicker> for OptionQuote {
    fn from(t: OkxTicker) -> Self {
        OptionQuote {
            ask: parse_price(&t.ask_px),
            bid: parse_price(&t.bid_px),
            inst_id: t.inst_id,
        }
    }
}

/// HTTP client for the OKX market endpoints
pub struct OkxProvider {
    client: Client,
    base_url: String,
    spot_inst_id: String,
    option_family: String,
}

impl OkxProvider {
    /// Create a provider against `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MarketDataError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            spot_inst_id: "BTC-USD".to_string(),
            option_family: "BTC-USD".to_string(),
        })
    }

    /// Instrument whose best bid is used as spot
    pub fn with_spot_inst_id(mut self, inst_id: impl Into<String>) -> Self {
        self.spot_inst_id = inst_id.into();
        self
    }

    /// Option family to list, e.g. `BTC-USD`
    pub fn with_option_family(mut self, family: impl Into<String>) -> Self {
        self.option_family = family.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<T>> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| MarketDataError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MarketDataError::Http {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<OkxEnvelope<T>>()
            .await
            .map_err(|e| MarketDataError::InvalidResponse(e.to_string()))?
            .into_data()
    }

    async fn ticker(&self, inst_id: &str) -> Result<OkxTicker> {
        self.get::<OkxTicker>("/api/v5/market/ticker", &[("instId", inst_id)])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| MarketDataError::DataNotAvailable(inst_id.to_string()))
    }
}

#[async_trait]
impl MarketDataProvider for OkxProvider {
    fn name(&self) -> &str {
        "okx"
    }

    #[instrument(skip(self), fields(inst_id = %self.spot_inst_id))]
    async fn spot_price(&self) -> Result<f64> {
        let ticker = self.ticker(&self.spot_inst_id).await?;
        parse_price(&ticker.bid_px).ok_or_else(|| {
            MarketDataError::InvalidResponse(format!("bidPx {:?} is not a price", ticker.bid_px))
        })
    }

    #[instrument(skip(self), fields(family = %self.option_family))]
    async fn option_chain(&self) -> Result<Vec<OptionQuote>> {
        let tickers = self
            .get::<OkxTicker>(
                "/api/v5/market/tickers",
                &[("instType", "OPTION"), ("instFamily", &self.option_family)],
            )
            .await?;

        debug!(count = tickers.len(), "Fetched option tickers");
        Ok(tickers.into_iter().map(OptionQuote::from).collect())
    }

    async fn option_quote(&self, inst_id: &str) -> Result<OptionQuote> {
        self.ticker(inst_id).await.map(OptionQuote::from)
    }
}
