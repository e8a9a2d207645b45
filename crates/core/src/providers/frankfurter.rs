use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::asset::Currency;
use super::traits::ExchangeRateProvider;

const BASE_URL: &str = "https://api.frankfurter.dev/v1";

/// Frankfurter API provider for fiat exchange rates.
///
/// - **Free**: No API key, no rate limits, open-source.
/// - **Source**: European Central Bank (ECB) data.
/// - **Coverage**: ~30+ currencies including USD and KRW.
pub struct FrankfurterProvider {
    client: Client,
}

impl FrankfurterProvider {
    pub fn new() -> Self {
        let builder = Client::builder().timeout(Duration::from_secs(10));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
        }
    }
}

impl Default for FrankfurterProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── Frankfurter API response types ──────────────────────────────────

#[derive(Deserialize)]
struct RatesResponse {
    rates: HashMap<String, f64>,
}

#[async_trait]
impl ExchangeRateProvider for FrankfurterProvider {
    fn name(&self) -> &str {
        "Frankfurter"
    }

    async fn current_rate(&self, base: Currency, quote: Currency) -> Result<f64, CoreError> {
        if base == quote {
            return Ok(1.0);
        }

        let base_code = base.code();
        let quote_code = quote.code();
        let url = format!("{BASE_URL}/latest?base={base_code}&symbols={quote_code}");

        let resp: RatesResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "Frankfurter".into(),
                message: format!("Failed to parse response for {base_code}/{quote_code}: {e}"),
            })?;

        resp.rates
            .get(quote_code)
            .copied()
            .ok_or_else(|| CoreError::Api {
                provider: "Frankfurter".into(),
                message: format!("No rate found for {base_code} → {quote_code}"),
            })
    }
}
