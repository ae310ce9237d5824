//! Client for the CoinGecko simple price endpoint.

use log::debug;
use rust_decimal::Decimal;
use serde_json::Value;

use std::str::FromStr;

use crate::error::FetchError;
use crate::service::{check_status, PriceSource};

pub const URL: &str = "https://api.coingecko.com/api/v3/simple/price?ids=solana&vs_currencies=usd";

const PRICE_POINTER: &str = "/solana/usd";

pub struct CoinGecko {
    url: String,
    http: reqwest::blocking::Client,
}

impl CoinGecko {
    pub fn new(url: &str, http: reqwest::blocking::Client) -> Self {
        Self {
            url: url.to_string(),
            http,
        }
    }

    fn data(&self) -> Result<Value, FetchError> {
        debug!("GET {}", self.url);

        let response = check_status(self.http.get(&self.url).send()?)?;

        let body = response.text()?;

        serde_json::from_str(&body)
            .map_err(|e| FetchError::service(format!("Malformed price response: {}", e)))
    }

    fn price(data: &Value) -> Result<Decimal, FetchError> {
        let value = data
            .pointer(PRICE_POINTER)
            .filter(|val| val.is_number())
            .map(|val| val.to_string())
            .ok_or_else(|| FetchError::service("Price could not be found in the response"))?;

        Decimal::from_str(&value)
            .or_else(|_| Decimal::from_scientific(&value))
            .map_err(|e| {
                FetchError::service(format!("Price '{}' could not be parsed: {}", value, e))
            })
    }
}

impl PriceSource for CoinGecko {
    fn unit_price(&self) -> Result<Decimal, FetchError> {
        let data = self.data()?;

        CoinGecko::price(&data)
    }
}
