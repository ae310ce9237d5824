//! Minimal JSON-RPC client for the Solana `getBalance` method.

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entity::account::Account;
use crate::error::FetchError;
use crate::service::{check_status, BalanceSource};

pub const URL: &str = "https://api.mainnet-beta.solana.com";
pub const COMMITMENT: &str = "confirmed";

const LAMPORTS_SCALE: u32 = 9;
const RATE_LIMITED_CODE: i64 = 429;

#[derive(Serialize)]
struct Request<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: (&'a str, Config<'a>),
}

#[derive(Serialize)]
struct Config<'a> {
    commitment: &'a str,
}

#[derive(Deserialize, Debug)]
struct Response {
    result: Option<BalanceResult>,
    error: Option<RpcError>,
}

#[derive(Deserialize, Debug)]
struct BalanceResult {
    value: u64,
}

#[derive(Deserialize, Debug)]
struct RpcError {
    code: i64,
    message: String,
}

pub struct Solana {
    url: String,
    commitment: String,
    http: reqwest::blocking::Client,
}

impl Solana {
    pub fn new(url: &str, commitment: &str, http: reqwest::blocking::Client) -> Self {
        Self {
            url: url.to_string(),
            commitment: commitment.to_string(),
            http,
        }
    }

    fn request<'a>(&'a self, account: &'a Account) -> Request<'a> {
        Request {
            jsonrpc: "2.0",
            id: 1,
            method: "getBalance",
            params: (
                account.as_str(),
                Config {
                    commitment: &self.commitment,
                },
            ),
        }
    }

    fn interpret(response: Response) -> Result<Decimal, FetchError> {
        match response {
            Response {
                error: Some(err), ..
            } if err.code == RATE_LIMITED_CODE => Err(FetchError::RateLimited {
                message: err.message,
            }),
            Response {
                error: Some(err), ..
            } => Err(FetchError::service(format!(
                "RPC error {}: {}",
                err.code, err.message
            ))),
            Response {
                result: Some(result),
                ..
            } => Ok(Solana::lamports_to_sol(result.value)),
            _ => Err(FetchError::service("RPC response has neither result nor error")),
        }
    }

    fn lamports_to_sol(lamports: u64) -> Decimal {
        Decimal::from_i128_with_scale(i128::from(lamports), LAMPORTS_SCALE).normalize()
    }
}

impl BalanceSource for Solana {
    fn balance(&self, account: &Account) -> Result<Decimal, FetchError> {
        debug!("getBalance {} on {}", account, self.url);

        let response = self.http.post(&self.url).json(&self.request(account)).send()?;

        let body = check_status(response)?.text()?;

        let response: Response = serde_json::from_str(&body)
            .map_err(|e| FetchError::service(format!("Malformed RPC response: {}", e)))?;

        Solana::interpret(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<Decimal, FetchError> {
        Solana::interpret(serde_json::from_str(body).unwrap())
    }

    #[test]
    fn converts_lamports_to_sol() {
        let body = r#"{"jsonrpc":"2.0","result":{"context":{"slot":1},"value":1500000000},"id":1}"#;

        assert_eq!(parse(body).unwrap(), Decimal::new(15, 1));
    }

    #[test]
    fn keeps_single_lamports() {
        assert_eq!(Solana::lamports_to_sol(1), Decimal::new(1, 9));
        assert_eq!(Solana::lamports_to_sol(0), Decimal::ZERO);
    }

    #[test]
    fn rate_limit_error_is_transient() {
        let body = r#"{"jsonrpc":"2.0","error":{"code":429,"message":"Too many requests"},"id":1}"#;

        assert!(parse(body).unwrap_err().is_transient());
    }

    #[test]
    fn other_rpc_errors_are_permanent() {
        let body = r#"{"jsonrpc":"2.0","error":{"code":-32602,"message":"Invalid param"},"id":1}"#;

        let err = parse(body).unwrap_err();

        assert!(!err.is_transient());
        assert_eq!(err.to_string(), "RPC error -32602: Invalid param");
    }

    #[test]
    fn builds_a_get_balance_request() {
        let client = Solana::new(URL, COMMITMENT, reqwest::blocking::Client::new());
        let account = Account::new("11111111111111111111111111111111");

        let request = serde_json::to_value(client.request(&account)).unwrap();

        assert_eq!(
            request,
            serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "getBalance",
                "params": ["11111111111111111111111111111111", { "commitment": "confirmed" }]
            })
        );
    }
}
