#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use serde_json::{json, Value};
use usdc_dashboard::{
    client::TokenApiClient,
    config::Config,
    history::HistoryMode,
    networks::{Network, SAMPLE_HOLDER},
    retry::RetryPolicy,
};
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockBuilder, MockServer,
};

pub const TOKEN: &str = "test-token";

pub fn config(server: &MockServer) -> Config {
    Config {
        token_api_url: server.uri(),
        api_token: Some(TOKEN.to_string()),
        request_timeout: Duration::from_secs(5),
        retry: RetryPolicy::new(3, Duration::ZERO),
        ..Config::default()
    }
}

pub fn synthetic_config(server: &MockServer) -> Config {
    Config {
        history_mode: HistoryMode::Synthetic,
        ..config(server)
    }
}

pub fn client(cfg: &Config) -> Arc<TokenApiClient> {
    Arc::new(TokenApiClient::new(cfg).unwrap())
}

pub fn usdc(network: Network) -> String {
    format!("{:#x}", network.usdc_contract())
}

pub fn balance_body(network: Network, amount: &str, price: Option<f64>) -> Value {
    json!({
        "data": [
            {
                "contract": "0x0000000000000000000000000000000000001010",
                "amount": "999",
                "decimals": 18,
                "symbol": "POL"
            },
            {
                "contract": usdc(network).to_uppercase().replacen("0X", "0x", 1),
                "amount": amount,
                "decimals": 6,
                "symbol": "USDC",
                "price_usd": price
            }
        ]
    })
}

pub fn transfer(network: Network, symbol: &str, amount: &str, tx: &str) -> Value {
    json!({
        "contract": usdc(network),
        "from": "0x1111111111111111111111111111111111111111",
        "to": "0x2222222222222222222222222222222222222222",
        "amount": amount,
        "decimals": 6,
        "symbol": symbol,
        "datetime": "2025-05-14 17:50:11",
        "transaction_id": tx
    })
}

pub fn balances_for(network: Network) -> MockBuilder {
    Mock::given(method("GET"))
        .and(path(format!("/balances/evm/{}", SAMPLE_HOLDER)))
        .and(query_param("network_id", network.api_id()))
        .and(header("Authorization", format!("Bearer {}", TOKEN).as_str()))
}

pub fn transfers_for(network: Network) -> MockBuilder {
    Mock::given(method("GET"))
        .and(path(format!("/transfers/evm/{}", SAMPLE_HOLDER)))
        .and(query_param("network_id", network.api_id()))
}
