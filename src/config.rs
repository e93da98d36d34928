use dotenvy::dotenv;
use eyre::{eyre, Result};
use std::{env, str::FromStr, time::Duration};
use tracing::info;

use crate::history::HistoryMode;
use crate::networks::Holders;
use crate::retry::RetryPolicy;

pub const DEFAULT_TOKEN_API_URL: &str = "https://token-api.thegraph.com";

/// Values shipped in `.env` templates; treated the same as no token at all.
const PLACEHOLDER_TOKENS: [&str; 2] = ["your_graph_token_api_key_here", "your_actual_api_key_here"];

#[derive(Clone)]
pub struct Config {
    pub token_api_url: String,
    pub api_token: Option<String>,
    pub port: u16,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
    pub transfer_limit: u32,
    pub history_mode: HistoryMode,
    pub supply_history_days: u32,
    pub wallet_history_days: u32,
    pub mint_burn_days: u32,
    pub holders: Holders,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token_api_url: DEFAULT_TOKEN_API_URL.to_string(),
            api_token: None,
            port: 8080,
            request_timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
            transfer_limit: 10,
            history_mode: HistoryMode::Empty,
            supply_history_days: 30,
            wallet_history_days: 30,
            mint_burn_days: 7,
            holders: Holders::default(),
        }
    }
}

// Keep the bearer token out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("token_api_url", &self.token_api_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("port", &self.port)
            .field("request_timeout", &self.request_timeout)
            .field("retry", &self.retry)
            .field("transfer_limit", &self.transfer_limit)
            .field("history_mode", &self.history_mode)
            .field("supply_history_days", &self.supply_history_days)
            .field("wallet_history_days", &self.wallet_history_days)
            .field("mint_burn_days", &self.mint_burn_days)
            .field("holder_overrides", &self.holders.len())
            .finish()
    }
}

/// `None` for a missing, blank or template token.
pub fn usable_token(raw: Option<&str>) -> Option<String> {
    let token = raw?.trim();
    if token.is_empty() || PLACEHOLDER_TOKENS.contains(&token) {
        return None;
    }
    Some(token.to_string())
}

fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

pub fn load() -> Result<Config> {
    dotenv().ok(); // .env is optional

    let defaults = Config::default();

    let token_api_url = env::var("TOKEN_API_URL").unwrap_or(defaults.token_api_url);

    let raw_token = env::var("GRAPH_API_TOKEN")
        .or_else(|_| env::var("NEXT_PUBLIC_GRAPH_API_TOKEN")) // alias kept from the web build
        .ok();
    let api_token = usable_token(raw_token.as_deref());

    let retry = RetryPolicy::new(
        parsed_or("RETRY_ATTEMPTS", defaults.retry.max_attempts),
        Duration::from_millis(parsed_or(
            "RETRY_DELAY_MS",
            defaults.retry.delay.as_millis() as u64,
        )),
    );

    let history_mode = match env::var("HISTORY_MODE") {
        Ok(raw) => raw.parse::<HistoryMode>().map_err(|e| eyre!(e))?,
        Err(_) => defaults.history_mode,
    };

    let holders = env::var("HOLDER_ADDRESSES")
        .map(|raw| Holders::parse_list(&raw))
        .unwrap_or_default();

    let cfg = Config {
        token_api_url,
        api_token,
        port: parsed_or("PORT", defaults.port),
        request_timeout: Duration::from_secs(parsed_or(
            "REQUEST_TIMEOUT_SECS",
            defaults.request_timeout.as_secs(),
        )),
        retry,
        transfer_limit: parsed_or("TRANSFER_LIMIT", defaults.transfer_limit),
        history_mode,
        supply_history_days: parsed_or("SUPPLY_HISTORY_DAYS", defaults.supply_history_days),
        wallet_history_days: parsed_or("WALLET_HISTORY_DAYS", defaults.wallet_history_days),
        mint_burn_days: parsed_or("MINT_BURN_DAYS", defaults.mint_burn_days),
        holders,
    };

    info!("Loaded config: {:?}", cfg);

    Ok(cfg)
}
