// src/parser.rs
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{DashboardError, Result};
use crate::models::{NetworkMetrics, TokenBalance, TransferRecord, UpstreamTransfer};
use crate::networks::{Network, USDC_DECIMALS, USDC_SYMBOL};

/// `raw / 10^decimals`, computed in decimal space before dropping to f64.
pub fn normalize_amount(raw: &str, decimals: u8) -> Result<f64> {
    let invalid = || DashboardError::InvalidAmount(raw.to_string());

    let mut value = Decimal::from_str(raw.trim()).map_err(|_| invalid())?;
    let scale = value.scale() + u32::from(decimals);
    if scale <= 28 {
        value.set_scale(scale).map_err(|_| invalid())?;
        return value.to_f64().ok_or_else(invalid);
    }
    // past Decimal's 28-digit scale limit
    let whole = value.to_f64().ok_or_else(invalid)?;
    Ok(whole / 10f64.powi(i32::from(decimals)))
}

/// Pick this network's USDC holding out of a balance list.
pub fn find_usdc(network: Network, balances: &[TokenBalance]) -> Option<&TokenBalance> {
    balances.iter().find(|b| network.is_usdc_contract(&b.contract))
}

/// Price falls back to the $1 peg when upstream has none.
pub fn balance_to_metrics(network: Network, balance: &TokenBalance) -> Result<NetworkMetrics> {
    let total_supply = normalize_amount(&balance.amount, balance.decimals)?;
    let price = balance.price_usd.filter(|p| p.is_finite() && *p > 0.0).unwrap_or(1.0);
    let market_cap = balance.value_usd.unwrap_or(total_supply * price);

    Ok(NetworkMetrics {
        network,
        total_supply,
        holder_count: 0,
        price,
        market_cap,
        daily_volume: 0.0,
    })
}

/// `datetime` wins over `timestamp`; unix seconds become RFC3339.
pub fn transfer_time(t: &UpstreamTransfer) -> String {
    if let Some(dt) = t.datetime.as_deref().filter(|s| !s.is_empty()) {
        return dt.to_string();
    }
    match &t.timestamp {
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_default(),
        Some(serde_json::Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

/// USDC transfers on `network` only; anything else in the list is dropped.
pub fn decode_transfer(network: Network, t: &UpstreamTransfer) -> Option<TransferRecord> {
    if !network.is_usdc_contract(&t.contract) {
        return None;
    }
    if t.symbol.as_deref() != Some(USDC_SYMBOL) {
        return None;
    }

    let amount = normalize_amount(&t.amount, t.decimals.unwrap_or(USDC_DECIMALS)).ok()?;

    Some(TransferRecord {
        from: t.from.clone(),
        to: t.to.clone(),
        amount,
        timestamp: transfer_time(t),
        transaction_id: t.transaction_id.clone(),
        network,
    })
}
