// src/models.rs
use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::networks::Network;

// ---------- Upstream token API payloads ----------

/// `{ data: [...] }` envelope returned by the balances and transfers endpoints.
/// Rows that do not decode are skipped so one bad token cannot sink the list.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct ApiEnvelope<T> {
    #[serde(alias = "transfers", default = "Vec::new", deserialize_with = "decodable_rows")]
    pub data: Vec<T>,
}

fn decodable_rows<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let rows = Vec::<serde_json::Value>::deserialize(de)?;
    Ok(rows
        .into_iter()
        .filter_map(|row| match serde_json::from_value(row) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("Skipping malformed upstream row: {}", e);
                None
            }
        })
        .collect())
}

/// One holding of one address on one network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenBalance {
    pub contract: String,
    #[serde(deserialize_with = "string_or_number")]
    pub amount: String, // raw, smallest unit
    pub decimals: u8,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price_usd: Option<f64>,
    #[serde(default)]
    pub value_usd: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamTransfer {
    #[serde(default)]
    pub contract: String,
    pub from: String,
    pub to: String,
    #[serde(deserialize_with = "string_or_number")]
    pub amount: String,
    #[serde(default)]
    pub decimals: Option<u8>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub datetime: Option<String>,
    #[serde(default)]
    pub timestamp: Option<serde_json::Value>,
    #[serde(alias = "transaction_hash", default)]
    pub transaction_id: String,
}

fn string_or_number<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(de)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected amount string or number, got {}",
            other
        ))),
    }
}

// ---------- Normalized dashboard records ----------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkMetrics {
    pub network: Network,
    pub total_supply: f64,
    pub holder_count: u64, // not exposed upstream
    pub price: f64,
    pub market_cap: f64,
    pub daily_volume: f64, // not exposed upstream
}

impl NetworkMetrics {
    /// Zeroed record shown when a network could not be sampled.
    pub fn placeholder(network: Network) -> Self {
        Self {
            network,
            total_supply: 0.0,
            holder_count: 0,
            price: 1.0,
            market_cap: 0.0,
            daily_volume: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferRecord {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub timestamp: String,
    pub transaction_id: String,
    pub network: Network,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MintBurnPoint {
    pub date: NaiveDate,
    pub minted: f64,
    pub burned: f64,
}

/// A time series plus a flag telling consumers whether its points were fabricated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalSeries<P> {
    pub synthetic: bool,
    pub points: Vec<P>,
}

impl<P> HistoricalSeries<P> {
    pub fn unsupported() -> Self {
        Self {
            synthetic: false,
            points: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl<P> Default for HistoricalSeries<P> {
    fn default() -> Self {
        Self::unsupported()
    }
}
