use serde::Serialize;

use crate::models::{HistoricalPoint, NetworkMetrics};
use crate::networks::Network;
use crate::state::Snapshot;

pub const PEG_TARGET: f64 = 1.0;
const SLIGHT_DEVIATION_PCT: f64 = 0.1;
const UNSTABLE_PCT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PegHealth {
    Stable,
    SlightDeviation,
    Unstable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PegStatus {
    pub price: f64,
    /// `|price - 1| * 100`
    pub deviation_pct: f64,
    pub health: PegHealth,
}

impl PegStatus {
    pub fn from_price(price: f64) -> Self {
        let deviation_pct = (price - PEG_TARGET).abs() * 100.0;
        let health = if deviation_pct > UNSTABLE_PCT {
            PegHealth::Unstable
        } else if deviation_pct > SLIGHT_DEVIATION_PCT {
            PegHealth::SlightDeviation
        } else {
            PegHealth::Stable
        };

        Self {
            price,
            deviation_pct,
            health,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkShare {
    pub network: Network,
    pub supply: f64,
    pub share_pct: f64,
}

/// Headline numbers derived from a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_supply: f64,
    pub total_holders: u64,
    pub supply_change_pct: f64,
    pub holder_change_pct: f64,
    pub current_price: f64,
    /// signed, percent of the $1 target
    pub price_deviation_pct: f64,
    pub peg: PegStatus,
    pub distribution: Vec<NetworkShare>,
}

/// Percent change between the last two points, 0 when undefined.
fn last_change_pct(points: &[HistoricalPoint]) -> f64 {
    match points {
        [.., prev, cur] if prev.value != 0.0 => (cur.value - prev.value) / prev.value * 100.0,
        _ => 0.0,
    }
}

fn distribution(metrics: &[NetworkMetrics], total: f64) -> Vec<NetworkShare> {
    metrics
        .iter()
        .map(|m| NetworkShare {
            network: m.network,
            supply: m.total_supply,
            share_pct: if total > 0.0 {
                m.total_supply / total * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

impl DashboardSummary {
    pub fn from_snapshot(snap: &Snapshot) -> Self {
        let total_supply: f64 = snap.network_metrics.iter().map(|m| m.total_supply).sum();
        let total_holders = snap.network_metrics.iter().map(|m| m.holder_count).sum();

        Self {
            total_supply,
            total_holders,
            supply_change_pct: last_change_pct(&snap.historical_supply.points),
            holder_change_pct: last_change_pct(&snap.historical_wallet_count.points),
            current_price: snap.current_price,
            price_deviation_pct: (snap.current_price - PEG_TARGET) * 100.0,
            peg: PegStatus::from_price(snap.current_price),
            distribution: distribution(&snap.network_metrics, total_supply),
        }
    }
}
