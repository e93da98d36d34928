//! Historical series. The token API has no time-series endpoint, so a deployment
//! either reports the series as unsupported (`empty`) or fabricates one from a
//! single current value (`synthetic`). Synthetic series are always flagged.

use chrono::{Days, NaiveDate, Utc};
use serde::Serialize;
use std::str::FromStr;

use crate::error::{DashboardError, Result};
use crate::models::{HistoricalPoint, HistoricalSeries, MintBurnPoint};

const AMPLITUDE: f64 = 0.02;
const PERIOD: f64 = 3.0;

pub const WALLET_COUNT_BASELINE: f64 = 500_000.0;
pub const MINTED_BASELINE: f64 = 100_000_000.0;
pub const BURNED_BASELINE: f64 = 90_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
    Empty,
    Synthetic,
}

impl FromStr for HistoryMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "empty" | "" => Ok(Self::Empty),
            "synthetic" => Ok(Self::Synthetic),
            other => Err(format!("HISTORY_MODE must be `empty` or `synthetic`, got `{}`", other)),
        }
    }
}

/// `value * (1 + AMPLITUDE * wave(i / PERIOD))`
fn oscillate(value: f64, i: usize, wave: fn(f64) -> f64) -> f64 {
    value * (1.0 + AMPLITUDE * wave(i as f64 / PERIOD))
}

/// `days` consecutive dates ending at `today`, oldest first.
fn trailing_dates(today: NaiveDate, days: u32) -> impl Iterator<Item = NaiveDate> {
    (0..days).rev().filter_map(move |back| today.checked_sub_days(Days::new(u64::from(back))))
}

#[derive(Debug, Clone, Copy)]
pub struct HistoryResolver {
    mode: HistoryMode,
}

impl HistoryResolver {
    pub fn new(mode: HistoryMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> HistoryMode {
        self.mode
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Supply series around `current_supply`. Synthetic mode needs a positive baseline.
    pub fn get_historical_supply(
        &self,
        current_supply: f64,
        days: u32,
    ) -> Result<HistoricalSeries<HistoricalPoint>> {
        self.value_series("supply", current_supply, days, Self::today())
    }

    /// Wallet-count series. Holder counts are rarely exposed upstream; a zero
    /// count falls back to the fixed baseline.
    pub fn get_historical_wallet_count(
        &self,
        holder_count: u64,
        days: u32,
    ) -> Result<HistoricalSeries<HistoricalPoint>> {
        let base = if holder_count > 0 {
            holder_count as f64
        } else {
            WALLET_COUNT_BASELINE
        };
        let mut series = self.value_series("wallet count", base, days, Self::today())?;
        for p in &mut series.points {
            p.value = p.value.round();
        }
        Ok(series)
    }

    pub fn get_mint_burn(&self, days: u32) -> Result<HistoricalSeries<MintBurnPoint>> {
        self.mint_burn_series(days, Self::today())
    }

    fn value_series(
        &self,
        label: &'static str,
        base: f64,
        days: u32,
        today: NaiveDate,
    ) -> Result<HistoricalSeries<HistoricalPoint>> {
        match self.mode {
            HistoryMode::Empty => Ok(HistoricalSeries::unsupported()),
            HistoryMode::Synthetic => {
                if !(base.is_finite() && base > 0.0) {
                    return Err(DashboardError::NoHistoricalBaseline(label));
                }
                let points = trailing_dates(today, days)
                    .enumerate()
                    .map(|(i, date)| HistoricalPoint {
                        date,
                        value: oscillate(base, i, f64::sin),
                    })
                    .collect();
                Ok(HistoricalSeries {
                    synthetic: true,
                    points,
                })
            }
        }
    }

    fn mint_burn_series(&self, days: u32, today: NaiveDate) -> Result<HistoricalSeries<MintBurnPoint>> {
        match self.mode {
            HistoryMode::Empty => Ok(HistoricalSeries::unsupported()),
            HistoryMode::Synthetic => {
                let points = trailing_dates(today, days)
                    .enumerate()
                    .map(|(i, date)| MintBurnPoint {
                        date,
                        minted: oscillate(MINTED_BASELINE, i, f64::sin).round(),
                        burned: oscillate(BURNED_BASELINE, i, f64::cos).round(),
                    })
                    .collect();
                Ok(HistoricalSeries {
                    synthetic: true,
                    points,
                })
            }
        }
    }
}
