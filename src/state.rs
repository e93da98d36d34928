// src/state.rs
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::aggregator::MetricsAggregator;
use crate::client::TokenApiClient;
use crate::config::Config;
use crate::error::{LoadFailure, Result};
use crate::history::{HistoryMode, HistoryResolver};
use crate::models::{HistoricalPoint, HistoricalSeries, MintBurnPoint, NetworkMetrics, TransferRecord};
use crate::networks::Network;
use crate::transfers::TransferResolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Error,
}

/// Everything the presentation layer renders, as of the last committed refresh.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub is_loading: bool,
    pub error: Option<LoadFailure>,
    pub error_message: Option<&'static str>,
    pub generation: u64,
    pub refreshed_at: Option<DateTime<Utc>>,
    pub history_mode: HistoryMode,
    pub network_metrics: Vec<NetworkMetrics>,
    pub large_transfers: Vec<TransferRecord>,
    pub historical_supply: HistoricalSeries<HistoricalPoint>,
    pub historical_wallet_count: HistoricalSeries<HistoricalPoint>,
    pub mint_burn: HistoricalSeries<MintBurnPoint>,
    pub current_price: f64,
}

impl Snapshot {
    fn idle(history_mode: HistoryMode) -> Self {
        Self {
            phase: Phase::Idle,
            is_loading: false,
            error: None,
            error_message: None,
            generation: 0,
            refreshed_at: None,
            history_mode,
            network_metrics: Vec::new(),
            large_transfers: Vec::new(),
            historical_supply: HistoricalSeries::unsupported(),
            historical_wallet_count: HistoricalSeries::unsupported(),
            mint_burn: HistoricalSeries::unsupported(),
            current_price: 1.0,
        }
    }

    fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.is_loading = phase == Phase::Loading;
    }

    fn set_error(&mut self, failure: LoadFailure) {
        self.set_phase(Phase::Error);
        self.error = Some(failure);
        self.error_message = Some(failure.message());
    }
}

/// Data gathered by one refresh, applied atomically on commit.
struct Loaded {
    network_metrics: Vec<NetworkMetrics>,
    large_transfers: Vec<TransferRecord>,
    historical_supply: HistoricalSeries<HistoricalPoint>,
    historical_wallet_count: HistoricalSeries<HistoricalPoint>,
    mint_burn: HistoricalSeries<MintBurnPoint>,
    current_price: f64,
}

/// Shared dashboard state. Owned by the composition root and handed out as
/// `Arc<DashboardState>`; only `refresh` mutates it.
pub struct DashboardState {
    client: Arc<TokenApiClient>,
    aggregator: MetricsAggregator,
    transfers: TransferResolver,
    history: HistoryResolver,
    transfer_limit: u32,
    supply_days: u32,
    wallet_days: u32,
    mint_burn_days: u32,
    generation: AtomicU64,
    snapshot: RwLock<Snapshot>,
}

impl DashboardState {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = Arc::new(TokenApiClient::new(cfg)?);
        Ok(Self::with_client(client, cfg))
    }

    pub fn with_client(client: Arc<TokenApiClient>, cfg: &Config) -> Self {
        Self {
            aggregator: MetricsAggregator::new(Arc::clone(&client), cfg.holders.clone()),
            transfers: TransferResolver::new(Arc::clone(&client), cfg.holders.clone()),
            history: HistoryResolver::new(cfg.history_mode),
            client,
            transfer_limit: cfg.transfer_limit,
            supply_days: cfg.supply_history_days,
            wallet_days: cfg.wallet_history_days,
            mint_burn_days: cfg.mint_burn_days,
            generation: AtomicU64::new(0),
            snapshot: RwLock::new(Snapshot::idle(cfg.history_mode)),
        }
    }

    pub fn aggregator(&self) -> &MetricsAggregator {
        &self.aggregator
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.snapshot.read().await.clone()
    }

    /// Enter `Loading` under a fresh generation. Earlier in-flight refreshes
    /// become stale and will not commit.
    async fn begin(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let mut snap = self.snapshot.write().await;
        snap.set_phase(Phase::Loading);
        snap.error = None;
        snap.error_message = None;
        generation
    }

    /// Apply `update` only if `generation` is still the latest refresh.
    async fn commit(&self, generation: u64, update: impl FnOnce(&mut Snapshot)) -> bool {
        let mut snap = self.snapshot.write().await;
        let latest = self.generation.load(Ordering::SeqCst);
        if generation != latest {
            debug!("Discarding refresh #{} (superseded by #{})", generation, latest);
            return false;
        }
        update(&mut snap);
        snap.generation = generation;
        true
    }

    async fn fail(&self, generation: u64, failure: LoadFailure) {
        self.commit(generation, |snap| snap.set_error(failure)).await;
    }

    /// Reload everything from the token API and return the resulting snapshot.
    pub async fn refresh(&self) -> Snapshot {
        let generation = self.begin().await;
        info!("🔄 Refresh #{} started", generation);

        if !self.client.has_credential() {
            warn!("Token API credential missing or placeholder, not calling upstream");
            self.fail(generation, LoadFailure::NotConfigured).await;
            return self.snapshot().await;
        }

        let (report, large_transfers, current_price) = tokio::join!(
            self.aggregator.collect_metrics(),
            self.transfers.get_large_transfers(self.transfer_limit),
            self.aggregator.current_price(Network::Ethereum),
        );

        if report.fully_failed() {
            if let Some((network, err)) = report.failures.first() {
                let failure = LoadFailure::classify(err);
                error!("❌ Every network failed (first: {} → {}): {}", network, err, failure);
                self.fail(generation, failure).await;
                return self.snapshot().await;
            }
        }

        let loaded = self.load_history(report.display_metrics(), large_transfers, current_price);

        let committed = self
            .commit(generation, |snap| {
                snap.network_metrics = loaded.network_metrics;
                snap.large_transfers = loaded.large_transfers;
                snap.historical_supply = loaded.historical_supply;
                snap.historical_wallet_count = loaded.historical_wallet_count;
                snap.mint_burn = loaded.mint_burn;
                snap.current_price = loaded.current_price;
                snap.refreshed_at = Some(Utc::now());
                snap.set_phase(Phase::Ready);
            })
            .await;

        if committed {
            info!("✅ Refresh #{} ready", generation);
        }
        self.snapshot().await
    }

    /// Each series fails on its own and degrades to an empty one.
    fn load_history(
        &self,
        network_metrics: Vec<NetworkMetrics>,
        large_transfers: Vec<TransferRecord>,
        current_price: f64,
    ) -> Loaded {
        let total_supply: f64 = network_metrics.iter().map(|m| m.total_supply).sum();
        let total_holders: u64 = network_metrics.iter().map(|m| m.holder_count).sum();

        let historical_supply = self
            .history
            .get_historical_supply(total_supply, self.supply_days)
            .unwrap_or_else(|e| {
                warn!("Supply history unavailable: {}", e);
                HistoricalSeries::unsupported()
            });

        let historical_wallet_count = self
            .history
            .get_historical_wallet_count(total_holders, self.wallet_days)
            .unwrap_or_else(|e| {
                warn!("Wallet count history unavailable: {}", e);
                HistoricalSeries::unsupported()
            });

        let mint_burn = self
            .history
            .get_mint_burn(self.mint_burn_days)
            .unwrap_or_else(|e| {
                warn!("Mint/burn history unavailable: {}", e);
                HistoricalSeries::unsupported()
            });

        Loaded {
            network_metrics,
            large_transfers,
            historical_supply,
            historical_wallet_count,
            mint_burn,
            current_price,
        }
    }
}
